use oasis_avatar::AvatarController;
use oasis_common::{DEFAULT_NOTIFICATION_MS, NodeId, NotificationSink, WorldId};
use oasis_interact::InteractableRegistry;
use oasis_scene::{CameraPose, SceneGraph};
use std::fmt;

use crate::catalog::WorldCatalog;
use crate::error::WorldError;
use crate::world::{BuildContext, WorldContent};

/// Where the manager is in a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// No world is active.
    Idle,
    TearingDown,
    Building,
    Active,
}

/// Phase plus the world it concerns. `target` is `None` only when Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionState {
    pub phase: TransitionPhase,
    pub target: Option<WorldId>,
}

impl TransitionState {
    pub const IDLE: TransitionState = TransitionState {
        phase: TransitionPhase::Idle,
        target: None,
    };
}

impl fmt::Display for TransitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Some(world) => write!(f, "{:?}({world})", self.phase),
            None => write!(f, "{:?}", self.phase),
        }
    }
}

/// Result of a successful `load_world`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The world was already active; nothing happened.
    AlreadyActive(WorldId),
    Entered(WorldId),
}

impl LoadOutcome {
    pub fn world(self) -> WorldId {
        match self {
            Self::AlreadyActive(id) | Self::Entered(id) => id,
        }
    }
}

/// Cosmetic overlay fade played after each completed transition. It never
/// gates any state change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionFade {
    duration: f32,
    elapsed: f32,
}

impl TransitionFade {
    pub fn new(duration: f32) -> Self {
        let duration = duration.max(0.0);
        Self {
            duration,
            elapsed: duration,
        }
    }

    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
    }

    pub fn is_running(&self) -> bool {
        self.elapsed < self.duration
    }

    /// Overlay opacity: 1 right after a transition, 0 once finished.
    pub fn alpha(&self) -> f32 {
        if self.duration <= 0.0 {
            0.0
        } else {
            1.0 - self.elapsed / self.duration
        }
    }
}

/// Everything outside the manager that a transition touches.
pub struct Stage<'a> {
    pub scene: &'a mut dyn SceneGraph,
    pub avatar: &'a mut AvatarController,
    pub camera: &'a mut CameraPose,
    pub notifier: &'a dyn NotificationSink,
}

type Observer = Box<dyn FnMut(TransitionState)>;

struct ActiveWorld {
    id: WorldId,
    content: WorldContent,
}

/// Owns the transition state machine, the active world's content and the
/// interactable registry.
///
/// Transitions always tear down before they build, so the registry never
/// holds interactables from two worlds. Only this type mutates the
/// registry outside of dispatch.
pub struct WorldManager {
    catalog: WorldCatalog,
    state: TransitionState,
    active: Option<ActiveWorld>,
    registry: InteractableRegistry,
    fade: TransitionFade,
    clock: f32,
    notification_ms: u64,
    observer: Option<Observer>,
}

impl WorldManager {
    pub fn new(catalog: WorldCatalog) -> Self {
        Self {
            catalog,
            state: TransitionState::IDLE,
            active: None,
            registry: InteractableRegistry::new(),
            fade: TransitionFade::new(0.5),
            clock: 0.0,
            notification_ms: DEFAULT_NOTIFICATION_MS,
            observer: None,
        }
    }

    pub fn with_fade(mut self, seconds: f32) -> Self {
        self.fade = TransitionFade::new(seconds);
        self
    }

    pub fn with_notification_ms(mut self, duration_ms: u64) -> Self {
        self.notification_ms = duration_ms;
        self
    }

    /// Called with the new state on every phase change.
    pub fn set_observer(&mut self, observer: impl FnMut(TransitionState) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn catalog(&self) -> &WorldCatalog {
        &self.catalog
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.phase == TransitionPhase::Active
    }

    pub fn active_world(&self) -> Option<WorldId> {
        self.active.as_ref().map(|a| a.id)
    }

    pub fn registry(&self) -> &InteractableRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut InteractableRegistry {
        &mut self.registry
    }

    pub fn fade(&self) -> &TransitionFade {
        &self.fade
    }

    /// Scene nodes owned by the active world.
    pub fn content_nodes(&self) -> &[NodeId] {
        self.active
            .as_ref()
            .map(|a| a.content.nodes.as_slice())
            .unwrap_or(&[])
    }

    /// Switch to the named world.
    ///
    /// Unknown names change nothing. Loading the active world is a no-op.
    /// Otherwise the current world is torn down, the target is built and
    /// the avatar and camera move to its poses.
    pub fn load_world(&mut self, name: &str, stage: Stage<'_>) -> Result<LoadOutcome, WorldError> {
        let _span = tracing::info_span!("load_world", name).entered();

        // Held across teardown; a started transition always has a builder.
        let Some(world) = self.catalog.lookup(name) else {
            tracing::warn!(name, "unknown world");
            stage
                .notifier
                .display(&format!("Unknown world: {name}"), self.notification_ms);
            return Err(WorldError::InvalidWorld(name.to_string()));
        };
        let id = world.id();
        if self.active_world() == Some(id) {
            tracing::debug!(world = %id, "already active");
            return Ok(LoadOutcome::AlreadyActive(id));
        }

        stage
            .notifier
            .display(&format!("Loading {}...", id.title()), self.notification_ms);

        self.set_state(TransitionPhase::TearingDown, Some(id));
        self.teardown(stage.scene);

        self.set_state(TransitionPhase::Building, Some(id));
        let (spawn, camera) = (world.spawn(), world.camera());
        let mut ctx = BuildContext::new(id, &mut *stage.scene, &mut self.registry);
        let built = world.builder().build(&mut ctx);
        let content = ctx.finish();

        if let Err(source) = built {
            tracing::error!(world = %id, error = %source, "world build failed, rolling back");
            self.discard(content, stage.scene);
            self.set_state(TransitionPhase::Idle, None);
            stage.notifier.display(
                &format!("Failed to load {}", id.title()),
                self.notification_ms,
            );
            return Err(WorldError::Build { world: id, source });
        }

        if let Err(e) = stage.avatar.place(spawn, stage.scene) {
            tracing::warn!(error = %e, "avatar placement failed");
        }
        *stage.camera = camera;

        tracing::info!(
            world = %id,
            nodes = content.nodes.len(),
            interactables = content.interactables.len(),
            "world active"
        );
        self.active = Some(ActiveWorld { id, content });
        self.clock = 0.0;
        self.fade.restart();
        self.set_state(TransitionPhase::Active, Some(id));
        stage
            .notifier
            .display(&format!("Entered {}", id.title()), self.notification_ms);
        Ok(LoadOutcome::Entered(id))
    }

    /// Tear down the active world, if any, leaving the manager Idle.
    pub fn unload(&mut self, scene: &mut dyn SceneGraph) {
        if self.active.is_some() {
            self.set_state(TransitionPhase::TearingDown, self.state.target);
            self.teardown(scene);
            self.set_state(TransitionPhase::Idle, None);
        }
    }

    /// Per-frame hook: advances the fade and the active world's decorations.
    pub fn update(&mut self, dt: f32, scene: &mut dyn SceneGraph) {
        self.fade.advance(dt);
        let Some(active) = &self.active else {
            return;
        };
        self.clock += dt.max(0.0);
        for decoration in &active.content.decorations {
            if let Err(e) = decoration.apply(scene, self.clock) {
                tracing::warn!(error = %e, "decoration skipped");
            }
        }
    }

    fn teardown(&mut self, scene: &mut dyn SceneGraph) {
        let removed = self.registry.clear();
        if let Some(active) = self.active.take() {
            tracing::debug!(world = %active.id, interactables = removed, "tearing down");
            remove_nodes(&active.content, scene);
        }
    }

    /// Undo a partial build: unregister what it registered, remove what it
    /// created.
    fn discard(&mut self, content: WorldContent, scene: &mut dyn SceneGraph) {
        for id in &content.interactables {
            self.registry.unregister(id);
        }
        remove_nodes(&content, scene);
    }

    fn set_state(&mut self, phase: TransitionPhase, target: Option<WorldId>) {
        self.state = TransitionState { phase, target };
        tracing::debug!(state = %self.state, "transition");
        if let Some(observer) = self.observer.as_mut() {
            observer(self.state);
        }
    }
}

fn remove_nodes(content: &WorldContent, scene: &mut dyn SceneGraph) {
    for node in content.nodes.iter().rev() {
        scene.remove_node(*node);
    }
}

impl fmt::Debug for WorldManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldManager")
            .field("state", &self.state)
            .field("active", &self.active_world())
            .field("interactables", &self.registry.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::World;
    use crate::error::WorldBuildError;
    use glam::Vec3;
    use oasis_common::{NotificationLog, Pose};
    use oasis_interact::Interactable;
    use oasis_scene::{MemoryScene, NodeSpec};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Rig {
        scene: MemoryScene,
        avatar: AvatarController,
        camera: CameraPose,
        notes: NotificationLog,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                scene: MemoryScene::new(),
                avatar: AvatarController::default(),
                camera: CameraPose::default(),
                notes: NotificationLog::new(),
            }
        }

        fn stage(&mut self) -> Stage<'_> {
            Stage {
                scene: &mut self.scene,
                avatar: &mut self.avatar,
                camera: &mut self.camera,
                notifier: &self.notes,
            }
        }
    }

    #[test]
    fn load_builds_and_positions() {
        let mut manager = WorldManager::new(WorldCatalog::standard());
        let mut rig = Rig::new();
        let outcome = manager.load_world("arcade", rig.stage()).unwrap();

        assert_eq!(outcome, LoadOutcome::Entered(WorldId::Arcade));
        assert!(manager.is_active());
        assert_eq!(manager.registry().owners().into_iter().collect::<Vec<_>>(), vec![WorldId::Arcade]);
        assert_eq!(rig.avatar.pose().position, Vec3::new(0.0, 0.0, 15.0));
        assert_eq!(rig.camera.eye, Vec3::new(0.0, 10.0, 20.0));
        assert_eq!(
            rig.notes.messages(),
            vec!["Loading ARCADE...".to_string(), "Entered ARCADE".to_string()]
        );
        assert!(manager.fade().is_running());
    }

    #[test]
    fn teardown_happens_before_build() {
        let mut manager = WorldManager::new(WorldCatalog::standard());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        manager.set_observer(move |state| sink.borrow_mut().push(state.phase));
        let mut rig = Rig::new();
        manager.load_world("social", rig.stage()).unwrap();
        manager.load_world("race", rig.stage()).unwrap();

        use TransitionPhase::*;
        assert_eq!(
            *seen.borrow(),
            vec![TearingDown, Building, Active, TearingDown, Building, Active]
        );
    }

    #[test]
    fn switching_removes_previous_content() {
        let mut manager = WorldManager::new(WorldCatalog::standard());
        let mut rig = Rig::new();
        manager.load_world("social", rig.stage()).unwrap();
        let social_nodes = manager.content_nodes().to_vec();
        manager.load_world("race", rig.stage()).unwrap();

        assert!(social_nodes.iter().all(|n| !rig.scene.contains(*n)));
        assert_eq!(rig.scene.node_count(), manager.content_nodes().len());
        assert!(manager.registry().iter().all(|i| i.world == WorldId::Race));
    }

    #[test]
    fn reload_of_active_world_is_noop() {
        let mut manager = WorldManager::new(WorldCatalog::standard());
        let mut rig = Rig::new();
        manager.load_world("race", rig.stage()).unwrap();
        let nodes = manager.content_nodes().to_vec();
        let count = manager.registry().len();
        rig.notes.clear();

        let outcome = manager.load_world("Race Track", rig.stage()).unwrap();
        assert_eq!(outcome, LoadOutcome::AlreadyActive(WorldId::Race));
        assert_eq!(manager.content_nodes(), nodes.as_slice());
        assert_eq!(manager.registry().len(), count);
        assert!(rig.notes.is_empty());
    }

    #[test]
    fn unknown_world_changes_nothing() {
        let mut manager = WorldManager::new(WorldCatalog::standard());
        let mut rig = Rig::new();
        manager.load_world("social", rig.stage()).unwrap();
        let before = (manager.state(), manager.registry().len(), rig.scene.node_count());

        let err = manager.load_world("moon base", rig.stage()).unwrap_err();
        assert!(matches!(err, WorldError::InvalidWorld(ref n) if n == "moon base"));
        assert_eq!(
            (manager.state(), manager.registry().len(), rig.scene.node_count()),
            before
        );
        assert!(rig.notes.contains("Unknown world"));
    }

    #[test]
    fn failed_build_rolls_back_to_idle() {
        let mut catalog = WorldCatalog::standard();
        catalog.insert(World::new(
            WorldId::Race,
            CameraPose::default(),
            Pose::default(),
            |ctx: &mut BuildContext<'_>| -> Result<(), WorldBuildError> {
                let node = ctx.spawn(NodeSpec::new("half-built").with_box(Vec3::ONE))?;
                ctx.interactable("half-built", node, |_| {})?;
                Err(WorldBuildError::Content("track asset missing".into()))
            },
        ));
        let mut manager = WorldManager::new(catalog);
        let mut rig = Rig::new();
        manager.load_world("social", rig.stage()).unwrap();

        let err = manager.load_world("race", rig.stage()).unwrap_err();
        assert!(matches!(err, WorldError::Build { world: WorldId::Race, .. }));
        assert_eq!(manager.state(), TransitionState::IDLE);
        assert_eq!(manager.active_world(), None);
        assert!(manager.registry().is_empty());
        assert_eq!(rig.scene.node_count(), 0);
        assert!(rig.notes.contains("Failed to load RACE TRACK"));

        // Recoverable: another load succeeds.
        manager.load_world("arcade", rig.stage()).unwrap();
        assert!(manager.is_active());
    }

    #[test]
    fn foreign_interactable_rolls_back_to_idle() {
        let mut catalog = WorldCatalog::standard();
        catalog.insert(World::new(
            WorldId::Race,
            CameraPose::default(),
            Pose::default(),
            |ctx: &mut BuildContext<'_>| -> Result<(), WorldBuildError> {
                let node = ctx.spawn(NodeSpec::new("cabinet").with_box(Vec3::ONE))?;
                ctx.register(Interactable::new("arcade/smuggled", WorldId::Arcade, node, |_| {}))?;
                Ok(())
            },
        ));
        let mut manager = WorldManager::new(catalog);
        let mut rig = Rig::new();

        let err = manager.load_world("race", rig.stage()).unwrap_err();
        assert!(matches!(
            err,
            WorldError::Build {
                world: WorldId::Race,
                source: WorldBuildError::ForeignInteractable { .. },
            }
        ));
        assert_eq!(manager.state(), TransitionState::IDLE);
        assert!(manager.registry().is_empty());
        assert!(manager.registry().owners().is_empty());
        assert_eq!(rig.scene.node_count(), 0);
        assert!(rig.notes.contains("Failed to load RACE TRACK"));
    }

    #[test]
    fn every_transition_settles() {
        let mut catalog = WorldCatalog::standard();
        catalog.insert(World::new(
            WorldId::Race,
            CameraPose::default(),
            Pose::default(),
            |_: &mut BuildContext<'_>| -> Result<(), WorldBuildError> {
                Err(WorldBuildError::Content("track asset missing".into()))
            },
        ));
        let mut manager = WorldManager::new(catalog);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        manager.set_observer(move |state| sink.borrow_mut().push(state.phase));
        let mut rig = Rig::new();

        manager.load_world("social", rig.stage()).unwrap();
        manager.load_world("moon base", rig.stage()).unwrap_err();
        manager.load_world("race", rig.stage()).unwrap_err();

        use TransitionPhase::*;
        assert_eq!(
            *seen.borrow(),
            vec![TearingDown, Building, Active, TearingDown, Building, Idle]
        );
        assert_eq!(manager.state(), TransitionState::IDLE);
    }

    #[test]
    fn fade_is_cosmetic_and_finishes() {
        let mut manager = WorldManager::new(WorldCatalog::standard()).with_fade(0.5);
        let mut rig = Rig::new();
        manager.load_world("social", rig.stage()).unwrap();
        assert_eq!(manager.fade().alpha(), 1.0);
        manager.update(0.25, &mut rig.scene);
        assert_eq!(manager.fade().alpha(), 0.5);
        manager.update(0.25, &mut rig.scene);
        assert!(!manager.fade().is_running());

        // A load mid-fade is applied at once and restarts the fade.
        manager.update(0.0, &mut rig.scene);
        manager.load_world("arcade", rig.stage()).unwrap();
        assert_eq!(manager.active_world(), Some(WorldId::Arcade));
        assert_eq!(manager.fade().alpha(), 1.0);
    }

    #[test]
    fn unload_leaves_idle_and_empty() {
        let mut manager = WorldManager::new(WorldCatalog::standard());
        let mut rig = Rig::new();
        manager.load_world("arcade", rig.stage()).unwrap();
        manager.unload(&mut rig.scene);
        assert_eq!(manager.state(), TransitionState::IDLE);
        assert!(manager.registry().is_empty());
        assert_eq!(rig.scene.node_count(), 0);
    }
}
