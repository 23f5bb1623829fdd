use glam::Vec2;
use oasis_avatar::{AnimationMode, AvatarConfig, AvatarController, PersistConfigError};
use oasis_common::{LogLauncher, LogNotifier, MiniGameLauncher, NotificationSink, WorldId};
use oasis_input::{Action, InputState, PointerEvent};
use oasis_interact::{Command, Commands, InteractableId, PickDispatcher};
use oasis_persist::{MemoryStore, PersistenceAdapter};
use oasis_scene::{CameraPose, MemoryScene, SceneGraph};
use std::rc::Rc;

use crate::catalog::WorldCatalog;
use crate::config::SessionConfig;
use crate::error::WorldError;
use crate::manager::{LoadOutcome, Stage, WorldManager};

/// The single owner of one user's running experience: scene, worlds,
/// avatar, input and the external collaborators.
///
/// Every entry point runs to completion. Commands emitted by interactable
/// handlers are applied before `pointer` returns, so a handler that asks
/// for another world has it active by then.
pub struct Session<S: SceneGraph = MemoryScene> {
    config: SessionConfig,
    scene: S,
    manager: WorldManager,
    avatar: AvatarController,
    dispatcher: PickDispatcher,
    input: InputState,
    camera: CameraPose,
    last_pointer: Option<Vec2>,
    notifier: Rc<dyn NotificationSink>,
    launcher: Rc<dyn MiniGameLauncher>,
    store: Box<dyn PersistenceAdapter>,
}

impl<S: SceneGraph> Session<S> {
    /// A session over the standard worlds, logging notifications and
    /// mini-game requests and keeping preferences in memory.
    pub fn new(config: SessionConfig, scene: S) -> Self {
        let manager = manager_for(WorldCatalog::standard(), &config);
        Self {
            avatar: AvatarController::new(config.avatar.clone())
                .with_notification_ms(config.notification_ms),
            config,
            scene,
            manager,
            dispatcher: PickDispatcher::new(),
            input: InputState::new(),
            camera: CameraPose::default(),
            last_pointer: None,
            notifier: Rc::new(LogNotifier),
            launcher: Rc::new(LogLauncher),
            store: Box::new(MemoryStore::new()),
        }
    }

    pub fn with_catalog(mut self, catalog: WorldCatalog) -> Self {
        self.manager = manager_for(catalog, &self.config);
        self
    }

    pub fn with_notifier(mut self, notifier: Rc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_launcher(mut self, launcher: Rc<dyn MiniGameLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn with_store(mut self, store: Box<dyn PersistenceAdapter>) -> Self {
        self.store = store;
        self
    }

    /// Load the stored avatar, put it in the scene and enter the start world.
    pub fn start(&mut self) -> Result<LoadOutcome, WorldError> {
        let config = self
            .avatar
            .load(self.store.as_ref(), self.notifier.as_ref(), &mut self.scene);
        tracing::info!(body = %config.body_type, head = %config.head_type, "avatar loaded");
        if let Err(e) = self.avatar.attach(&mut self.scene) {
            tracing::warn!(error = %e, "avatar rig could not be attached");
        }
        let start = self.config.start_world.clone();
        self.load_world(&start)
    }

    /// Switch worlds. Unknown names return `InvalidWorld` and change nothing.
    pub fn load_world(&mut self, name: &str) -> Result<LoadOutcome, WorldError> {
        let stage = Stage {
            scene: &mut self.scene,
            avatar: &mut self.avatar,
            camera: &mut self.camera,
            notifier: self.notifier.as_ref(),
        };
        let result = self.manager.load_world(name, stage);
        let stale = self
            .dispatcher
            .hovered()
            .is_some_and(|id| !self.manager.registry().contains(id));
        if stale {
            self.dispatcher.reset_hover();
        }
        result
    }

    /// Advance one frame: world decorations, the fade and the avatar.
    pub fn update(&mut self, dt: f32) {
        let _span = tracing::info_span!("session_update", dt).entered();
        self.manager.update(dt, &mut self.scene);
        if let Err(e) = self.avatar.update(dt, &self.input, &mut self.scene) {
            tracing::warn!(error = %e, "avatar update skipped");
        }
        self.input.end_frame();
    }

    pub fn key_down(&mut self, action: Action) {
        match action {
            Action::ToggleMenu => {
                let open = self.dispatcher.toggle_modal();
                tracing::info!(open, "menu toggled");
            }
            Action::Interact => {
                self.interact();
            }
            _ => {
                self.input.press(action);
            }
        }
    }

    pub fn key_up(&mut self, action: Action) {
        self.input.release(action);
    }

    /// Key-down by physical key name. Returns the bound action, if any.
    pub fn press_key(&mut self, key: &str) -> Option<Action> {
        let action = self.config.bindings.resolve(key)?;
        self.key_down(action);
        Some(action)
    }

    pub fn release_key(&mut self, key: &str) -> Option<Action> {
        let action = self.config.bindings.resolve(key)?;
        self.key_up(action);
        Some(action)
    }

    /// Click at the last known pointer position.
    pub fn interact(&mut self) -> Option<InteractableId> {
        let ndc = self.last_pointer?;
        self.pointer(PointerEvent { ndc, click: true })
    }

    /// Feed a pointer sample. Updates hover and, for clicks, invokes the
    /// selected interactable's handler. Returns the clicked interactable.
    ///
    /// Nothing is resolved unless a world is fully active.
    pub fn pointer(&mut self, event: PointerEvent) -> Option<InteractableId> {
        self.last_pointer = Some(event.ndc);
        if !self.manager.is_active() {
            tracing::debug!(state = %self.manager.state(), "pointer ignored: no active world");
            return None;
        }
        let ray = self.camera.ray_from_ndc(event.ndc, self.config.aspect);
        let mut commands = Commands::new();
        self.dispatcher
            .hover(&ray, &self.scene, self.manager.registry_mut(), &mut commands);
        let picked = if event.click {
            self.dispatcher
                .dispatch(&ray, &self.scene, self.manager.registry_mut(), &mut commands)
        } else {
            None
        };
        self.apply(commands);
        picked
    }

    /// Run handler commands in order. Of several world loads in one batch
    /// only the last is applied, after everything else.
    fn apply(&mut self, mut commands: Commands) {
        let mut load: Option<String> = None;
        for command in commands.take() {
            match command {
                Command::LoadWorld(name) => {
                    if let Some(superseded) = load.replace(name) {
                        tracing::debug!(%superseded, "world load superseded");
                    }
                }
                Command::StartMiniGame(name) => {
                    tracing::info!(game = %name, "starting mini-game");
                    self.launcher.start(&name);
                }
                Command::Notify {
                    message,
                    duration_ms,
                } => self.notifier.display(&message, duration_ms),
            }
        }
        if let Some(name) = load {
            if let Err(e) = self.load_world(&name) {
                tracing::warn!(error = %e, "requested world load failed");
            }
        }
    }

    /// Replace the avatar config, rebuild the rig and persist the config.
    pub fn set_avatar_config(&mut self, config: AvatarConfig) -> Result<(), PersistConfigError> {
        if let Err(e) = self.avatar.set_config(config, &mut self.scene) {
            tracing::warn!(error = %e, "avatar rebuild failed");
        }
        self.avatar.save(self.store.as_mut())
    }

    /// Forget the stored config and go back to the default avatar.
    pub fn reset_avatar(&mut self) -> Result<(), PersistConfigError> {
        self.store.remove(&self.config.avatar.storage_key)?;
        if let Err(e) = self.avatar.set_config(AvatarConfig::default(), &mut self.scene) {
            tracing::warn!(error = %e, "avatar rebuild failed");
        }
        Ok(())
    }

    /// Force an animation by name. Unknown names are logged and ignored.
    pub fn play_animation(&mut self, name: &str) -> Option<AnimationMode> {
        match self.avatar.play_animation(name) {
            Ok(mode) => Some(mode),
            Err(e) => {
                tracing::warn!(error = %e, "animation request ignored");
                None
            }
        }
    }

    pub fn set_modal(&mut self, open: bool) {
        self.dispatcher.set_modal(open);
    }

    pub fn is_modal_open(&self) -> bool {
        self.dispatcher.is_modal_open()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect > 0.0 {
            self.config.aspect = aspect;
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn manager(&self) -> &WorldManager {
        &self.manager
    }

    pub fn avatar(&self) -> &AvatarController {
        &self.avatar
    }

    pub fn dispatcher(&self) -> &PickDispatcher {
        &self.dispatcher
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn camera(&self) -> CameraPose {
        self.camera
    }

    pub fn active_world(&self) -> Option<WorldId> {
        self.manager.active_world()
    }

    pub fn store(&self) -> &dyn PersistenceAdapter {
        self.store.as_ref()
    }
}

fn manager_for(catalog: WorldCatalog, config: &SessionConfig) -> WorldManager {
    WorldManager::new(catalog)
        .with_fade(config.fade_seconds)
        .with_notification_ms(config.notification_ms)
}
