use oasis_common::{NodeId, Pose, WorldId};
use oasis_interact::{Commands, Interactable, InteractableId, InteractableRegistry};
use oasis_scene::{CameraPose, NodeSpec, SceneGraph};
use std::fmt;

use crate::decor::Decoration;
use crate::error::WorldBuildError;

/// Produces a world's scene content and interactables.
///
/// Called once per activation. A builder that returns an error leaves its
/// partial content for the manager to roll back.
pub trait WorldBuilder {
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<(), WorldBuildError>;
}

impl<F> WorldBuilder for F
where
    F: Fn(&mut BuildContext<'_>) -> Result<(), WorldBuildError>,
{
    fn build(&self, ctx: &mut BuildContext<'_>) -> Result<(), WorldBuildError> {
        self(ctx)
    }
}

/// Immutable description of a world: where the camera and avatar go, and
/// how to build its content.
pub struct World {
    id: WorldId,
    camera: CameraPose,
    spawn: Pose,
    builder: Box<dyn WorldBuilder>,
}

impl World {
    pub fn new(
        id: WorldId,
        camera: CameraPose,
        spawn: Pose,
        builder: impl WorldBuilder + 'static,
    ) -> Self {
        Self {
            id,
            camera,
            spawn,
            builder: Box::new(builder),
        }
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    pub fn camera(&self) -> CameraPose {
        self.camera
    }

    pub fn spawn(&self) -> Pose {
        self.spawn
    }

    pub fn builder(&self) -> &dyn WorldBuilder {
        self.builder.as_ref()
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("id", &self.id)
            .field("camera", &self.camera)
            .field("spawn", &self.spawn)
            .finish_non_exhaustive()
    }
}

/// What one activation put into the scene and registry.
#[derive(Debug, Default)]
pub struct WorldContent {
    pub nodes: Vec<NodeId>,
    pub interactables: Vec<InteractableId>,
    pub decorations: Vec<Decoration>,
}

/// Handed to a builder. Records everything it creates so teardown and
/// rollback can remove exactly that.
pub struct BuildContext<'a> {
    world: WorldId,
    scene: &'a mut dyn SceneGraph,
    registry: &'a mut InteractableRegistry,
    content: WorldContent,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(
        world: WorldId,
        scene: &'a mut dyn SceneGraph,
        registry: &'a mut InteractableRegistry,
    ) -> Self {
        Self {
            world,
            scene,
            registry,
            content: WorldContent::default(),
        }
    }

    pub fn world(&self) -> WorldId {
        self.world
    }

    /// Create a scene node owned by this world.
    pub fn spawn(&mut self, spec: NodeSpec) -> Result<NodeId, WorldBuildError> {
        let node = self.scene.create_node(spec)?;
        self.content.nodes.push(node);
        Ok(node)
    }

    /// Register an interactable owned by this world. Its owner must be this
    /// world and its id must live under `<world>/`.
    pub fn register(&mut self, entity: Interactable) -> Result<InteractableId, WorldBuildError> {
        let id = entity.id.clone();
        let in_namespace = id
            .as_str()
            .strip_prefix(self.world.name())
            .is_some_and(|rest| rest.len() > 1 && rest.starts_with('/'));
        if entity.world != self.world || !in_namespace {
            return Err(WorldBuildError::ForeignInteractable {
                id,
                world: self.world,
            });
        }
        self.registry.register(entity)?;
        self.content.interactables.push(id.clone());
        Ok(id)
    }

    /// Register `node` as an interactable with id `<world>/<name>`.
    pub fn interactable(
        &mut self,
        name: &str,
        node: NodeId,
        handler: impl FnMut(&mut Commands) + 'static,
    ) -> Result<InteractableId, WorldBuildError> {
        let id = format!("{}/{}", self.world, name);
        self.register(Interactable::new(id, self.world, node, handler))
    }

    pub fn decorate(&mut self, decoration: Decoration) {
        self.content.decorations.push(decoration);
    }

    pub(crate) fn finish(self) -> WorldContent {
        self.content
    }
}
