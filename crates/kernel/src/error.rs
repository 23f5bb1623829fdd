use oasis_common::WorldId;
use oasis_interact::{InteractableId, RegistryError};
use oasis_scene::SceneError;

/// Errors from world transitions.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The name does not resolve to a known world. Nothing was changed.
    #[error("unknown world '{0}'")]
    InvalidWorld(String),
    /// The target world's builder failed. Its partial content was rolled
    /// back and no world is active.
    #[error("failed to build world '{world}': {source}")]
    Build {
        world: WorldId,
        #[source]
        source: WorldBuildError,
    },
}

/// Why a world builder stopped.
#[derive(Debug, thiserror::Error)]
pub enum WorldBuildError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// An interactable claimed a different owner or id namespace than the
    /// world being built.
    #[error("interactable '{id}' does not belong to world '{world}'")]
    ForeignInteractable { id: InteractableId, world: WorldId },
    #[error("{0}")]
    Content(String),
}
