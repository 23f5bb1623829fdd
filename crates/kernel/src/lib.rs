//! World kernel: the world lifecycle state machine, the standard worlds and
//! the session that owns every runtime component.
//!
//! # Invariants
//! - Transitions tear down the current world before building the next.
//! - After a transition completes, every registered interactable belongs to
//!   the active world.
//! - An unknown world name never mutates state.
//! - No pointer event is resolved while no world is active.
//! - A failed build leaves no partial content and no active world.

pub mod catalog;
pub mod config;
pub mod decor;
pub mod error;
pub mod inspect;
pub mod manager;
pub mod session;
pub mod world;
pub mod worlds;

pub use catalog::WorldCatalog;
pub use config::{ConfigError, SessionConfig};
pub use decor::Decoration;
pub use error::{WorldBuildError, WorldError};
pub use inspect::{InteractableInfo, SessionInspector, SessionSummary};
pub use manager::{LoadOutcome, Stage, TransitionFade, TransitionPhase, TransitionState, WorldManager};
pub use session::Session;
pub use world::{BuildContext, World, WorldBuilder, WorldContent};
