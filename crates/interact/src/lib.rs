//! Interaction: the registry of interactables for the active world and the
//! dispatcher that resolves pointer rays to them.
//!
//! # Invariants
//! - Only registered interactables can receive a pointer event.
//! - One dispatch invokes at most one handler, exactly once.
//! - Handlers express side effects as `Command`s, never by reaching into
//!   the world manager.

mod command;
mod dispatch;
mod registry;

pub use command::{Command, Commands};
pub use dispatch::PickDispatcher;
pub use registry::{Callback, Interactable, InteractableId, InteractableRegistry, RegistryError};
