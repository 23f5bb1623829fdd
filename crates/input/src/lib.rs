//! Input: logical actions, key bindings, held/edge state and pointer samples.
//!
//! # Invariants
//! - The core consumes `Action`s and `PointerEvent`s, never raw key codes.
//! - A held key produces exactly one press edge until it is released.

pub mod action;
mod pointer;
mod state;

pub use action::{Action, KeyBindings};
pub use pointer::{PointerError, PointerEvent};
pub use state::InputState;
