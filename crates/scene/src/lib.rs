//! Scene adapter: the narrow interface the core uses to talk to the
//! rendering engine.
//!
//! # Invariants
//! - The core issues only node create/remove/transform and ray queries.
//! - Scene nodes never carry behavior; interaction lives in the registry.
//!
//! # Workaround
//! Ships `MemoryScene`, an in-process graph with ray/box hit-testing, in
//! place of a GPU engine. The trait is stable; an engine binding implements
//! `SceneGraph` without changing consumers.

mod camera;
mod graph;
mod memory;

pub use camera::CameraPose;
pub use graph::{Hit, NodeSpec, SceneError, SceneGraph};
pub use memory::MemoryScene;
