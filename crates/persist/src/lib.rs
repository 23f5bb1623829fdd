//! Persistence: the key-value adapter used for user preferences.
//!
//! # Invariants
//! - Stores move strings verbatim; callers own serialization.
//! - A damaged record reads as an error, never as silently altered data.

mod store;

pub use store::{Envelope, FileStore, MemoryStore, PersistError, PersistenceAdapter};
