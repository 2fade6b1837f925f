//! Key/value persistence for the showcase site.
//!
//! Every persisted read and write in the workspace goes through the
//! [`PersistentStore`] trait. Components hold an `Arc<dyn PersistentStore>`
//! so tests can swap in [`MemoryStore`] while the binary uses
//! [`JsonFileStore`].

pub mod file;
pub mod keys;
pub mod local;
pub mod store;

pub use file::JsonFileStore;
pub use local::MemoryStore;
pub use store::{PersistentStore, SharedStore, StoreExt};
