#![forbid(unsafe_code)]

pub mod file;
pub mod keys;
pub mod persistent;
pub mod repository;

pub use file::FileKeyValueStore;
pub use persistent::PersistentStore;
pub use repository::{InMemoryKeyValueStore, KeyValueStore, StorageError};
