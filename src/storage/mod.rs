pub mod kv;
pub mod paths;

pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use paths::ClientPaths;
