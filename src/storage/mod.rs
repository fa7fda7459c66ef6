pub mod engine;
pub mod memory;
pub mod version;

pub use engine::KeyValueStorage;
pub use memory::VersionedStore;
pub use version::{Payload, Version, VersionHistory};
