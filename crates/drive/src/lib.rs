//! Storage backends and the filesystem verbs built on the navigation cache.

mod backend;
mod config;
mod context;
mod drive;
mod error;
pub mod hostdir;
pub mod memory;

pub use backend::{Listing, Properties, StorageBackend};
pub use config::{CONFIG_ENV, Config, DEFAULT_CONFIG_FILE, StorageConfig};
pub use context::DriveContext;
pub use drive::Drive;
pub use error::{BackendError, DriveError, Result};
pub use hostdir::HostDirBackend;
pub use memory::MemoryBackend;
