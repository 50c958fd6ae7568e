use crate::backend::StorageBackend;
use crate::config::{Config, StorageConfig};
use crate::drive::Drive;
use crate::error::Result;
use crate::hostdir::HostDirBackend;
use crate::memory::MemoryBackend;
use navcache::NavigationCache;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a command needs to reach one store, passed explicitly
#[derive(Debug, Clone)]
pub struct DriveContext {
    pub config: Config,
    pub session_id: Option<String>,
}

impl DriveContext {
    #[must_use]
    pub fn new(config: Config, session_id: Option<String>) -> Self {
        Self { config, session_id }
    }

    pub fn backend(&self) -> Result<Arc<dyn StorageBackend>> {
        let backend: Arc<dyn StorageBackend> = match &self.config.storage {
            StorageConfig::HostDir { root } => Arc::new(HostDirBackend::new(root.clone())?),
            StorageConfig::Memory => Arc::new(MemoryBackend::new()),
        };
        Ok(backend)
    }

    /// Navigation state file for the configured storage and session
    #[must_use]
    pub fn list_file(&self) -> PathBuf {
        self.config
            .list_file(self.config.storage.storage_name(), self.session_id.as_deref())
    }

    pub fn open_drive(&self) -> Result<Drive> {
        let backend = self.backend()?;
        let cache = NavigationCache::open(self.list_file());
        Ok(Drive::new(backend, cache))
    }
}
