use crate::error::{DriveError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file used when neither `--config` nor the environment names one
pub const DEFAULT_CONFIG_FILE: &str = "cloudnav.yml";

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "CLOUDNAV_CONFIG";

/// Which store the CLI talks to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageConfig {
    /// A local directory presented as an ID-addressed store
    HostDir { root: PathBuf },
    /// Scratch store; contents last for one process
    Memory,
}

impl StorageConfig {
    #[must_use]
    pub fn storage_name(&self) -> &'static str {
        match self {
            StorageConfig::HostDir { .. } => "hostdir",
            StorageConfig::Memory => "memory",
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::HostDir {
            root: PathBuf::from("./remote"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding per-storage navigation state
    pub data_path: PathBuf,
    /// Key navigation state by session id when one is given
    pub session: bool,
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("./data"),
            session: false,
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Read a config file. A missing file gives the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_yaml_str(&text).map_err(|source| DriveError::Config {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_yaml_str(text: &str) -> std::result::Result<Self, serde_yaml_ng::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(text)
    }

    pub fn to_yaml_string(&self) -> std::result::Result<String, serde_yaml_ng::Error> {
        serde_yaml_ng::to_string(self)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_yaml_string().map_err(|source| DriveError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Path of the navigation state for `storage`, optionally per session
    #[must_use]
    pub fn list_file(&self, storage: &str, session_id: Option<&str>) -> PathBuf {
        let file = match session_id.filter(|s| self.session && !s.is_empty()) {
            Some(session) => format!("{}_list_{}.json", storage, session),
            None => format!("{}_list.json", storage),
        };
        self.data_path.join(file)
    }
}
