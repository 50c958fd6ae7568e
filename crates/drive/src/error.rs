use navcache::NavError;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, DriveError>;

/// What a storage backend reports about a remote operation
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Remote object not found: {0}")]
    NotFound(String),

    #[error("Remote entry already exists: {0}")]
    AlreadyExists(String),

    #[error("Remote object is not a directory: {0}")]
    NotADirectory(String),

    #[error("Remote object is not a file: {0}")]
    NotAFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    Other(String),
}

impl BackendError {
    pub fn not_found<S: AsRef<str>>(id: S) -> Self {
        BackendError::NotFound(id.as_ref().to_string())
    }

    pub fn other<S: Into<String>>(msg: S) -> Self {
        BackendError::Other(msg.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    #[error(transparent)]
    Nav(#[from] NavError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Config error in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File name is not set")]
    EmptyName,

    #[error("Invalid name for this operation: {0}")]
    InvalidName(String),

    #[error("Target is not a file: {0}")]
    NotAFile(String),

    #[error("Target is not a directory: {0}")]
    NotADirectory(String),

    #[error("'{0}' does not exist on the remote store")]
    NotFound(String),

    #[error("'{}' does not exist locally", .0.display())]
    LocalNotFound(PathBuf),

    #[error("'{0}' already exists on the remote store")]
    AlreadyExists(String),

    #[error("Directories cannot be uploaded: {}", .0.display())]
    DirectoryUpload(PathBuf),

    #[error("'{0}' no longer exists on the remote store; the local listing was updated")]
    Stale(String),
}

impl DriveError {
    /// The local navigation state must be reset before retrying
    #[must_use]
    pub fn needs_reset(&self) -> bool {
        matches!(self, DriveError::Nav(err) if err.needs_reset())
    }

    /// A plain "not found" outcome
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            DriveError::Nav(err) => err.is_not_found(),
            DriveError::Backend(BackendError::NotFound(_)) => true,
            DriveError::NotFound(_) | DriveError::Stale(_) | DriveError::LocalNotFound(_) => true,
            _ => false,
        }
    }
}
