// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, NavError>;

/// Failures reported by the navigation cache.
///
/// The first three are ordinary negative answers that callers routinely
/// treat as "not found". The store variants mean the persisted state is
/// unusable until it is reset.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("No directory has been listed yet")]
    NotYetNavigated,

    #[error("Path '{name}' climbs {back} levels but only {depth} are known")]
    PathEscapesRoot {
        name: String,
        back: usize,
        depth: usize,
    },

    #[error("'{0}' not found in the current directory")]
    UnknownChild(String),

    #[error("Navigation state at {path} is corrupt: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Navigation state at {path} could not be accessed: {source}")]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NavError {
    pub fn path_escapes_root<S: AsRef<str>>(name: S, back: usize, depth: usize) -> Self {
        NavError::PathEscapesRoot {
            name: name.as_ref().to_string(),
            back,
            depth,
        }
    }

    pub fn unknown_child<S: AsRef<str>>(name: S) -> Self {
        NavError::UnknownChild(name.as_ref().to_string())
    }

    pub fn corrupt_store<P: AsRef<Path>, S: Into<String>>(path: P, reason: S) -> Self {
        NavError::CorruptStore {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn store_io<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        NavError::StoreIo {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// An expected negative outcome rather than a broken cache
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            NavError::NotYetNavigated | NavError::PathEscapesRoot { .. } | NavError::UnknownChild(_)
        )
    }

    /// Navigation cannot continue until the store is deleted or repaired
    #[must_use]
    pub fn needs_reset(&self) -> bool {
        matches!(self, NavError::CorruptStore { .. } | NavError::StoreIo { .. })
    }
}
