// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Durable storage of the navigation [`Stack`].
//!
//! The stack is written as a small versioned JSON record:
//!
//! ```json
//! {"version":1,"frames":[{"id":"top","name":"top","children":{"a":{"id":"f1","kind":"file"}}}]}
//! ```
//!
//! There is no locking between processes. Two invocations that save the
//! same store concurrently race, and the last `save` wins.

use crate::error::{NavError, Result};
use crate::frame::{Frame, Stack};
use diagnostics::{log_debug, log_error};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Current on-disk record version
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct StackRecordRef<'a> {
    version: u32,
    frames: &'a [Frame],
}

#[derive(Debug, Deserialize)]
struct StackRecord {
    version: u32,
    frames: Vec<Frame>,
}

/// A navigation stack persisted in a single file
#[derive(Debug, Clone)]
pub struct PersistedStack {
    path: PathBuf,
}

impl PersistedStack {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the stack. A missing file is an empty stack, not an error.
    pub fn load(&self) -> Result<Stack> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log_debug!("No navigation state at {path}, starting empty", path: self.display());
                return Ok(Stack::new());
            }
            Err(e) => return Err(NavError::store_io(&self.path, e)),
        };

        let stack = decode(&bytes).map_err(|reason| {
            log_error!("Corrupt navigation state at {path}: {reason}", path: self.display(), reason: reason.as_str());
            NavError::corrupt_store(&self.path, reason)
        })?;

        log_debug!("Loaded {depth} frames from {path}", depth: stack.depth(), path: self.display());
        Ok(stack)
    }

    /// Replace the stored stack atomically (temp file in the same directory,
    /// then rename over the target).
    pub fn save(&self, stack: &Stack) -> Result<()> {
        let bytes = encode(stack).map_err(|e| encode_failure(&self.path, e))?;
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| NavError::store_io(&self.path, e))?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(&dir).map_err(|e| NavError::store_io(&self.path, e))?;
        tmp.write_all(&bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| NavError::store_io(&self.path, e))?;
        let _ = tmp
            .persist(&self.path)
            .map_err(|e| NavError::store_io(&self.path, e.error))?;

        log_debug!("Saved {depth} frames to {path}", depth: stack.depth(), path: self.display());
        Ok(())
    }

    /// Remove the stored stack. Deleting a store that does not exist succeeds.
    pub fn delete(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                log_debug!("Deleted navigation state {path}", path: self.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(NavError::store_io(&self.path, e)),
        }
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serialize a stack in the current record format
pub fn encode(stack: &Stack) -> serde_json::Result<Vec<u8>> {
    let record = StackRecordRef {
        version: FORMAT_VERSION,
        frames: stack.frames(),
    };
    serde_json::to_vec(&record)
}

fn encode_failure(path: &Path, err: serde_json::Error) -> NavError {
    NavError::store_io(path, std::io::Error::from(err))
}

/// Parse and validate a stored record
pub fn decode(bytes: &[u8]) -> std::result::Result<Stack, String> {
    let record: StackRecord =
        serde_json::from_slice(bytes).map_err(|e| format!("not a frame record: {}", e))?;
    if record.version != FORMAT_VERSION {
        return Err(format!(
            "unsupported record version {} (expected {})",
            record.version, FORMAT_VERSION
        ));
    }
    let stack = Stack::from_frames(record.frames);
    stack.check_linkage()?;
    Ok(stack)
}
