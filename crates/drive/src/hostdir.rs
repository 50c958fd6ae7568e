// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Host directory as an ID-addressed store.
//!
//! A local directory stands in for a remote provider. Ids are the
//! root-relative path prefixed with the entry kind (`folder:docs/a`,
//! `file:docs/a/x.txt`); the root itself is `root`. Nothing outside the
//! root can be addressed.

use crate::backend::{Listing, Properties, StorageBackend};
use crate::error::BackendError;
use async_trait::async_trait;
use diagnostics::log_debug;
use navcache::{Child, EntryKind};
use std::path::{Component, Path, PathBuf};

pub const HOSTDIR_ROOT_ID: &str = "root";

const FOLDER_PREFIX: &str = "folder:";
const FILE_PREFIX: &str = "file:";

pub struct HostDirBackend {
    root: PathBuf,
}

impl HostDirBackend {
    /// The root must be an existing directory
    pub fn new<P: Into<PathBuf>>(root: P) -> Result<Self, BackendError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(BackendError::other(format!(
                "host root {} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn make_id(rel: &Path, kind: EntryKind) -> String {
        let rel = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        match kind {
            EntryKind::Directory => format!("{}{}", FOLDER_PREFIX, rel),
            EntryKind::File => format!("{}{}", FILE_PREFIX, rel),
        }
    }

    /// Map an id back to its root-relative path and expected kind
    fn parse_id(id: &str) -> Result<(PathBuf, EntryKind), BackendError> {
        if id == HOSTDIR_ROOT_ID {
            return Ok((PathBuf::new(), EntryKind::Directory));
        }
        let (rel, kind) = if let Some(rel) = id.strip_prefix(FOLDER_PREFIX) {
            (rel, EntryKind::Directory)
        } else if let Some(rel) = id.strip_prefix(FILE_PREFIX) {
            (rel, EntryKind::File)
        } else {
            return Err(BackendError::not_found(id));
        };
        let rel = PathBuf::from(rel);
        if rel.as_os_str().is_empty()
            || !rel.components().all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(BackendError::not_found(id));
        }
        Ok((rel, kind))
    }

    /// Host path for an id, checking that it still exists with the recorded kind
    async fn locate(&self, id: &str) -> Result<(PathBuf, PathBuf, EntryKind), BackendError> {
        let (rel, kind) = Self::parse_id(id)?;
        let path = self.root.join(&rel);
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BackendError::not_found(id));
            }
            Err(e) => return Err(e.into()),
        };
        if metadata.is_dir() != kind.is_directory() {
            return Err(BackendError::not_found(id));
        }
        Ok((rel, path, kind))
    }

    async fn locate_dir(&self, id: &str) -> Result<(PathBuf, PathBuf), BackendError> {
        let (rel, path, kind) = self.locate(id).await?;
        if !kind.is_directory() {
            return Err(BackendError::NotADirectory(id.to_string()));
        }
        Ok((rel, path))
    }

    fn check_name(name: &str) -> Result<(), BackendError> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) if !name.contains('/') => Ok(()),
            _ => Err(BackendError::other(format!("invalid entry name '{}'", name))),
        }
    }
}

#[async_trait]
impl StorageBackend for HostDirBackend {
    fn storage_name(&self) -> &str {
        "hostdir"
    }

    fn root_id(&self) -> &str {
        HOSTDIR_ROOT_ID
    }

    async fn list_children(&self, id: &str) -> Result<Listing, BackendError> {
        let (rel, path) = self.locate_dir(id).await?;
        let mut listing = Listing::new();
        let mut entries = tokio::fs::read_dir(&path).await?;
        while let Some(entry) = entries.next_entry().await? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            // Symlinks are followed; ones that lead nowhere are left out
            let metadata = match tokio::fs::metadata(entry.path()).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    log_debug!("Skipping {name}: {error}", name: name.as_str(), error: e.to_string());
                    continue;
                }
            };
            let kind = if metadata.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            let child_id = Self::make_id(&rel.join(&name), kind);
            let _ = listing.insert(name, Child::new(child_id, kind));
        }
        log_debug!("Listed {count} entries under {dir}", count: listing.len(), dir: id);
        Ok(listing)
    }

    async fn properties(&self, id: &str) -> Result<Properties, BackendError> {
        let (rel, path, kind) = self.locate(id).await?;
        let metadata = tokio::fs::metadata(&path).await?;
        let mut props = Properties::default();
        props.insert("id", id);
        let name = rel
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(HOSTDIR_ROOT_ID);
        props.insert("name", name);
        props.insert("type", kind.as_str());
        if let Ok(modified) = metadata.modified() {
            let modified = chrono::DateTime::<chrono::Utc>::from(modified);
            props.insert("modified_time", modified.format("%Y-%m-%d %H:%M:%S").to_string());
        }
        if kind.is_file() {
            props.insert("size", metadata.len().to_string());
        } else {
            let mut entries = tokio::fs::read_dir(&path).await?;
            while entries.next_entry().await?.is_some() {
                props.child_count += 1;
            }
            props.insert("count", props.child_count.to_string());
        }
        Ok(props)
    }

    async fn download(&self, id: &str) -> Result<Vec<u8>, BackendError> {
        let (_, path, kind) = self.locate(id).await?;
        if !kind.is_file() {
            return Err(BackendError::NotAFile(id.to_string()));
        }
        Ok(tokio::fs::read(&path).await?)
    }

    async fn upload(&self, parent_id: &str, name: &str, content: Vec<u8>) -> Result<(), BackendError> {
        Self::check_name(name)?;
        let (_, dir) = self.locate_dir(parent_id).await?;
        let target = dir.join(name);
        if target.is_dir() {
            return Err(BackendError::AlreadyExists(name.to_string()));
        }
        tokio::fs::write(&target, content).await?;
        log_debug!("Wrote {path}", path: target.display().to_string());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), BackendError> {
        if id == HOSTDIR_ROOT_ID {
            return Err(BackendError::other("the root cannot be deleted"));
        }
        let (_, path, kind) = self.locate(id).await?;
        match kind {
            EntryKind::Directory => tokio::fs::remove_dir_all(&path).await?,
            EntryKind::File => tokio::fs::remove_file(&path).await?,
        }
        Ok(())
    }

    async fn mkdir(&self, parent_id: &str, name: &str) -> Result<(), BackendError> {
        Self::check_name(name)?;
        let (_, dir) = self.locate_dir(parent_id).await?;
        match tokio::fs::create_dir(dir.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(BackendError::AlreadyExists(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
