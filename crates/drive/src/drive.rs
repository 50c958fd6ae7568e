// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Filesystem verbs over a storage backend.
//!
//! Every remote call follows the same protocol: resolve the typed name
//! through the [`NavigationCache`], call the backend with the resolved id,
//! and record listings back into the cache.

use crate::backend::{Listing, Properties, StorageBackend};
use crate::error::{BackendError, DriveError, Result};
use diagnostics::{log_debug, log_info, log_warn};
use navcache::{Durability, Mode, NavigationCache, Resolved};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Drive {
    backend: Arc<dyn StorageBackend>,
    cache: NavigationCache,
}

impl Drive {
    pub fn new(backend: Arc<dyn StorageBackend>, cache: NavigationCache) -> Self {
        Self { backend, cache }
    }

    #[must_use]
    pub fn storage_name(&self) -> &str {
        self.backend.storage_name()
    }

    #[must_use]
    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    pub fn cache(&mut self) -> &mut NavigationCache {
        &mut self.cache
    }

    fn remote_id(&self, resolved: &Resolved) -> String {
        resolved.or_root(self.backend.root_id()).to_string()
    }

    fn require_name(name: &str) -> Result<()> {
        if name.is_empty() {
            Err(DriveError::EmptyName)
        } else {
            Ok(())
        }
    }

    /// Log a mutation that could not be saved; the command carries on
    fn note(durability: Durability) {
        if let Durability::InMemoryOnly(err) = durability {
            log_warn!("Continuing with unsaved navigation state: {error}", error: err.to_string());
        }
    }

    /// Translate a backend failure for an id that came from the cache.
    /// Whatever vanished remotely is dropped from the cache: a child from
    /// the current frame, a directory along with the frames below it.
    fn backend_failure(&mut self, name: &str, err: BackendError) -> DriveError {
        match err {
            BackendError::NotFound(id) => {
                let shown = self.display_name(name);
                log_info!("{name} ({id}) is gone from the remote store", name: shown.as_str(), id: id.as_str());
                match self.cache.abandon_directory(name) {
                    Ok(_) => DriveError::Stale(shown),
                    Err(nav) => nav.into(),
                }
            }
            other => other.into(),
        }
    }

    fn display_name(&mut self, name: &str) -> String {
        if name.is_empty() {
            self.cache.current_path().unwrap_or_default()
        } else {
            name.to_string()
        }
    }

    /// List a directory. With `record`, the listing becomes the new
    /// navigation position (`cd`); an empty name always refreshes the
    /// current frame.
    pub async fn list(&mut self, name: &str, record: bool) -> Result<Listing> {
        if self.is_file(name)? {
            return Err(DriveError::NotADirectory(name.to_string()));
        }
        let resolved = self.cache.resolve(name)?;
        let id = self.remote_id(&resolved);
        log_debug!("Listing {name} as {id}", name: name, id: id.as_str());

        let result = self.backend.list_children(&id).await;
        let listing = match result {
            Ok(listing) => listing,
            Err(BackendError::NotADirectory(_)) => {
                return Err(DriveError::NotADirectory(name.to_string()));
            }
            Err(err) => return Err(self.backend_failure(name, err)),
        };

        if record || name.is_empty() {
            Self::note(self.cache.record_listing(name, &resolved, listing.clone())?);
        }
        Ok(listing)
    }

    /// Re-list the current directory and record it
    pub async fn refresh(&mut self) -> Result<Listing> {
        self.list("", true).await
    }

    pub fn current_dir(&mut self) -> Result<String> {
        Ok(self.cache.current_path()?)
    }

    /// Whether `name` exists in the current directory. `../` names are
    /// answered from the cache alone.
    pub async fn exists(&mut self, name: &str) -> Result<bool> {
        Self::require_name(name)?;
        if let Mode::Parent { .. } = Mode::select(name) {
            return Ok(!self.cache.is_top_level(name)?);
        }
        let listing = self.refresh().await?;
        Ok(listing.contains_key(name))
    }

    /// Whether the cache records `name` as a file. Never touches the network.
    pub fn is_file(&mut self, name: &str) -> Result<bool> {
        if Mode::select(name) != Mode::Target {
            return Ok(false);
        }
        match self.cache.child_kind(name) {
            Ok(child) => Ok(child.kind.is_file()),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Whether the directory `name` has any children
    pub async fn has_children(&mut self, name: &str) -> Result<bool> {
        Self::require_name(name)?;
        if self.is_file(name)? {
            return Ok(false);
        }
        let resolved = self.cache.resolve(name)?;
        let id = self.remote_id(&resolved);
        let result = self.backend.properties(&id).await;
        match result {
            Ok(props) => Ok(props.child_count > 0),
            Err(err) => Err(self.backend_failure(name, err)),
        }
    }

    pub async fn properties(&mut self, name: &str) -> Result<Properties> {
        Self::require_name(name)?;
        if !self.exists(name).await? {
            return Err(DriveError::NotFound(name.to_string()));
        }
        let resolved = self.cache.resolve(name)?;
        let id = self.remote_id(&resolved);
        let result = self.backend.properties(&id).await;
        match result {
            Ok(props) => Ok(props),
            Err(err) => Err(self.backend_failure(name, err)),
        }
    }

    /// Download the file `name` into `dest_dir`, returning the local path
    pub async fn download(&mut self, name: &str, dest_dir: &Path) -> Result<PathBuf> {
        Self::require_name(name)?;
        let resolved = self.cache.resolve(name)?;
        if !self.is_file(name)? {
            return Err(DriveError::NotAFile(name.to_string()));
        }
        let id = self.remote_id(&resolved);
        let result = self.backend.download(&id).await;
        let content = match result {
            Ok(content) => content,
            Err(err) => return Err(self.backend_failure(name, err)),
        };
        let target = dest_dir.join(name);
        tokio::fs::write(&target, &content).await?;
        log_info!("Downloaded {name} ({size} bytes)", name: name, size: content.len());
        Ok(target)
    }

    /// Upload a local file into the current directory, returning its remote name.
    /// An existing remote entry of the same name is only replaced with `overwrite`.
    pub async fn upload(&mut self, local: &Path, overwrite: bool) -> Result<String> {
        if local.as_os_str().is_empty() {
            return Err(DriveError::EmptyName);
        }
        let metadata = match tokio::fs::metadata(local).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DriveError::LocalNotFound(local.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        if metadata.is_dir() {
            return Err(DriveError::DirectoryUpload(local.to_path_buf()));
        }
        let name = local
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DriveError::InvalidName(local.display().to_string()))?
            .to_string();

        if !overwrite && self.exists(&name).await? {
            return Err(DriveError::AlreadyExists(name));
        }
        let parent = self.cache.resolve("")?;
        let parent_id = self.remote_id(&parent);
        let content = tokio::fs::read(local).await?;
        let size = content.len();
        let result = self.backend.upload(&parent_id, &name, content).await;
        if let Err(err) = result {
            return Err(match err {
                BackendError::AlreadyExists(_) => DriveError::AlreadyExists(name),
                other => self.backend_failure("", other),
            });
        }
        log_info!("Uploaded {name} ({size} bytes)", name: name.as_str(), size: size);
        let _ = self.refresh().await?;
        Ok(name)
    }

    /// Delete a file or directory in the current directory
    pub async fn delete(&mut self, name: &str) -> Result<()> {
        Self::require_name(name)?;
        if Mode::select(name) != Mode::Target {
            return Err(DriveError::InvalidName(name.to_string()));
        }
        let resolved = self.cache.resolve(name)?;
        let id = self.remote_id(&resolved);
        let result = self.backend.delete(&id).await;
        if let Err(err) = result {
            return Err(self.backend_failure(name, err));
        }
        log_info!("Deleted {name}", name: name);
        let _ = self.refresh().await?;
        Ok(())
    }

    /// Create a directory in the current directory
    pub async fn mkdir(&mut self, name: &str) -> Result<()> {
        Self::require_name(name)?;
        if Mode::select(name) != Mode::Target || name.contains('/') {
            return Err(DriveError::InvalidName(name.to_string()));
        }
        if self.exists(name).await? {
            return Err(DriveError::AlreadyExists(name.to_string()));
        }
        let parent = self.cache.resolve("")?;
        let parent_id = self.remote_id(&parent);
        let result = self.backend.mkdir(&parent_id, name).await;
        if let Err(err) = result {
            return Err(match err {
                BackendError::AlreadyExists(_) => DriveError::AlreadyExists(name.to_string()),
                other => self.backend_failure("", other),
            });
        }
        log_info!("Created directory {name}", name: name);
        let _ = self.refresh().await?;
        Ok(())
    }

    /// Forget all navigation state
    pub fn reset(&mut self) -> Result<()> {
        self.cache.reset()?;
        log_info!("Navigation state reset for {storage}", storage: self.backend.storage_name());
        Ok(())
    }

    /// Start over at the provider root: reset, then record a root listing
    pub async fn bootstrap(&mut self) -> Result<Listing> {
        self.reset()?;
        self.refresh().await
    }
}
