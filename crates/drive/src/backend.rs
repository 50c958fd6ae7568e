// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::BackendError;
use async_trait::async_trait;
use navcache::Children;
use std::collections::BTreeMap;

/// A remote directory listing: child name to `{id, kind}`
pub type Listing = Children;

/// Metadata a backend reports for one object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    /// Display properties in key order (`name`, `size`, `modified_time`, ...)
    pub entries: BTreeMap<String, String>,
    /// Number of direct children; zero for files
    pub child_count: usize,
}

impl Properties {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let _ = self.entries.insert(key.into(), value.into());
    }
}

/// A provider-hosted store addressed by opaque ids.
///
/// Every id a backend receives either came from one of its own listings or
/// is its [`root_id`](StorageBackend::root_id).
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Short name used for display and for naming the navigation state file
    fn storage_name(&self) -> &str;

    /// The id that stands for the provider's own root
    fn root_id(&self) -> &str;

    async fn list_children(&self, id: &str) -> Result<Listing, BackendError>;

    async fn properties(&self, id: &str) -> Result<Properties, BackendError>;

    async fn download(&self, id: &str) -> Result<Vec<u8>, BackendError>;

    /// Create or replace the file `name` inside `parent_id`
    async fn upload(&self, parent_id: &str, name: &str, content: Vec<u8>) -> Result<(), BackendError>;

    /// Delete a file or a directory with everything below it
    async fn delete(&self, id: &str) -> Result<(), BackendError>;

    async fn mkdir(&self, parent_id: &str, name: &str) -> Result<(), BackendError>;
}
