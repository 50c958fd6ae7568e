//! In-memory storage backend.
//!
//! Objects get OneDrive-style ids (`folder.<uuid7>`, `file.<uuid7>`).
//! Contents live as long as the backend value, so this is mostly useful
//! for tests and for driving the cache without a provider.

use crate::backend::{Listing, Properties, StorageBackend};
use crate::error::BackendError;
use async_trait::async_trait;
use navcache::{Child, EntryKind};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

pub const MEMORY_ROOT_ID: &str = "root";

#[derive(Debug)]
struct Node {
    name: String,
    parent: Option<String>,
    kind: EntryKind,
    content: Vec<u8>,
    /// name -> id, directories only
    entries: BTreeMap<String, String>,
}

#[derive(Debug)]
struct State {
    nodes: HashMap<String, Node>,
}

impl Default for State {
    fn default() -> Self {
        let root = Node {
            name: String::new(),
            parent: None,
            kind: EntryKind::Directory,
            content: Vec::new(),
            entries: BTreeMap::new(),
        };
        Self {
            nodes: HashMap::from([(MEMORY_ROOT_ID.to_string(), root)]),
        }
    }
}

impl State {
    fn node(&self, id: &str) -> Result<&Node, BackendError> {
        self.nodes.get(id).ok_or_else(|| BackendError::not_found(id))
    }

    fn directory(&self, id: &str) -> Result<&Node, BackendError> {
        let node = self.node(id)?;
        if node.kind.is_directory() {
            Ok(node)
        } else {
            Err(BackendError::NotADirectory(id.to_string()))
        }
    }

    fn insert(
        &mut self,
        parent_id: &str,
        name: &str,
        kind: EntryKind,
        content: Vec<u8>,
    ) -> Result<String, BackendError> {
        if name.is_empty() || name.contains('/') {
            return Err(BackendError::other(format!("invalid entry name '{}'", name)));
        }
        if let Some(existing) = self.directory(parent_id)?.entries.get(name).cloned() {
            let node = self
                .nodes
                .get_mut(&existing)
                .ok_or_else(|| BackendError::not_found(&existing))?;
            return match (node.kind, kind) {
                (EntryKind::File, EntryKind::File) => {
                    node.content = content;
                    Ok(existing)
                }
                _ => Err(BackendError::AlreadyExists(name.to_string())),
            };
        }

        let prefix = match kind {
            EntryKind::File => "file",
            EntryKind::Directory => "folder",
        };
        let id = format!("{}.{}", prefix, uuid7::uuid7());
        let node = Node {
            name: name.to_string(),
            parent: Some(parent_id.to_string()),
            kind,
            content,
            entries: BTreeMap::new(),
        };
        let _ = self.nodes.insert(id.clone(), node);
        if let Some(parent) = self.nodes.get_mut(parent_id) {
            let _ = parent.entries.insert(name.to_string(), id.clone());
        }
        Ok(id)
    }

    fn remove(&mut self, id: &str) -> Result<(), BackendError> {
        if id == MEMORY_ROOT_ID {
            return Err(BackendError::other("the root cannot be deleted"));
        }
        let node = self
            .nodes
            .remove(id)
            .ok_or_else(|| BackendError::not_found(id))?;
        if let Some(parent) = node.parent.as_ref().and_then(|p| self.nodes.get_mut(p)) {
            let _ = parent.entries.remove(&node.name);
        }
        let mut pending: Vec<String> = node.entries.into_values().collect();
        while let Some(child) = pending.pop() {
            if let Some(removed) = self.nodes.remove(&child) {
                pending.extend(removed.entries.into_values());
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory and return its id
    pub async fn create_dir(&self, parent_id: &str, name: &str) -> Result<String, BackendError> {
        self.state
            .lock()
            .await
            .insert(parent_id, name, EntryKind::Directory, Vec::new())
    }

    /// Create or overwrite a file and return its id
    pub async fn create_file(
        &self,
        parent_id: &str,
        name: &str,
        content: &[u8],
    ) -> Result<String, BackendError> {
        self.state
            .lock()
            .await
            .insert(parent_id, name, EntryKind::File, content.to_vec())
    }

    /// Number of objects, root included
    pub async fn object_count(&self) -> usize {
        self.state.lock().await.nodes.len()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn storage_name(&self) -> &str {
        "memory"
    }

    fn root_id(&self) -> &str {
        MEMORY_ROOT_ID
    }

    async fn list_children(&self, id: &str) -> Result<Listing, BackendError> {
        let state = self.state.lock().await;
        let dir = state.directory(id)?;
        let mut listing = Listing::new();
        for (name, child_id) in &dir.entries {
            let child = state.node(child_id)?;
            let _ = listing.insert(name.clone(), Child::new(child_id.clone(), child.kind));
        }
        Ok(listing)
    }

    async fn properties(&self, id: &str) -> Result<Properties, BackendError> {
        let state = self.state.lock().await;
        let node = state.node(id)?;
        let mut props = Properties::default();
        props.insert("id", id);
        props.insert("name", node.name.as_str());
        props.insert("type", node.kind.as_str());
        if node.kind.is_file() {
            props.insert("size", node.content.len().to_string());
        }
        props.child_count = node.entries.len();
        props.insert("count", props.child_count.to_string());
        Ok(props)
    }

    async fn download(&self, id: &str) -> Result<Vec<u8>, BackendError> {
        let state = self.state.lock().await;
        let node = state.node(id)?;
        if !node.kind.is_file() {
            return Err(BackendError::NotAFile(id.to_string()));
        }
        Ok(node.content.clone())
    }

    async fn upload(&self, parent_id: &str, name: &str, content: Vec<u8>) -> Result<(), BackendError> {
        let _ = self
            .state
            .lock()
            .await
            .insert(parent_id, name, EntryKind::File, content)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), BackendError> {
        self.state.lock().await.remove(id)
    }

    async fn mkdir(&self, parent_id: &str, name: &str) -> Result<(), BackendError> {
        let _ = self.create_dir(parent_id, name).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_list() {
        let backend = MemoryBackend::new();
        let docs = backend.create_dir(MEMORY_ROOT_ID, "docs").await.unwrap();
        let file = backend.create_file(&docs, "x.txt", b"hello").await.unwrap();
        assert!(docs.starts_with("folder."));
        assert!(file.starts_with("file."));

        let root = backend.list_children(MEMORY_ROOT_ID).await.unwrap();
        assert_eq!(root.get("docs"), Some(&Child::directory(docs.clone())));

        let listing = backend.list_children(&docs).await.unwrap();
        assert_eq!(listing.get("x.txt"), Some(&Child::file(file.clone())));
        assert_eq!(backend.download(&file).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_upload_overwrites_file() {
        let backend = MemoryBackend::new();
        let first = backend.create_file(MEMORY_ROOT_ID, "a", b"1").await.unwrap();
        backend.upload(MEMORY_ROOT_ID, "a", b"2".to_vec()).await.unwrap();
        assert_eq!(backend.download(&first).await.unwrap(), b"2");

        let _ = backend.create_dir(MEMORY_ROOT_ID, "d").await.unwrap();
        let err = backend.upload(MEMORY_ROOT_ID, "d", Vec::new()).await.unwrap_err();
        assert!(matches!(err, BackendError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_delete_is_recursive() {
        let backend = MemoryBackend::new();
        let docs = backend.create_dir(MEMORY_ROOT_ID, "docs").await.unwrap();
        let sub = backend.create_dir(&docs, "sub").await.unwrap();
        let _ = backend.create_file(&sub, "deep.txt", b"x").await.unwrap();
        assert_eq!(backend.object_count().await, 4);

        backend.delete(&docs).await.unwrap();
        assert_eq!(backend.object_count().await, 1);
        assert!(backend.list_children(MEMORY_ROOT_ID).await.unwrap().is_empty());
        assert!(matches!(
            backend.list_children(&sub).await,
            Err(BackendError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_properties() {
        let backend = MemoryBackend::new();
        let docs = backend.create_dir(MEMORY_ROOT_ID, "docs").await.unwrap();
        let _ = backend.create_file(&docs, "x.txt", b"hello").await.unwrap();

        let props = backend.properties(&docs).await.unwrap();
        assert_eq!(props.child_count, 1);
        assert_eq!(props.get("type"), Some("directory"));
        assert_eq!(props.get("count"), Some("1"));
    }

    #[tokio::test]
    async fn test_list_file_is_not_a_directory() {
        let backend = MemoryBackend::new();
        let file = backend.create_file(MEMORY_ROOT_ID, "a", b"1").await.unwrap();
        assert!(matches!(
            backend.list_children(&file).await,
            Err(BackendError::NotADirectory(_))
        ));
    }
}
