// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Id and name of the synthetic root frame
pub const ROOT_SENTINEL: &str = "top";

/// Separator used when rendering the stack as a path
pub const PATH_SEPARATOR: &str = "/";

/// Kind of a remote entry as reported by the provider listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
        }
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File)
    }

    #[must_use]
    pub fn is_directory(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(EntryKind::File),
            "directory" => Ok(EntryKind::Directory),
            other => Err(format!("Unknown entry kind: {}", other)),
        }
    }
}

/// What a listing recorded about one child of a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub id: String,
    pub kind: EntryKind,
}

impl Child {
    pub fn new<S: Into<String>>(id: S, kind: EntryKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    pub fn file<S: Into<String>>(id: S) -> Self {
        Self::new(id, EntryKind::File)
    }

    pub fn directory<S: Into<String>>(id: S) -> Self {
        Self::new(id, EntryKind::Directory)
    }
}

/// Children of a directory keyed by name. Ordered so that an unchanged
/// stack serializes to identical bytes.
pub type Children = BTreeMap<String, Child>;

/// One level of the remembered path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub children: Children,
}

impl Frame {
    pub fn new<I: Into<String>, N: Into<String>>(id: I, name: N, children: Children) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children,
        }
    }

    /// The synthetic frame at index 0
    #[must_use]
    pub fn root(children: Children) -> Self {
        Self::new(ROOT_SENTINEL, ROOT_SENTINEL, children)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.id == ROOT_SENTINEL && self.name == ROOT_SENTINEL
    }
}

/// Root-to-current sequence of frames
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    frames: Vec<Frame>,
}

impl Stack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a stack from frames without checking the parent/child linkage.
    /// See [`Stack::check_linkage`].
    #[must_use]
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    #[must_use]
    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    #[must_use]
    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Keep only the first `len` frames
    pub fn truncate(&mut self, len: usize) {
        self.frames.truncate(len);
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Frame names from root to current
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(|f| f.name.as_str())
    }

    /// Check that frame 0 is the synthetic root and that every other frame
    /// is recorded as a child of the frame before it.
    ///
    /// Returns a description of the first violation found.
    pub fn check_linkage(&self) -> Result<(), String> {
        let Some(first) = self.frames.first() else {
            return Ok(());
        };
        if !first.is_root() {
            return Err(format!(
                "first frame is '{}' ({}), expected the root frame",
                first.name, first.id
            ));
        }
        for pair in self.frames.windows(2) {
            let (parent, child) = (&pair[0], &pair[1]);
            match parent.children.get(&child.name) {
                Some(entry) if entry.id == child.id => {}
                Some(entry) => {
                    return Err(format!(
                        "frame '{}' has id {} but its parent records {}",
                        child.name, child.id, entry.id
                    ));
                }
                None => {
                    return Err(format!(
                        "frame '{}' is not a child of '{}'",
                        child.name, parent.name
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn children(entries: &[(&str, Child)]) -> Children {
        entries
            .iter()
            .map(|(name, child)| (name.to_string(), child.clone()))
            .collect()
    }

    #[test]
    fn test_entry_kind_strings() {
        assert_eq!(EntryKind::File.to_string(), "file");
        assert_eq!("directory".parse::<EntryKind>(), Ok(EntryKind::Directory));
        assert!("symlink".parse::<EntryKind>().is_err());
    }

    #[test]
    fn test_entry_kind_serde() {
        let json = serde_json::to_string(&Child::directory("d1")).unwrap();
        assert_eq!(json, r#"{"id":"d1","kind":"directory"}"#);
    }

    #[test]
    fn test_linkage_ok() {
        let mut stack = Stack::new();
        stack.push(Frame::root(children(&[("docs", Child::directory("d1"))])));
        stack.push(Frame::new("d1", "docs", Children::new()));
        assert_eq!(stack.check_linkage(), Ok(()));
        assert_eq!(stack.names().collect::<Vec<_>>(), vec!["top", "docs"]);
    }

    #[test]
    fn test_linkage_rejects_orphan_frame() {
        let mut stack = Stack::new();
        stack.push(Frame::root(Children::new()));
        stack.push(Frame::new("d1", "docs", Children::new()));
        assert!(stack.check_linkage().is_err());
    }

    #[test]
    fn test_linkage_rejects_id_mismatch() {
        let mut stack = Stack::new();
        stack.push(Frame::root(children(&[("docs", Child::directory("d1"))])));
        stack.push(Frame::new("d2", "docs", Children::new()));
        assert!(stack.check_linkage().is_err());
    }

    #[test]
    fn test_linkage_rejects_non_root_first() {
        let stack = Stack::from_frames(vec![Frame::new("d1", "docs", Children::new())]);
        assert!(stack.check_linkage().is_err());
    }

    #[test]
    fn test_truncate_keeps_prefix() {
        let mut stack = Stack::new();
        stack.push(Frame::root(children(&[("a", Child::directory("1"))])));
        stack.push(Frame::new("1", "a", children(&[("b", Child::directory("2"))])));
        stack.push(Frame::new("2", "b", Children::new()));
        stack.truncate(1);
        assert_eq!(stack.depth(), 1);
        assert!(stack.frames()[0].is_root());
    }
}
