// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The navigation cache used by storage backends.
//!
//! A backend resolves a typed name with [`NavigationCache::resolve`], runs
//! its remote operation against the returned id, and, for listings, hands
//! the children back through [`NavigationCache::record_listing`]. That is
//! the only call that changes the stack.

use crate::error::{NavError, Result};
use crate::frame::{Child, Children, Frame, PATH_SEPARATOR, ROOT_SENTINEL, Stack};
use crate::resolver::{Mode, PathResolver, Resolved, parent_back};
use crate::store::PersistedStack;
use diagnostics::{log_debug, log_warn};
use std::path::Path;

/// Whether a mutation reached disk
#[derive(Debug)]
#[must_use]
pub enum Durability {
    Persisted,
    /// The stack changed in memory but could not be saved
    InMemoryOnly(NavError),
}

impl Durability {
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        matches!(self, Durability::Persisted)
    }

    /// Turn an unsaved mutation back into an error
    pub fn into_result(self) -> Result<()> {
        match self {
            Durability::Persisted => Ok(()),
            Durability::InMemoryOnly(err) => Err(err),
        }
    }
}

pub struct NavigationCache {
    store: PersistedStack,
    /// Loaded on first use
    stack: Option<Stack>,
}

impl NavigationCache {
    #[must_use]
    pub fn new(store: PersistedStack) -> Self {
        Self { store, stack: None }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::new(PersistedStack::new(path.as_ref()))
    }

    #[must_use]
    pub fn store(&self) -> &PersistedStack {
        &self.store
    }

    fn stack(&mut self) -> Result<&mut Stack> {
        if self.stack.is_none() {
            self.stack = Some(self.store.load()?);
        }
        self.stack
            .as_mut()
            .ok_or(NavError::NotYetNavigated)
    }

    /// A copy of the current stack
    pub fn snapshot(&mut self) -> Result<Stack> {
        Ok(self.stack()?.clone())
    }

    pub fn depth(&mut self) -> Result<usize> {
        Ok(self.stack()?.depth())
    }

    /// Resolve a user-typed name to a provider id without changing the stack
    pub fn resolve(&mut self, raw: &str) -> Result<Resolved> {
        let mode = Mode::select(raw);
        let stack = self.stack()?;
        let resolved = PathResolver::new(stack).resolve(mode, raw)?;
        log_debug!("Resolved {raw} to {resolved}", raw: raw, resolved: format!("{:?}", resolved));
        Ok(resolved)
    }

    /// Record a successful remote listing of the directory `raw` resolved to.
    ///
    /// - empty stack: seed the root frame
    /// - `../` names: climb back to the resolved frame, dropping deeper frames,
    ///   and refresh its children
    /// - empty name: replace the current frame's children
    /// - child name: push a frame for the child
    ///
    /// Errors are returned before anything changes. A failed save is
    /// reported through [`Durability::InMemoryOnly`].
    pub fn record_listing(
        &mut self,
        raw: &str,
        resolved: &Resolved,
        children: Children,
    ) -> Result<Durability> {
        let stack = self.stack()?;

        if stack.is_empty() {
            log_debug!("Seeding root frame with {count} children", count: children.len());
            stack.push(Frame::root(children));
        } else {
            match Mode::select(raw) {
                Mode::Parent { back } => {
                    let depth = stack.depth();
                    if back > depth {
                        return Err(NavError::path_escapes_root(raw, back, depth));
                    }
                    let keep = depth - back + 1;
                    stack.truncate(keep);
                    if let Some(frame) = stack.last_mut() {
                        frame.children = children;
                    }
                    log_debug!("Climbed from depth {depth} to {keep}", depth: depth, keep: keep);
                }
                Mode::Current => {
                    if let Some(frame) = stack.last_mut() {
                        frame.children = children;
                        log_debug!("Refreshed children of {name}", name: frame.name.as_str());
                    }
                }
                Mode::Target => {
                    let id = resolved
                        .as_id()
                        .ok_or_else(|| NavError::unknown_child(raw))?;
                    let recorded = stack
                        .last()
                        .and_then(|frame| frame.children.get(raw))
                        .ok_or_else(|| NavError::unknown_child(raw))?;
                    if recorded.id != id {
                        return Err(NavError::unknown_child(raw));
                    }
                    stack.push(Frame::new(id, raw, children));
                    log_debug!("Pushed frame {name} at depth {depth}", name: raw, depth: stack.depth());
                }
            }
        }

        Ok(self.persist())
    }

    /// Render the stack as `/top/dir/...`
    pub fn current_path(&mut self) -> Result<String> {
        let stack = self.stack()?;
        if stack.depth() < 2 {
            return Ok(format!("{}{}", PATH_SEPARATOR, ROOT_SENTINEL));
        }
        let joined = stack.names().collect::<Vec<_>>().join(PATH_SEPARATOR);
        Ok(format!("{}{}", PATH_SEPARATOR, joined))
    }

    /// True when climbing by `raw`'s parent count would pass the root
    pub fn is_top_level(&mut self, raw: &str) -> Result<bool> {
        let depth = self.stack()?.depth();
        Ok(parent_back(raw) > depth)
    }

    /// What the last listing recorded about `raw` in the current directory
    pub fn child_kind(&mut self, raw: &str) -> Result<Child> {
        let frame = self.stack()?.last().ok_or(NavError::NotYetNavigated)?;
        frame
            .children
            .get(raw)
            .cloned()
            .ok_or_else(|| NavError::unknown_child(raw))
    }

    /// Drop a child the provider no longer knows about from the current frame.
    ///
    /// Returns `false` when there was nothing to forget.
    pub fn forget_child(&mut self, raw: &str) -> Result<bool> {
        let stack = self.stack()?;
        let removed = stack
            .last_mut()
            .map(|frame| frame.children.remove(raw).is_some())
            .unwrap_or(false);
        if !removed {
            return Ok(false);
        }
        log_debug!("Forgot stale child {name}", name: raw);
        self.persist().into_result()?;
        Ok(true)
    }

    /// Drop a directory the provider no longer knows about.
    ///
    /// An empty name means the current directory and `../` names mean the
    /// frame they climb to; child names fall back to [`Self::forget_child`].
    /// Frames below the vanished one go with it, and its entry is removed
    /// from the frame that listed it. The root frame always stays.
    pub fn abandon_directory(&mut self, raw: &str) -> Result<bool> {
        let mode = Mode::select(raw);
        if mode == Mode::Target {
            return self.forget_child(raw);
        }
        let stack = self.stack()?;
        let depth = stack.depth();
        let index = match mode {
            Mode::Parent { back } if back > depth => {
                return Err(NavError::path_escapes_root(raw, back, depth));
            }
            Mode::Parent { back } => depth - back,
            _ => depth.saturating_sub(1),
        };
        if index == 0 {
            return Ok(false);
        }
        let Some(vanished) = stack.get(index).map(|frame| frame.name.clone()) else {
            return Ok(false);
        };
        stack.truncate(index);
        if let Some(frame) = stack.last_mut() {
            let _ = frame.children.remove(&vanished);
        }
        log_debug!("Dropped vanished directory {name}, depth {depth} to {index}", name: vanished.as_str(), depth: depth, index: index);
        self.persist().into_result()?;
        Ok(true)
    }

    /// Forget all navigation state, on disk and in memory
    pub fn reset(&mut self) -> Result<()> {
        self.store.delete()?;
        self.stack = Some(Stack::new());
        Ok(())
    }

    fn persist(&mut self) -> Durability {
        let Some(stack) = self.stack.as_ref() else {
            return Durability::Persisted;
        };
        match self.store.save(stack) {
            Ok(()) => Durability::Persisted,
            Err(err) => {
                log_warn!("Navigation state not saved: {error}", error: err.to_string());
                Durability::InMemoryOnly(err)
            }
        }
    }
}
