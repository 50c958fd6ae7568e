// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Translation of user-typed names into provider ids.
//!
//! Resolution never touches the stack it reads. A name is resolved in one
//! of three modes, chosen by [`Mode::select`]:
//!
//! - `Current`: empty name, the directory the user is in
//! - `Parent`: the name contains `../`, climb `count + 1` frames
//! - `Target`: anything else, a child of the current directory

use crate::error::{NavError, Result};
use crate::frame::Stack;

/// Literal marker for one level up
pub const PARENT_MARKER: &str = "../";

/// Number of frames a parent-mode name climbs: one per literal `../`
/// occurrence, plus the current frame itself.
#[must_use]
pub fn parent_back(raw: &str) -> usize {
    raw.matches(PARENT_MARKER).count() + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Current,
    Parent { back: usize },
    Target,
}

impl Mode {
    /// Pick the resolution mode for a raw user-typed name
    #[must_use]
    pub fn select(raw: &str) -> Self {
        if raw.is_empty() {
            Mode::Current
        } else if raw.contains(PARENT_MARKER) {
            Mode::Parent {
                back: parent_back(raw),
            }
        } else {
            Mode::Target
        }
    }
}

/// Outcome of a successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Use the backend's own notion of root
    ProviderRoot,
    /// A concrete provider id taken from the stack
    Id(String),
}

impl Resolved {
    #[must_use]
    pub fn as_id(&self) -> Option<&str> {
        match self {
            Resolved::ProviderRoot => None,
            Resolved::Id(id) => Some(id),
        }
    }

    /// The id to send to a backend whose root id is `root`
    #[must_use]
    pub fn or_root<'a>(&'a self, root: &'a str) -> &'a str {
        self.as_id().unwrap_or(root)
    }
}

/// Read-only resolver over a borrowed stack
pub struct PathResolver<'a> {
    stack: &'a Stack,
}

impl<'a> PathResolver<'a> {
    #[must_use]
    pub fn new(stack: &'a Stack) -> Self {
        Self { stack }
    }

    pub fn resolve(&self, mode: Mode, raw: &str) -> Result<Resolved> {
        match mode {
            Mode::Current => Ok(self.current()),
            Mode::Parent { back } => self.parent(raw, back),
            Mode::Target => self.target(raw),
        }
    }

    fn current(&self) -> Resolved {
        if self.stack.depth() < 2 {
            return Resolved::ProviderRoot;
        }
        match self.stack.last() {
            Some(frame) => Resolved::Id(frame.id.clone()),
            None => Resolved::ProviderRoot,
        }
    }

    fn parent(&self, raw: &str, back: usize) -> Result<Resolved> {
        let depth = self.stack.depth();
        if depth == 0 {
            return Err(NavError::NotYetNavigated);
        }
        if back > depth {
            return Err(NavError::path_escapes_root(raw, back, depth));
        }
        let index = depth - back;
        if index == 0 {
            return Ok(Resolved::ProviderRoot);
        }
        self.stack
            .get(index)
            .map(|frame| Resolved::Id(frame.id.clone()))
            .ok_or_else(|| NavError::path_escapes_root(raw, back, depth))
    }

    fn target(&self, raw: &str) -> Result<Resolved> {
        let frame = self.stack.last().ok_or(NavError::NotYetNavigated)?;
        frame
            .children
            .get(raw)
            .map(|child| Resolved::Id(child.id.clone()))
            .ok_or_else(|| NavError::unknown_child(raw))
    }
}

/// Select the mode for `raw` and resolve it against `stack`
pub fn resolve(stack: &Stack, raw: &str) -> Result<Resolved> {
    PathResolver::new(stack).resolve(Mode::select(raw), raw)
}
