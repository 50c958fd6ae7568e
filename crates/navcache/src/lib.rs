// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Directory-navigation cache for ID-addressed remote stores.
//!
//! Remote providers only list the children of an id. This crate remembers
//! the path the user has walked (a [`Stack`] of [`Frame`]s), persists it
//! between command invocations, and turns typed names (`""`, `docs`,
//! `../../`) into provider ids without walking the tree from the root.

mod cache;
mod error;
mod frame;
mod resolver;
mod store;

pub use cache::{Durability, NavigationCache};
pub use error::{NavError, Result};
pub use frame::{Child, Children, EntryKind, Frame, PATH_SEPARATOR, ROOT_SENTINEL, Stack};
pub use resolver::{Mode, PARENT_MARKER, PathResolver, Resolved, parent_back, resolve};
pub use store::{FORMAT_VERSION, PersistedStack, decode, encode};
