// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Strata remote SDK.
//!
//! This crate provides the provider trait, the dynamic property value
//! model, the error taxonomy, and the commit query utilities shared by
//! the registry, the RPC bridge, and provider implementations.

pub mod commits;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use commits::{match_tags, sort_commits, validate_fields};
pub use error::StrataError;
pub use traits::Provider;
pub use types::{Commit, PropertyMap, PropertyValue, Tag};
