// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The remote provider contract.
//!
//! Exactly two kinds of implementation exist at runtime: direct
//! in-process providers registered at startup, and the RPC-backed
//! adapter that the loader wraps around a plugin subprocess. Callers
//! cannot tell them apart; both are handed out as `Arc<dyn Provider>`.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::StrataError;
use crate::types::{Commit, PropertyMap, Tag};

/// A pluggable remote backend (e.g. "ssh", "s3").
#[async_trait]
pub trait Provider: Send + Sync + 'static {
    /// The canonical name of this provider, such as "ssh" or "s3".
    ///
    /// This is globally unique and immutable: it is the registry key,
    /// the leading URI component (`ssh://...`), and the name of the
    /// plugin executable when the provider runs out of process.
    async fn provider_type(&self) -> Result<String, StrataError>;

    /// Parse a URL into provider-specific remote properties.
    ///
    /// The URL arrives with query string and fragment already stripped.
    /// `additional_properties` holds user-supplied values that do not
    /// fit the URI format well, such as a key file path. The returned
    /// map is persisted as the remote's configuration.
    async fn from_url(
        &self,
        url: &str,
        additional_properties: &HashMap<String, String>,
    ) -> Result<PropertyMap, StrataError>;

    /// Render a remote back into URI form for display, plus any
    /// properties that cannot be represented in the URI.
    ///
    /// Display only: sensitive information should be redacted (e.g.
    /// `user:****@host`).
    async fn to_url(
        &self,
        remote: &PropertyMap,
    ) -> Result<(String, HashMap<String, String>), StrataError>;

    /// Build the session parameters (e.g. resolved credentials) that
    /// will accompany each operation against this remote.
    async fn get_parameters(&self, remote: &PropertyMap) -> Result<PropertyMap, StrataError>;

    /// Check that a remote's persisted properties are well-formed.
    async fn validate_remote(&self, remote: &PropertyMap) -> Result<(), StrataError>;

    /// Check that session parameters are well-formed.
    async fn validate_parameters(&self, parameters: &PropertyMap) -> Result<(), StrataError>;

    /// List commits at the remote, filtered by the given tag queries.
    ///
    /// Order is unspecified; callers re-sort with
    /// [`crate::commits::sort_commits`].
    async fn list_commits(
        &self,
        remote: &PropertyMap,
        parameters: &PropertyMap,
        tags: &[Tag],
    ) -> Result<Vec<Commit>, StrataError>;

    /// Fetch a single commit by id.
    ///
    /// Three outcomes: `Ok(Some(commit))` when found, `Ok(None)` when
    /// the id does not exist at the remote, `Err` for actual failures.
    async fn get_commit(
        &self,
        remote: &PropertyMap,
        parameters: &PropertyMap,
        commit_id: &str,
    ) -> Result<Option<Commit>, StrataError>;
}

impl std::fmt::Debug for dyn Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Provider")
    }
}
