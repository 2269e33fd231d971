// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A deterministic echo provider for tests.
//!
//! `from_url` hands back the URL it was given plus any additional
//! properties, `get_parameters` echoes the remote map, and the commit
//! operations run against a fixed in-memory commit set, so the same
//! assertions hold whether the provider is called directly or through
//! the RPC bridge.

use std::collections::HashMap;

use async_trait::async_trait;

use strata_core::{match_tags, Commit, PropertyMap, PropertyValue, Provider, StrataError, Tag};

/// In-process test provider of type `echo`, backed by a fixed commit set.
pub struct EchoProvider {
    commits: Vec<Commit>,
}

fn sample_commit(id: &str, timestamp: &str, tags: &[(&str, &str)]) -> Commit {
    let mut properties = PropertyMap::new();
    properties.insert("timestamp".into(), PropertyValue::from(timestamp));
    if !tags.is_empty() {
        let mut tag_map = PropertyMap::new();
        for (k, v) in tags {
            tag_map.insert((*k).into(), PropertyValue::from(*v));
        }
        properties.insert("tags".into(), PropertyValue::Map(tag_map));
    }
    Commit {
        id: id.into(),
        properties,
    }
}

impl EchoProvider {
    /// An echo provider with no commits.
    pub fn new() -> Self {
        EchoProvider { commits: vec![] }
    }

    /// An echo provider with an explicit commit set.
    pub fn with_commits(commits: Vec<Commit>) -> Self {
        EchoProvider { commits }
    }

    /// The commit set served by the `echo` plugin binary: four commits
    /// with out-of-order timestamps and a mix of tags.
    pub fn sample() -> Self {
        Self::with_commits(vec![
            sample_commit("one", "2019-09-20T13:45:36Z", &[("env", "dev")]),
            sample_commit("two", "2019-09-20T13:45:37Z", &[("env", "prod")]),
            sample_commit(
                "three",
                "2019-09-20T13:45:38Z",
                &[("env", "prod"), ("release", "1.0")],
            ),
            sample_commit("four", "2019-09-21T13:45:30Z", &[]),
        ])
    }
}

impl Default for EchoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for EchoProvider {
    async fn provider_type(&self) -> Result<String, StrataError> {
        Ok("echo".to_string())
    }

    async fn from_url(
        &self,
        url: &str,
        additional_properties: &HashMap<String, String>,
    ) -> Result<PropertyMap, StrataError> {
        let mut remote = PropertyMap::new();
        remote.insert("url".into(), PropertyValue::from(url));
        for (k, v) in additional_properties {
            remote.insert(k.clone(), PropertyValue::from(v.clone()));
        }
        Ok(remote)
    }

    async fn to_url(
        &self,
        remote: &PropertyMap,
    ) -> Result<(String, HashMap<String, String>), StrataError> {
        let mut properties = HashMap::new();
        for (k, v) in remote {
            if let Some(s) = v.as_str() {
                properties.insert(k.clone(), s.to_string());
            }
        }
        Ok(("echo://echo".to_string(), properties))
    }

    async fn get_parameters(&self, remote: &PropertyMap) -> Result<PropertyMap, StrataError> {
        Ok(remote.clone())
    }

    async fn validate_remote(&self, remote: &PropertyMap) -> Result<(), StrataError> {
        // from_url always sets `url`, so a remote without it is broken.
        if !remote.contains_key("url") {
            return Err(StrataError::Validation(
                "missing required property 'url'".to_string(),
            ));
        }
        Ok(())
    }

    async fn validate_parameters(&self, _parameters: &PropertyMap) -> Result<(), StrataError> {
        Ok(())
    }

    async fn list_commits(
        &self,
        _remote: &PropertyMap,
        _parameters: &PropertyMap,
        tags: &[Tag],
    ) -> Result<Vec<Commit>, StrataError> {
        Ok(self
            .commits
            .iter()
            .filter(|c| match_tags(&c.properties, tags))
            .cloned()
            .collect())
    }

    async fn get_commit(
        &self,
        _remote: &PropertyMap,
        _parameters: &PropertyMap,
        commit_id: &str,
    ) -> Result<Option<Commit>, StrataError> {
        Ok(self.commits.iter().find(|c| c.id == commit_id).cloned())
    }
}
