// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote URI decomposition.
//!
//! A remote URI selects a provider by scheme, carries tag filters in its
//! query string, and names a commit in its fragment:
//!
//! ```text
//! s3://bucket/path?tag=release&tag=env=prod#c1234
//! ```
//!
//! A scheme-less input such as `mock` is a bare provider name. The query
//! and fragment belong to this layer; the provider only ever sees the
//! stripped URL.

use std::collections::HashMap;

use ::url::Url;

use strata_core::{PropertyMap, StrataError};

use crate::registry::Registry;

/// The decomposed form of a remote URI.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUrl {
    /// The provider type the URI resolves to.
    pub provider_type: String,
    /// Provider-specific remote properties from `from_url`.
    pub properties: PropertyMap,
    /// Raw `tag` query values, in encounter order, duplicates kept.
    pub tags: Vec<String>,
    /// The URI fragment, or empty when absent.
    pub commit: String,
}

/// Decompose `input` and delegate the stripped URL to the resolved
/// provider's `from_url`.
///
/// Only the repeated `tag` query key is permitted; anything else fails
/// with [`StrataError::InvalidQueryParameter`]. Tag values keep their
/// encounter order and may themselves contain `=`. Provider errors from
/// `from_url` propagate unchanged.
pub async fn parse_url(
    registry: &Registry,
    input: &str,
    additional_properties: &HashMap<String, String>,
) -> Result<ParsedUrl, StrataError> {
    let parsed = match Url::parse(input) {
        Ok(parsed) => parsed,
        // No scheme: the whole input is a bare provider name.
        Err(::url::ParseError::RelativeUrlWithoutBase) => {
            return parse_bare(registry, input, additional_properties).await;
        }
        Err(e) => return Err(StrataError::Url(e.to_string())),
    };

    let provider_type = parsed.scheme().to_string();
    let provider = registry
        .get(&provider_type)
        .await
        .ok_or_else(|| StrataError::UnknownProvider(provider_type.clone()))?;

    let commit = parsed.fragment().unwrap_or("").to_string();

    let mut tags = Vec::new();
    for (key, value) in parsed.query_pairs() {
        if key != "tag" {
            return Err(StrataError::InvalidQueryParameter(key.into_owned()));
        }
        tags.push(value.into_owned());
    }

    let mut stripped = parsed;
    stripped.set_query(None);
    stripped.set_fragment(None);
    let properties = provider
        .from_url(stripped.as_str(), additional_properties)
        .await?;

    Ok(ParsedUrl {
        provider_type,
        properties,
        tags,
        commit,
    })
}

async fn parse_bare(
    registry: &Registry,
    input: &str,
    additional_properties: &HashMap<String, String>,
) -> Result<ParsedUrl, StrataError> {
    let provider = registry
        .get(input)
        .await
        .ok_or_else(|| StrataError::UnknownProvider(input.to_string()))?;
    let properties = provider.from_url(input, additional_properties).await?;
    Ok(ParsedUrl {
        provider_type: input.to_string(),
        properties,
        tags: Vec::new(),
        commit: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use strata_core::{Commit, PropertyValue, Provider, Tag};

    /// Echoes the URL it was handed back through the remote properties,
    /// so tests can observe exactly what reached the provider.
    struct MockProvider;

    #[async_trait]
    impl Provider for MockProvider {
        async fn provider_type(&self) -> Result<String, StrataError> {
            Ok("mock".to_string())
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
            _remote: &PropertyMap,
        ) -> Result<(String, HashMap<String, String>), StrataError> {
            Ok(("mock://mock".to_string(), HashMap::new()))
        }

        async fn get_parameters(&self, remote: &PropertyMap) -> Result<PropertyMap, StrataError> {
            Ok(remote.clone())
        }

        async fn validate_remote(&self, _remote: &PropertyMap) -> Result<(), StrataError> {
            Ok(())
        }

        async fn validate_parameters(&self, _parameters: &PropertyMap) -> Result<(), StrataError> {
            Ok(())
        }

        async fn list_commits(
            &self,
            _remote: &PropertyMap,
            _parameters: &PropertyMap,
            _tags: &[Tag],
        ) -> Result<Vec<Commit>, StrataError> {
            Ok(vec![])
        }

        async fn get_commit(
            &self,
            _remote: &PropertyMap,
            _parameters: &PropertyMap,
            _commit_id: &str,
        ) -> Result<Option<Commit>, StrataError> {
            Ok(None)
        }
    }

    async fn mock_registry() -> Registry {
        let registry = Registry::new();
        registry.register(Arc::new(MockProvider)).await.unwrap();
        registry
    }

    #[tokio::test]
    async fn bare_provider_name_parses() {
        let registry = mock_registry().await;
        let parsed = parse_url(&registry, "mock", &HashMap::new()).await.unwrap();
        assert_eq!(parsed.provider_type, "mock");
        assert_eq!(parsed.commit, "");
        assert!(parsed.tags.is_empty());
        assert_eq!(
            parsed.properties.get("url"),
            Some(&PropertyValue::from("mock"))
        );
    }

    #[tokio::test]
    async fn fragment_becomes_commit_and_is_stripped() {
        let registry = mock_registry().await;
        let parsed = parse_url(&registry, "mock://foo#commit", &HashMap::new())
            .await
            .unwrap();
        assert_eq!(parsed.commit, "commit");
        assert_eq!(
            parsed.properties.get("url"),
            Some(&PropertyValue::from("mock://foo"))
        );
    }

    #[tokio::test]
    async fn tag_values_keep_order_and_embedded_equals() {
        let registry = mock_registry().await;
        let parsed = parse_url(&registry, "mock://foo?tag=one&tag=two=three", &HashMap::new())
            .await
            .unwrap();
        assert_eq!(parsed.tags, vec!["one".to_string(), "two=three".to_string()]);
        assert_eq!(
            parsed.properties.get("url"),
            Some(&PropertyValue::from("mock://foo"))
        );
    }

    #[tokio::test]
    async fn non_tag_query_keys_are_rejected() {
        let registry = mock_registry().await;
        let err = parse_url(&registry, "mock://foo?nottag=one", &HashMap::new())
            .await
            .unwrap_err();
        match err {
            StrataError::InvalidQueryParameter(key) => assert_eq!(key, "nottag"),
            other => panic!("expected InvalidQueryParameter, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unregistered_scheme_is_unknown_provider() {
        let registry = mock_registry().await;
        let err = parse_url(&registry, "notmock://foo", &HashMap::new())
            .await
            .unwrap_err();
        match err {
            StrataError::UnknownProvider(provider) => assert_eq!(provider, "notmock"),
            other => panic!("expected UnknownProvider, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn additional_properties_reach_the_provider() {
        let registry = mock_registry().await;
        let mut extra = HashMap::new();
        extra.insert("keyFile".to_string(), "/path/to/key".to_string());
        let parsed = parse_url(&registry, "mock://foo", &extra).await.unwrap();
        assert_eq!(
            parsed.properties.get("keyFile"),
            Some(&PropertyValue::from("/path/to/key"))
        );
    }
}
