// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Commit query utilities: tag matching, timestamp ordering, and field
//! validation.
//!
//! These operate purely on data already returned by a provider; they
//! never call back into one.

use chrono::{DateTime, Utc};

use crate::error::StrataError;
use crate::types::{Commit, PropertyMap, PropertyValue, Tag};

/// Match a commit's properties against a set of tag queries.
///
/// An empty query always matches. A non-empty query requires a `tags`
/// sub-map in the properties; without one the commit does not match.
/// Every query tag must match (logical AND): an existence tag needs its
/// key present, a valued tag additionally needs the stored value to be
/// a string equal (case-sensitive) to the queried value.
pub fn match_tags(properties: &PropertyMap, query: &[Tag]) -> bool {
    if query.is_empty() {
        return true;
    }

    let Some(tags) = properties.get("tags").and_then(PropertyValue::as_map) else {
        return false;
    };

    query.iter().all(|t| match tags.get(&t.key) {
        None => false,
        Some(stored) => match &t.value {
            None => true,
            Some(wanted) => stored.as_str() == Some(wanted.as_str()),
        },
    })
}

/// The effective timestamp of a commit, for ordering purposes.
///
/// Anything that is not a parsable RFC3339 string (missing key,
/// non-string value, empty string, garbage) normalizes to the earliest
/// representable instant rather than an error, so such commits sort
/// after every commit with a real timestamp.
fn effective_timestamp(properties: &PropertyMap) -> DateTime<Utc> {
    properties
        .get("timestamp")
        .and_then(PropertyValue::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Sort commits newest-first by their `timestamp` property.
///
/// The sort is stable, so commits sharing an effective timestamp keep
/// their relative order and the output is deterministic.
pub fn sort_commits(commits: &mut [Commit]) {
    commits.sort_by(|a, b| {
        effective_timestamp(&b.properties).cmp(&effective_timestamp(&a.properties))
    });
}

/// Validate a property map against required and optional field lists.
///
/// Every required key must be present, and every present key must be
/// either required or optional. The error names the first offending key.
/// Values are not inspected.
pub fn validate_fields(
    properties: &PropertyMap,
    required: &[&str],
    optional: &[&str],
) -> Result<(), StrataError> {
    for key in required {
        if !properties.contains_key(*key) {
            return Err(StrataError::Validation(format!(
                "missing required property '{key}'"
            )));
        }
    }

    for key in properties.keys() {
        if !required.contains(&key.as_str()) && !optional.contains(&key.as_str()) {
            return Err(StrataError::Validation(format!("invalid property '{key}'")));
        }
    }

    Ok(())
}
