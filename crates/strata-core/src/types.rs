// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types exchanged between the host, the registry, and providers.

use std::collections::BTreeMap;

/// A schema-less dynamic value, the building block of remote properties
/// and operation parameters.
///
/// Integer and floating point numbers are distinct here, but the wire
/// codec normalizes every number to floating point; a map that crosses
/// the RPC boundary comes back with `Integer` values turned into `Float`.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Map(PropertyMap),
    Sequence(Vec<PropertyValue>),
}

/// Schema-less mapping of string keys to dynamic values.
///
/// Two namespaces share this shape: *remote properties* (persisted,
/// provider-specific configuration) and *parameters* (session values
/// such as credentials). A `BTreeMap` keeps iteration deterministic.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

impl PropertyValue {
    /// Borrow the string payload, if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the nested map, if this value is a map.
    pub fn as_map(&self) -> Option<&PropertyMap> {
        match self {
            PropertyValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

/// A tag predicate used to filter commits.
///
/// A tag with no value is an existence query; a tag with a value is an
/// exact-match query against the commit's stored tag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: Option<String>,
}

impl Tag {
    /// An existence query for `key`.
    pub fn exists(key: impl Into<String>) -> Self {
        Tag {
            key: key.into(),
            value: None,
        }
    }

    /// An exact-match query for `key == value`.
    pub fn matches(key: impl Into<String>, value: impl Into<String>) -> Self {
        Tag {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

/// An immutable commit snapshot returned by a provider.
///
/// Two properties carry meaning by convention: `timestamp` (an RFC3339
/// string) and `tags` (a map of string to string). The core never
/// mutates commits, it only filters and orders them.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub id: String,
    pub properties: PropertyMap,
}
