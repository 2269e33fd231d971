// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire protocol shared by the client adapter and the server dispatcher.
//!
//! The channel carries newline-delimited JSON. The server opens with one
//! [`Hello`] line, then answers [`Request`] lines with [`Response`]
//! lines. Property map payloads travel as codec-encoded
//! `serde_json::Value`s (see [`crate::codec`]).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use strata_core::Tag;

/// Protocol version compiled into both the host and every plugin.
/// A plugin announcing any other version is rejected at handshake.
pub const PROTOCOL_VERSION: u32 = 1;

/// Shared handshake secret compiled into both sides. This is not an
/// authentication mechanism; it only weeds out executables that are not
/// Strata plugins before the first RPC call.
pub const HANDSHAKE_TOKEN: &str = "b9b13f0cca5c19a587a36794f4045dcb";

/// The single handshake line a plugin writes before serving requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hello {
    pub protocol_version: u32,
    pub token: String,
}

impl Hello {
    /// The handshake the current build expects and emits.
    pub fn current() -> Self {
        Hello {
            protocol_version: PROTOCOL_VERSION,
            token: HANDSHAKE_TOKEN.to_string(),
        }
    }
}

/// One request line: a call id plus the operation envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    #[serde(flatten)]
    pub call: Call,
}

/// The eight provider operations in wire form.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "op", content = "params", rename_all = "snake_case")]
pub enum Call {
    Type,
    FromUrl {
        url: String,
        properties: HashMap<String, String>,
    },
    ToUrl {
        remote: Value,
    },
    GetParameters {
        remote: Value,
    },
    ValidateRemote {
        remote: Value,
    },
    ValidateParameters {
        parameters: Value,
    },
    ListCommits {
        remote: Value,
        parameters: Value,
        tags: Vec<WireTag>,
    },
    GetCommit {
        remote: Value,
        parameters: Value,
        commit_id: String,
    },
}

/// One response line. Exactly one of `result` and `error` is present.
#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<WireError>,
}

/// Structured error relayed across the plugin boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireError {
    pub kind: String,
    pub message: String,
}

/// A tag predicate in wire form. The value side is a tagged union so an
/// existence query is distinguishable from a query for the empty string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireTag {
    pub key: String,
    pub value: WireTagValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireTagValue {
    String(String),
    Null(bool),
}

impl From<&Tag> for WireTag {
    fn from(tag: &Tag) -> Self {
        WireTag {
            key: tag.key.clone(),
            value: match &tag.value {
                Some(v) => WireTagValue::String(v.clone()),
                None => WireTagValue::Null(true),
            },
        }
    }
}

impl From<WireTag> for Tag {
    fn from(tag: WireTag) -> Self {
        Tag {
            key: tag.key,
            value: match tag.value {
                WireTagValue::String(v) => Some(v),
                WireTagValue::Null(_) => None,
            },
        }
    }
}

/// A commit in wire form; `properties` is codec-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireCommit {
    pub id: String,
    pub properties: Value,
}

// --- Per-operation response payloads ---

#[derive(Debug, Serialize, Deserialize)]
pub struct TypeResponse {
    #[serde(rename = "type")]
    pub provider_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FromUrlResponse {
    pub remote: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToUrlResponse {
    pub url: String,
    pub properties: HashMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetParametersResponse {
    pub parameters: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmptyResponse {}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListCommitsResponse {
    pub commits: Vec<WireCommit>,
}

/// Found/absent outcome for `get_commit`, distinct from an error. A
/// missing commit is an explicit `{"null": true}` marker, never a
/// zero-valued commit.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetCommitResponse {
    pub commit: WireCommitOutcome,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireCommitOutcome {
    Value(WireCommit),
    Null(bool),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tag_wire_form_is_a_tagged_union() {
        let existence = WireTag::from(&Tag::exists("release"));
        assert_eq!(
            serde_json::to_value(&existence).unwrap(),
            json!({"key": "release", "value": {"null": true}})
        );

        let exact = WireTag::from(&Tag::matches("env", "prod"));
        assert_eq!(
            serde_json::to_value(&exact).unwrap(),
            json!({"key": "env", "value": {"string": "prod"}})
        );

        // The empty string is a value query, not an existence query.
        let empty = WireTag::from(&Tag::matches("env", ""));
        let back = Tag::from(serde_json::from_value::<WireTag>(serde_json::to_value(&empty).unwrap()).unwrap());
        assert_eq!(back.value, Some(String::new()));
    }

    #[test]
    fn request_envelope_flattens_the_call() {
        let req = Request {
            id: 7,
            call: Call::FromUrl {
                url: "s3://bucket/path".into(),
                properties: HashMap::new(),
            },
        };
        let wire = serde_json::to_value(&req).unwrap();
        assert_eq!(wire["id"], 7);
        assert_eq!(wire["op"], "from_url");
        assert_eq!(wire["params"]["url"], "s3://bucket/path");

        let back: Request = serde_json::from_value(wire).unwrap();
        assert!(matches!(back.call, Call::FromUrl { .. }));
    }

    #[test]
    fn type_request_has_no_params() {
        let wire = serde_json::to_value(Request {
            id: 1,
            call: Call::Type,
        })
        .unwrap();
        assert_eq!(wire, json!({"id": 1, "op": "type"}));
    }

    #[test]
    fn commit_absence_is_an_explicit_marker() {
        let absent = GetCommitResponse {
            commit: WireCommitOutcome::Null(true),
        };
        assert_eq!(
            serde_json::to_value(&absent).unwrap(),
            json!({"commit": {"null": true}})
        );

        let found = GetCommitResponse {
            commit: WireCommitOutcome::Value(WireCommit {
                id: "c1".into(),
                properties: json!({}),
            }),
        };
        let wire = serde_json::to_value(&found).unwrap();
        assert_eq!(wire["commit"]["value"]["id"], "c1");
    }
}
