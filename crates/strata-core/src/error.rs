// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Strata remote SDK.

use thiserror::Error;

/// The primary error type used across the registry, loader, RPC bridge,
/// and URL/commit utilities.
///
/// Every variant carries enough structure to cross the plugin boundary as
/// a `{kind, message}` pair; see [`StrataError::wire_kind`] and
/// [`StrataError::from_wire`].
#[derive(Debug, Error)]
pub enum StrataError {
    /// A provider's `provider_type()` failed during registration.
    #[error("registration failed: {0}")]
    Registration(String),

    /// The requested provider type is not registered or loaded.
    #[error("unknown remote provider '{0}'")]
    UnknownProvider(String),

    /// A remote URI carried a query parameter other than `tag`.
    #[error("invalid query parameter '{0}'")]
    InvalidQueryParameter(String),

    /// A remote URI could not be parsed at all.
    #[error("invalid url: {0}")]
    Url(String),

    /// The plugin executable could not be spawned.
    #[error("failed to spawn plugin '{plugin}': {message}")]
    Spawn { plugin: String, message: String },

    /// The plugin's handshake was malformed or did not match the
    /// compiled-in protocol version and token.
    #[error("handshake with plugin '{plugin}' failed: {message}")]
    Handshake { plugin: String, message: String },

    /// The plugin handshook successfully but served the wrong provider.
    #[error("plugin '{plugin}' dispensed the wrong provider: {message}")]
    Dispense { plugin: String, message: String },

    /// A property map contains a value the wire format cannot express.
    #[error("cannot encode properties: {0}")]
    Encode(String),

    /// A wire value does not decode to a well-formed property map.
    #[error("cannot decode properties: {0}")]
    Decode(String),

    /// A provider rejected its remote properties or parameters, or a
    /// property map failed required/optional field validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The RPC channel to a plugin subprocess failed mid-call. The
    /// loaded handle is not evicted; it will keep failing until the
    /// caller unloads and reloads the plugin.
    #[error("transport error: {0}")]
    Transport(String),

    /// An error relayed from a provider that does not map onto one of
    /// the canonical kinds above.
    #[error("provider error ({kind}): {message}")]
    Provider { kind: String, message: String },
}

impl StrataError {
    /// The stable kind string used to relay this error across the RPC
    /// boundary.
    pub fn wire_kind(&self) -> &'static str {
        match self {
            StrataError::Registration(_) => "registration",
            StrataError::UnknownProvider(_) => "unknown_provider",
            StrataError::InvalidQueryParameter(_) => "invalid_query_parameter",
            StrataError::Url(_) => "url",
            StrataError::Spawn { .. } => "spawn",
            StrataError::Handshake { .. } => "handshake",
            StrataError::Dispense { .. } => "dispense",
            StrataError::Encode(_) => "encode",
            StrataError::Decode(_) => "decode",
            StrataError::Validation(_) => "validation",
            StrataError::Transport(_) => "transport",
            StrataError::Provider { .. } => "provider",
        }
    }

    /// Rebuild an error from its wire `{kind, message}` form.
    ///
    /// Kinds a direct provider can produce map back onto their canonical
    /// variants so callers observe identical errors from direct and
    /// RPC-backed providers. Anything unrecognized becomes
    /// [`StrataError::Provider`].
    pub fn from_wire(kind: &str, message: String) -> Self {
        match kind {
            "unknown_provider" => StrataError::UnknownProvider(message),
            "invalid_query_parameter" => StrataError::InvalidQueryParameter(message),
            "url" => StrataError::Url(message),
            "encode" => StrataError::Encode(message),
            "decode" => StrataError::Decode(message),
            "validation" => StrataError::Validation(message),
            "transport" => StrataError::Transport(message),
            _ => StrataError::Provider {
                kind: kind.to_string(),
                message,
            },
        }
    }
}
