// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! RPC bridge for out-of-process Strata providers.
//!
//! The bridge makes every [`strata_core::Provider`] operation work
//! identically whether resolved in-process or over a channel to a plugin
//! subprocess: the loader wraps the subprocess side in [`RpcProvider`],
//! and the plugin executable hands its implementation to [`serve`]. The
//! [`codec`] module carries schema-less property maps across the
//! boundary, with the documented integer-to-float normalization.

pub mod codec;
pub mod wire;

mod client;
mod server;

pub use client::RpcProvider;
pub use codec::{decode_properties, encode_properties};
pub use server::{serve, serve_connection};
pub use wire::{HANDSHAKE_TOKEN, PROTOCOL_VERSION};
