// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider registry, plugin loader, and remote URL decomposition.
//!
//! The host builds one [`Registry`], registers its in-process providers
//! at startup, and loads out-of-process providers lazily; either way it
//! gets back an `Arc<dyn Provider>` and never needs to know which kind
//! it is holding. [`parse_url`] sits on top, turning raw remote URIs
//! into a resolved provider plus properties, tag filters, and a commit
//! fragment.

mod loader;
mod registry;
mod url;

pub use registry::Registry;
pub use self::url::{parse_url, ParsedUrl};
