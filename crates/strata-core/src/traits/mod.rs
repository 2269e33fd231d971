// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the Strata provider architecture.

pub mod provider;

pub use provider::Provider;
