// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Strata integration tests: the echo provider and
//! the `echo` plugin binary built on it.

pub mod echo;

pub use echo::EchoProvider;
