// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `echo` plugin executable: serves [`EchoProvider`] over stdio.
//!
//! Stdout is the RPC channel, so logging goes to stderr (which the host
//! loader inherits).

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use strata_test_utils::EchoProvider;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = strata_rpc::serve(Arc::new(EchoProvider::sample())).await {
        tracing::error!(error = %err, "echo plugin exited with error");
        std::process::exit(1);
    }
}
