// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subprocess plugin handles.
//!
//! A plugin is an executable named exactly after its provider type,
//! living in a caller-supplied directory, serving the RPC protocol over
//! its stdin/stdout. Loading walks `spawn -> handshake -> dispense`; any
//! failure kills the subprocess, caches nothing, and retries nothing.

use std::path::Path;
use std::sync::Arc;

use tokio::process::{Child, Command};
use tracing::{debug, warn};

use strata_core::{Provider, StrataError};
use strata_rpc::RpcProvider;

/// One loaded plugin: the owned subprocess plus the RPC-backed provider
/// adapter built on top of its stdio channel.
pub(crate) struct LoadedPlugin {
    child: Child,
    pub(crate) provider: Arc<RpcProvider>,
}

impl LoadedPlugin {
    /// Spawn `plugin_dir/<provider_type>`, validate its handshake, and
    /// dispense a provider from the channel.
    ///
    /// Dispensing calls `provider_type()` over the fresh channel and
    /// requires the answer to equal the requested type, so a plugin
    /// binary serving the wrong provider is caught at load time.
    pub(crate) async fn spawn(
        provider_type: &str,
        plugin_dir: &Path,
    ) -> Result<Self, StrataError> {
        let executable = plugin_dir.join(provider_type);
        debug!(provider_type, executable = %executable.display(), "spawning plugin");

        // stderr is inherited so plugin logs land on the host's stderr;
        // stdout must stay a clean protocol channel.
        let mut child = Command::new(&executable)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| StrataError::Spawn {
                plugin: provider_type.to_string(),
                message: format!("{}: {e}", executable.display()),
            })?;

        let stdin = child.stdin.take().ok_or_else(|| StrataError::Spawn {
            plugin: provider_type.to_string(),
            message: "plugin stdin was not captured".to_string(),
        })?;
        let stdout = child.stdout.take().ok_or_else(|| StrataError::Spawn {
            plugin: provider_type.to_string(),
            message: "plugin stdout was not captured".to_string(),
        })?;

        let provider = match RpcProvider::connect(provider_type, stdout, stdin).await {
            Ok(provider) => Arc::new(provider),
            Err(err) => {
                terminate(provider_type, &mut child).await;
                return Err(err);
            }
        };

        match provider.provider_type().await {
            Ok(served) if served == provider_type => {}
            Ok(served) => {
                terminate(provider_type, &mut child).await;
                return Err(StrataError::Dispense {
                    plugin: provider_type.to_string(),
                    message: format!("plugin serves provider '{served}'"),
                });
            }
            Err(err) => {
                terminate(provider_type, &mut child).await;
                return Err(StrataError::Dispense {
                    plugin: provider_type.to_string(),
                    message: err.to_string(),
                });
            }
        }

        debug!(provider_type, "plugin loaded");
        Ok(LoadedPlugin { child, provider })
    }

    /// Forcibly terminate the subprocess. Used by unload/clear; failures
    /// are logged, not propagated, since the cache entry is going away
    /// either way.
    pub(crate) async fn terminate(mut self, provider_type: &str) {
        terminate(provider_type, &mut self.child).await;
    }
}

async fn terminate(provider_type: &str, child: &mut Child) {
    if let Err(e) = child.kill().await {
        warn!(provider_type, error = %e, "failed to kill plugin subprocess");
    }
}

impl std::fmt::Debug for LoadedPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedPlugin")
            .field("pid", &self.child.id())
            .finish()
    }
}
