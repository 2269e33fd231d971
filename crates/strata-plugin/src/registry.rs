// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The provider registry and plugin loader context.
//!
//! A [`Registry`] owns two maps: direct in-process providers registered
//! at startup, and loaded plugin handles created lazily by [`Registry::load`].
//! Both maps sit behind mutexes so the registry can be shared across
//! tasks. There is no ambient global state; the host constructs one
//! registry and owns its lifetime.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use strata_core::{Provider, StrataError};

use crate::loader::LoadedPlugin;

/// Process-wide provider state: direct providers keyed by type, plus
/// one loaded plugin handle per out-of-process provider type.
///
/// At most one entry per type exists in each map; `register` and `load`
/// overwrite or reuse, they never merge.
#[derive(Default)]
pub struct Registry {
    providers: Mutex<HashMap<String, Arc<dyn Provider>>>,
    plugins: Mutex<HashMap<String, LoadedPlugin>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a direct in-process provider under its own type.
    ///
    /// The provider's `provider_type()` is consulted once, here; if it
    /// errors, registration fails with [`StrataError::Registration`] and
    /// the host decides whether that aborts startup. An existing entry
    /// for the same type is overwritten.
    pub async fn register(&self, provider: Arc<dyn Provider>) -> Result<(), StrataError> {
        let provider_type = provider
            .provider_type()
            .await
            .map_err(|e| StrataError::Registration(e.to_string()))?;
        debug!(provider_type, "registering direct provider");
        self.providers
            .lock()
            .await
            .insert(provider_type, provider);
        Ok(())
    }

    /// Look up a provider by type. Never errors.
    ///
    /// Direct providers shadow loaded plugins of the same type.
    pub async fn get(&self, provider_type: &str) -> Option<Arc<dyn Provider>> {
        if let Some(provider) = self.providers.lock().await.get(provider_type) {
            return Some(provider.clone());
        }
        self.plugins
            .lock()
            .await
            .get(provider_type)
            .map(|plugin| plugin.provider.clone() as Arc<dyn Provider>)
    }

    /// Load an out-of-process provider, spawning its plugin executable
    /// from `plugin_dir` on first use.
    ///
    /// Idempotent: a second `load` for a type that is already loaded
    /// returns the cached handle and spawns nothing. On any spawn,
    /// handshake, or dispense failure the subprocess is terminated,
    /// nothing is cached, and no retry is attempted.
    ///
    /// The plugin map lock is held for the duration of the load, so
    /// concurrent loads of one type cannot race into two subprocesses.
    pub async fn load(
        &self,
        provider_type: &str,
        plugin_dir: &Path,
    ) -> Result<Arc<dyn Provider>, StrataError> {
        let mut plugins = self.plugins.lock().await;
        if let Some(plugin) = plugins.get(provider_type) {
            debug!(provider_type, "reusing loaded plugin");
            return Ok(plugin.provider.clone());
        }

        let plugin = LoadedPlugin::spawn(provider_type, plugin_dir).await?;
        let provider = plugin.provider.clone();
        plugins.insert(provider_type.to_string(), plugin);
        info!(provider_type, "plugin loaded");
        Ok(provider)
    }

    /// Unload a plugin: terminate its subprocess and drop the cached
    /// handle. No-op if the type is not loaded.
    pub async fn unload(&self, provider_type: &str) {
        let plugin = self.plugins.lock().await.remove(provider_type);
        if let Some(plugin) = plugin {
            info!(provider_type, "unloading plugin");
            plugin.terminate(provider_type).await;
        }
    }

    /// Wipe the direct-provider map and unload every plugin.
    pub async fn clear(&self) {
        self.providers.lock().await.clear();
        let plugins: Vec<(String, LoadedPlugin)> =
            self.plugins.lock().await.drain().collect();
        for (provider_type, plugin) in plugins {
            plugin.terminate(&provider_type).await;
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").finish_non_exhaustive()
    }
}
