//! Installed-plugin index and lazy-load pass.

use std::{collections::HashMap, path::PathBuf};

use tracing::{info, warn};

use crate::{Result, init_hook::InitHook, manifest::PluginManifest};

/// In-memory handle produced by one successful installation.
#[derive(Debug, Clone)]
pub struct InstalledPlugin {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    /// Extracted package contents.
    pub install_dir: PathBuf,
    /// Deferred initialization entry point, when declared.
    pub init: Option<InitHook>,
}

impl InstalledPlugin {
    pub fn new(manifest: PluginManifest, install_dir: PathBuf) -> Self {
        let init = manifest
            .init
            .map(|spec| InitHook::new(spec, install_dir.clone()));
        Self {
            id: manifest.id,
            name: manifest.name,
            version: manifest.version,
            description: manifest.description,
            install_dir,
            init,
        }
    }

    pub fn is_deferred(&self) -> bool {
        self.init.is_some()
    }
}

/// Insertion-ordered index of installed plugins, keyed by id.
///
/// Written once during the startup scan, read-only afterwards.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    plugins: Vec<InstalledPlugin>,
    index: HashMap<String, usize>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an installed plugin. A colliding id replaces the earlier
    /// registration in place (last write wins) and logs the conflict.
    pub fn register(&mut self, plugin: InstalledPlugin) {
        if let Some(&pos) = self.index.get(&plugin.id) {
            warn!(id = %plugin.id, "duplicate plugin id, replacing earlier install");
            self.plugins[pos] = plugin;
        } else {
            self.index.insert(plugin.id.clone(), self.plugins.len());
            self.plugins.push(plugin);
        }
    }

    pub fn get(&self, id: &str) -> Option<&InstalledPlugin> {
        self.index.get(id).map(|&pos| &self.plugins[pos])
    }

    /// Installed plugins in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &InstalledPlugin> {
        self.plugins.iter()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Invoke every declared deferred-init entry point exactly once, in
    /// registration order.
    ///
    /// Failures propagate to the caller: install already succeeded for these
    /// packages, so a caller wanting isolation must wrap this itself.
    pub async fn run_deferred_init(&self) -> Result<()> {
        for plugin in &self.plugins {
            if let Some(init) = &plugin.init {
                info!(id = %plugin.id, "lazy loading plugin");
                init.run().await?;
            }
        }
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::InitSpec;

    fn plugin(id: &str, init: Option<&str>, dir: PathBuf) -> InstalledPlugin {
        InstalledPlugin::new(
            PluginManifest {
                id: id.into(),
                name: id.into(),
                version: "0.1.0".into(),
                description: None,
                init: init.map(|command| InitSpec {
                    command: command.into(),
                    timeout: 5,
                }),
            },
            dir,
        )
    }

    #[test]
    fn register_preserves_insertion_order() {
        let mut registry = PluginRegistry::new();
        for id in ["c", "a", "b"] {
            registry.register(plugin(id, None, PathBuf::from(".")));
        }
        let order: Vec<_> = registry.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn duplicate_id_last_write_wins_in_place() {
        let mut registry = PluginRegistry::new();
        registry.register(plugin("a", None, PathBuf::from("first")));
        registry.register(plugin("b", None, PathBuf::from(".")));
        registry.register(plugin("a", None, PathBuf::from("second")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("a").unwrap().install_dir, PathBuf::from("second"));
        // Replacement keeps the original position.
        let order: Vec<_> = registry.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn deferred_init_runs_exactly_once_per_flagged_plugin() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = PluginRegistry::new();
        registry.register(plugin(
            "lazy",
            Some("echo run >> init.log"),
            dir.path().to_path_buf(),
        ));
        registry.register(plugin("eager", None, dir.path().to_path_buf()));

        registry.run_deferred_init().await.unwrap();

        let log = std::fs::read_to_string(dir.path().join("init.log")).unwrap();
        assert_eq!(log.lines().count(), 1);
    }

    #[tokio::test]
    async fn deferred_init_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = PluginRegistry::new();
        registry.register(plugin("bad", Some("exit 1"), dir.path().to_path_buf()));
        assert!(registry.run_deferred_init().await.is_err());
    }

    #[test]
    fn get_by_id() {
        let mut registry = PluginRegistry::new();
        registry.register(plugin("x", None, PathBuf::from(".")));
        assert!(registry.get("x").is_some());
        assert!(registry.get("y").is_none());
        assert!(!registry.get("x").unwrap().is_deferred());
    }
}
