//! Package manifest: `plugin.toml` at the package root.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Declared metadata and capabilities of one plugin package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Unique plugin identifier. Colliding ids replace earlier installs.
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Deferred initialization entry point. Presence of this section marks
    /// the plugin as lazy-load.
    #[serde(default)]
    pub init: Option<InitSpec>,
}

/// The `[init]` manifest section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitSpec {
    /// Shell command run in the plugin's install directory.
    pub command: String,
    /// Seconds before the command is considered hung.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_timeout() -> u64 {
    30
}

impl PluginManifest {
    pub fn parse(raw: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(raw)?;
        if manifest.id.trim().is_empty() {
            return Err(Error::invalid_manifest("empty plugin id"));
        }
        if manifest.version.trim().is_empty() {
            return Err(Error::invalid_manifest("empty plugin version"));
        }
        Ok(manifest)
    }

    /// Read `plugin.toml` from an extracted package directory.
    pub async fn load(dir: &Path) -> Result<Self> {
        let path = dir.join("plugin.toml");
        let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
            Error::invalid_manifest(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&raw)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal() {
        let m = PluginManifest::parse(
            r#"
id = "weather"
name = "Weather lookup"
version = "1.2.0"
"#,
        )
        .unwrap();
        assert_eq!(m.id, "weather");
        assert!(m.init.is_none());
        assert!(m.description.is_none());
    }

    #[test]
    fn parse_with_init_section() {
        let m = PluginManifest::parse(
            r#"
id = "gamedata"
name = "Game data pack"
version = "3.0.1"
description = "Static datasets"

[init]
command = "./unpack.sh"
"#,
        )
        .unwrap();
        let init = m.init.unwrap();
        assert_eq!(init.command, "./unpack.sh");
        assert_eq!(init.timeout, 30);
    }

    #[test]
    fn parse_rejects_empty_id() {
        let err = PluginManifest::parse("id = \"  \"\nname = \"x\"\nversion = \"1\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn parse_rejects_missing_fields() {
        assert!(PluginManifest::parse("id = \"x\"").is_err());
    }

    #[tokio::test]
    async fn load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PluginManifest::load(dir.path()).await.is_err());
    }
}
