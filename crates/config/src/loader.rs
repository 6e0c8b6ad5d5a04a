use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::WarrenConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["warren.toml", "warren.yaml", "warren.yml", "warren.json"];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<WarrenConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./warren.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/warren/warren.{toml,yaml,yml,json}` (user-global)
///
/// Returns `WarrenConfig::default()` if no config file is found.
pub fn discover_and_load() -> WarrenConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    WarrenConfig::default()
}

/// Returns the user-global config directory (`~/.config/warren/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "warren").map(|d| d.config_dir().to_path_buf())
}

fn find_config_file() -> Option<PathBuf> {
    // Project-local
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    // User-global: ~/.config/warren/
    if let Some(dir) = config_dir() {
        for name in CONFIG_FILENAMES {
            let p = dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<WarrenConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warren.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "plugins_dir = \"my-plugins\"").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.plugins_dir, PathBuf::from("my-plugins"));
    }

    #[test]
    fn load_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warren.yaml");
        std::fs::write(&path, "database_path: state/warren.db\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.database_path, PathBuf::from("state/warren.db"));
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(load_config(Path::new("/nonexistent/warren.toml")).is_err());
    }

    #[test]
    fn unsupported_extension_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warren.ini");
        std::fs::write(&path, "x=1").unwrap();
        assert!(load_config(&path).is_err());
    }
}
