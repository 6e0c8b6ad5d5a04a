//! Typed configuration consumed by the gateway host.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WarrenConfig {
    /// Directory scanned for plugin packages at startup.
    pub plugins_dir: PathBuf,
    /// SQLite database file for accounts and message records.
    pub database_path: PathBuf,
    /// Trigger words that address the bot in group channels.
    pub prefix_keywords: Vec<String>,
    pub heartbeat: HeartbeatConfig,
    pub resource: ResourceConfig,
    pub records: RecordsConfig,
}

impl Default for WarrenConfig {
    fn default() -> Self {
        Self {
            plugins_dir: PathBuf::from("plugins"),
            database_path: PathBuf::from("warren.db"),
            prefix_keywords: vec!["warren".into(), "Warren".into()],
            heartbeat: HeartbeatConfig::default(),
            resource: ResourceConfig::default(),
            records: RecordsConfig::default(),
        }
    }
}

/// Liveness reporting against the monitoring endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartbeatConfig {
    /// Endpoint pinged once per account; the account id is appended as
    /// `?appid=<id>`.
    pub url: String,
    pub interval_secs: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            url: "https://status.warren-bots.dev/heartbeat".into(),
            interval_secs: 60,
        }
    }
}

/// Resource service used to convert binary payloads into reference URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub base_url: String,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://res.warren-bots.dev".into(),
        }
    }
}

/// Message-record buffering and retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    pub flush_interval_secs: u64,
    pub purge_interval_secs: u64,
    /// Records older than local midnight minus this many days are purged.
    pub retention_days: i64,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            flush_interval_secs: 60,
            purge_interval_secs: 3600,
            retention_days: 7,
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = WarrenConfig::default();
        assert_eq!(cfg.plugins_dir, PathBuf::from("plugins"));
        assert_eq!(cfg.heartbeat.interval_secs, 60);
        assert_eq!(cfg.records.purge_interval_secs, 3600);
        assert_eq!(cfg.records.retention_days, 7);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: WarrenConfig = toml::from_str(
            r#"
plugins_dir = "exts"

[heartbeat]
interval_secs = 120
"#,
        )
        .unwrap();
        assert_eq!(cfg.plugins_dir, PathBuf::from("exts"));
        assert_eq!(cfg.heartbeat.interval_secs, 120);
        // Untouched sections keep their defaults.
        assert_eq!(cfg.records.flush_interval_secs, 60);
        assert!(!cfg.heartbeat.url.is_empty());
    }

    #[test]
    fn roundtrip_toml() {
        let cfg = WarrenConfig::default();
        let s = toml::to_string(&cfg).unwrap();
        let back: WarrenConfig = toml::from_str(&s).unwrap();
        assert_eq!(back.database_path, cfg.database_path);
        assert_eq!(back.resource.base_url, cfg.resource.base_url);
    }
}
