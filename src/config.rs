//! Configuration
//!
//! JSON config file loaded once at startup and immutable afterwards.
//! Invalid configuration is the only error that is fatal to the whole
//! process; every later failure is scoped to a single pass.

use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Optional log file; stderr when unset.
    #[serde(default)]
    pub log: Option<PathBuf>,
    /// InnoDB Cluster name as known to the router; the read-only route is
    /// derived as `<cluster_name>_ro`.
    pub cluster_name: String,
    /// Account the dump tool connects with.
    pub backup_user: BasicAuth,
    pub router: RouterConfig,
    pub backup: BackupConfig,
    pub directories: Directories,
    pub s3: S3Settings,
    #[serde(default)]
    pub alerts: AlertsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BasicAuth {
    pub user: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RouterConfig {
    /// Router REST API address, scheme optional.
    pub addr: String,
    pub basic_auth: BasicAuth,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackupConfig {
    /// Time between passes, human-readable ("30m", "1h").
    #[serde(deserialize_with = "de_duration")]
    pub interval: Duration,
    /// Retention count applied to both backends.
    pub max_backup_files: usize,
    /// Dump tool binary; override with an absolute path when mysqlsh is not
    /// on PATH.
    #[serde(default = "default_dump_tool")]
    pub dump_tool: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Directories {
    /// Where finished archives live.
    pub backups: PathBuf,
    /// Dump workspace, wiped before every attempt.
    #[serde(default = "default_dump_dir")]
    pub dump: PathBuf,
    /// Scratch path for the rendered connection script.
    #[serde(default = "default_script_path")]
    pub script: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct S3Settings {
    /// Host:port, no scheme; `use_ssl` picks it.
    pub endpoint: String,
    #[serde(default = "default_region")]
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    #[serde(default)]
    pub use_ssl: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AlertsConfig {
    #[serde(default)]
    pub telegram: TelegramSettings,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelegramSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: i64,
    #[serde(default)]
    pub parse_mode: Option<String>,
    /// Accepted and validated for config compatibility; delivery is gated
    /// by `enabled` only.
    #[serde(default)]
    pub level: Option<String>,
}

fn default_dump_tool() -> String {
    "mysqlsh".to_string()
}

fn default_dump_dir() -> PathBuf {
    PathBuf::from("/tmp/replivault/dump")
}

fn default_script_path() -> PathBuf {
    PathBuf::from("/tmp/replivault/backup.py")
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn de_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let bytes = std::fs::read(path)?;
        let config: Config = serde_json::from_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.cluster_name.is_empty() {
            return invalid("cluster_name must not be empty");
        }
        if self.backup_user.user.is_empty() {
            return invalid("backup_user.user must not be empty");
        }
        if self.router.addr.is_empty() {
            return invalid("router.addr must not be empty");
        }
        if self.backup.interval.is_zero() {
            return invalid("backup.interval must be positive");
        }
        if self.backup.max_backup_files < 1 {
            return invalid("backup.max_backup_files must be at least 1");
        }
        if self.s3.endpoint.is_empty() || self.s3.bucket.is_empty() {
            return invalid("s3.endpoint and s3.bucket must not be empty");
        }
        if self.alerts.telegram.enabled {
            if self.alerts.telegram.bot_token.is_empty() {
                return invalid("alerts.telegram.bot_token required when enabled");
            }
            if self.alerts.telegram.chat_id == 0 {
                return invalid("alerts.telegram.chat_id required when enabled");
            }
        }
        if let Some(level) = &self.alerts.telegram.level {
            if level != "info" && level != "error" {
                return invalid("alerts.telegram.level must be \"info\" or \"error\"");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> serde_json::Value {
        serde_json::json!({
            "cluster_name": "myCluster",
            "backup_user": { "user": "backup", "password": "hunter2" },
            "router": {
                "addr": "router-1:8443",
                "basic_auth": { "user": "router", "password": "secret" }
            },
            "backup": { "interval": "1h", "max_backup_files": 5 },
            "directories": { "backups": "/var/backups/db" },
            "s3": {
                "endpoint": "minio:9000",
                "access_key": "ak",
                "secret_key": "sk",
                "bucket": "db-backups"
            }
        })
    }

    fn parse(value: serde_json::Value) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn test_sample_config_parses() {
        let cfg = parse(sample()).unwrap();
        assert_eq!(cfg.cluster_name, "myCluster");
        assert_eq!(cfg.backup.interval, Duration::from_secs(3600));
        assert_eq!(cfg.backup.max_backup_files, 5);
        assert!(!cfg.s3.use_ssl);
    }

    #[test]
    fn test_defaults_applied() {
        let cfg = parse(sample()).unwrap();
        assert_eq!(cfg.backup.dump_tool, "mysqlsh");
        assert_eq!(cfg.directories.dump, PathBuf::from("/tmp/replivault/dump"));
        assert_eq!(
            cfg.directories.script,
            PathBuf::from("/tmp/replivault/backup.py")
        );
        assert_eq!(cfg.s3.region, "us-east-1");
        assert!(!cfg.alerts.telegram.enabled);
        assert!(cfg.log.is_none());
    }

    #[test]
    fn test_bad_interval_is_parse_error() {
        let mut value = sample();
        value["backup"]["interval"] = "soon".into();
        assert!(matches!(parse(value).unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_retention_rejected() {
        let mut value = sample();
        value["backup"]["max_backup_files"] = 0.into();
        assert!(matches!(parse(value).unwrap_err(), ConfigError::Invalid(_)));
    }

    #[test]
    fn test_empty_cluster_name_rejected() {
        let mut value = sample();
        value["cluster_name"] = "".into();
        assert!(matches!(parse(value).unwrap_err(), ConfigError::Invalid(_)));
    }

    #[test]
    fn test_enabled_telegram_requires_token_and_chat() {
        let mut value = sample();
        value["alerts"] = serde_json::json!({
            "telegram": { "enabled": true }
        });
        assert!(matches!(parse(value).unwrap_err(), ConfigError::Invalid(_)));
    }

    #[test]
    fn test_telegram_level_validated() {
        let mut value = sample();
        value["alerts"] = serde_json::json!({
            "telegram": {
                "enabled": true,
                "bot_token": "123:abc",
                "chat_id": 42,
                "level": "verbose"
            }
        });
        assert!(matches!(parse(value).unwrap_err(), ConfigError::Invalid(_)));

        let mut value = sample();
        value["alerts"] = serde_json::json!({
            "telegram": {
                "enabled": true,
                "bot_token": "123:abc",
                "chat_id": 42,
                "level": "error"
            }
        });
        assert!(parse(value).is_ok());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        assert!(matches!(
            Config::load("/nonexistent/config.json").unwrap_err(),
            ConfigError::Io(_)
        ));
    }
}
