use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::core::auth::Role;
use crate::core::exaroton::DEFAULT_ENDPOINT;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_format")]
    pub default_format: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_format() -> String {
    "text".to_string()
}
fn default_color() -> String {
    "auto".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            color: default_color(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExarotonConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for ExarotonConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
        }
    }
}

impl ExarotonConfig {
    /// API key from `EXAROTON_API_KEY`, falling back to the config file.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var("EXAROTON_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: Option<PathBuf>,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

fn default_retention_days() -> u32 {
    90
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            retention_days: default_retention_days(),
        }
    }
}

impl StoreConfig {
    /// Configured snapshot file, or `<data dir>/creditwatch/snapshots.jsonl`.
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| {
                    dirs::home_dir()
                        .unwrap_or_else(|| PathBuf::from("~"))
                        .join(".local")
                        .join("share")
                })
                .join("creditwatch")
                .join("snapshots.jsonl")
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_record_interval")]
    pub record_interval_minutes: u64,
}

fn default_bind() -> String {
    "127.0.0.1:4000".to_string()
}
fn default_record_interval() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            record_interval_minutes: default_record_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub uid: String,
    pub token: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "viewer".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub exaroton: ExarotonConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

impl AppConfig {
    /// Get the config file path, respecting XDG_CONFIG_HOME
    pub fn config_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".config")
            });
        config_dir.join("creditwatch").join("config.toml")
    }

    /// Load config from the default path, falling back to defaults if not found
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Serialize and write this config to the config file path.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Validate the config
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !["text", "json"].contains(&self.settings.default_format.as_str()) {
            issues.push(format!(
                "Invalid default_format: '{}' (must be 'text' or 'json')",
                self.settings.default_format
            ));
        }
        if !["auto", "always", "never"].contains(&self.settings.color.as_str()) {
            issues.push(format!(
                "Invalid color: '{}' (must be 'auto', 'always', or 'never')",
                self.settings.color
            ));
        }
        if !self.exaroton.endpoint.starts_with("https://") {
            issues.push(format!(
                "Exaroton endpoint must use HTTPS: '{}'",
                self.exaroton.endpoint
            ));
        }
        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            issues.push(format!(
                "Invalid server bind address: '{}'",
                self.server.bind
            ));
        }

        let mut seen_tokens: Vec<&str> = Vec::new();
        for user in &self.users {
            if user.uid.is_empty() {
                issues.push("User with empty uid".to_string());
            }
            if user.token.is_empty() {
                issues.push(format!("User '{}': empty token", user.uid));
            } else if seen_tokens.contains(&user.token.as_str()) {
                issues.push(format!("User '{}': token is shared with another user", user.uid));
            } else {
                seen_tokens.push(&user.token);
            }
            if Role::from_id(&user.role).is_none() {
                issues.push(format!(
                    "User '{}': invalid role '{}' (must be admin|viewer)",
                    user.uid, user.role
                ));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let config = AppConfig::default();
        let issues = config.validate();
        assert!(issues.is_empty(), "Default config should be valid, got: {:?}", issues);
    }

    #[test]
    fn default_format_is_text() {
        let settings = Settings::default();
        assert_eq!(settings.default_format, "text");
    }

    #[test]
    fn default_endpoint_and_retention() {
        let config = AppConfig::default();
        assert_eq!(config.exaroton.endpoint, "https://api.exaroton.com/v1");
        assert_eq!(config.store.retention_days, 90);
        assert_eq!(config.server.record_interval_minutes, 60);
        assert!(config.users.is_empty());
    }

    #[test]
    fn validate_catches_invalid_format() {
        let mut config = AppConfig::default();
        config.settings.default_format = "xml".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("default_format")));
    }

    #[test]
    fn validate_catches_invalid_color() {
        let mut config = AppConfig::default();
        config.settings.color = "blue".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("color")));
    }

    #[test]
    fn validate_catches_insecure_endpoint() {
        let mut config = AppConfig::default();
        config.exaroton.endpoint = "http://api.exaroton.com/v1".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("HTTPS")));
    }

    #[test]
    fn validate_catches_bad_bind() {
        let mut config = AppConfig::default();
        config.server.bind = "localhost".to_string();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("bind")));
    }

    #[test]
    fn validate_catches_user_problems() {
        let mut config = AppConfig::default();
        config.users = vec![
            UserConfig {
                uid: "a".to_string(),
                token: "t1".to_string(),
                role: "admin".to_string(),
            },
            UserConfig {
                uid: "b".to_string(),
                token: "t1".to_string(),
                role: "viewer".to_string(),
            },
            UserConfig {
                uid: "c".to_string(),
                token: String::new(),
                role: "owner".to_string(),
            },
        ];
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("shared")));
        assert!(issues.iter().any(|i| i.contains("empty token")));
        assert!(issues.iter().any(|i| i.contains("invalid role")));
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[settings]
default_format = "json"

[exaroton]
api_key = "secret"

[store]
path = "/var/lib/creditwatch/snapshots.jsonl"
retention_days = 30

[server]
bind = "0.0.0.0:8080"
record_interval_minutes = 15

[[users]]
uid = "alice"
token = "tok"
role = "admin"

[[users]]
uid = "bob"
token = "tok2"
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.settings.default_format, "json");
        assert_eq!(config.settings.color, "auto");
        assert_eq!(config.exaroton.api_key.as_deref(), Some("secret"));
        assert_eq!(config.exaroton.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(
            config.store.resolved_path(),
            PathBuf::from("/var/lib/creditwatch/snapshots.jsonl")
        );
        assert_eq!(config.store.retention_days, 30);
        assert_eq!(config.server.record_interval_minutes, 15);
        assert_eq!(config.users.len(), 2);
        assert_eq!(config.users[1].role, "viewer");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn parse_empty_toml_gives_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.settings.default_format, "text");
        assert_eq!(config.settings.color, "auto");
        assert_eq!(config.server.bind, "127.0.0.1:4000");
    }

    #[test]
    fn default_store_path_ends_with_snapshots_file() {
        let store = StoreConfig::default();
        let path = store.resolved_path();
        assert!(path.ends_with("creditwatch/snapshots.jsonl"));
    }

    #[test]
    fn config_path_uses_xdg_when_set() {
        std::env::set_var("XDG_CONFIG_HOME", "/tmp/test_xdg_config");
        let path = AppConfig::config_path();
        std::env::remove_var("XDG_CONFIG_HOME");
        assert_eq!(path, PathBuf::from("/tmp/test_xdg_config/creditwatch/config.toml"));
    }
}
