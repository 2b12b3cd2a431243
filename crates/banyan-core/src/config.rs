use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level client configuration (loaded from banyan.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BanyanConfig {
    pub api: ApiConfig,
    pub escrow: EscrowConfig,
    pub keystore: KeystoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the Banyan core service
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Bearer token for authenticated endpoints
    pub token: Option<String>,
    /// Log level (default: info)
    pub log_level: String,
    /// Log format: "json" or "text"
    pub log_format: String,
}

/// Passphrase-based escrow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EscrowConfig {
    /// PBKDF2-HMAC-SHA256 iteration count (default: 600000)
    pub pbkdf2_rounds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeystoreConfig {
    /// Directory holding recovered private key PEMs (default: ~/.config/banyan/keys)
    pub key_dir: Option<PathBuf>,
    /// Path to the device API key registry JSON file
    pub registry_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".into(),
            timeout_secs: 30,
            token: None,
            log_level: "info".into(),
            log_format: "text".into(),
        }
    }
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            pbkdf2_rounds: 600_000,
        }
    }
}

impl Default for KeystoreConfig {
    fn default() -> Self {
        Self {
            key_dir: None,
            registry_path: None,
        }
    }
}

/// Resolve the default banyan config directory.
pub fn default_config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        })
        .join("banyan")
}

impl BanyanConfig {
    /// Directory for recovered private key PEMs, honoring the config override.
    pub fn key_dir(&self) -> PathBuf {
        self.keystore
            .key_dir
            .clone()
            .unwrap_or_else(|| default_config_dir().join("keys"))
    }

    /// Path to the device API key registry, honoring the config override.
    pub fn registry_path(&self) -> PathBuf {
        self.keystore
            .registry_path
            .clone()
            .unwrap_or_else(|| default_config_dir().join("device_keys.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[api]
base_url = "https://api.banyan.example.com"
timeout_secs = 10
token = "abc123"
log_level = "debug"
log_format = "json"

[escrow]
pbkdf2_rounds = 310000

[keystore]
key_dir = "/var/lib/banyan/keys"
registry_path = "/var/lib/banyan/device_keys.json"
"#;
        let config: BanyanConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.api.base_url, "https://api.banyan.example.com");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.api.token.as_deref(), Some("abc123"));
        assert_eq!(config.api.log_level, "debug");
        assert_eq!(config.escrow.pbkdf2_rounds, 310_000);
        assert_eq!(config.key_dir(), PathBuf::from("/var/lib/banyan/keys"));
        assert_eq!(
            config.registry_path(),
            PathBuf::from("/var/lib/banyan/device_keys.json")
        );
    }

    #[test]
    fn test_parse_defaults() {
        let config: BanyanConfig = toml::from_str("").unwrap();

        assert_eq!(config.api.base_url, "http://localhost:3001");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.api.token.is_none());
        assert_eq!(config.api.log_level, "info");
        assert_eq!(config.escrow.pbkdf2_rounds, 600_000);
        assert!(config.keystore.key_dir.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[api]
base_url = "http://192.168.1.50:3001"
"#;
        let config: BanyanConfig = toml::from_str(toml_str).unwrap();

        // Overridden
        assert_eq!(config.api.base_url, "http://192.168.1.50:3001");
        // Defaults
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.escrow.pbkdf2_rounds, 600_000);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = BanyanConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: BanyanConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.api.base_url, parsed.api.base_url);
        assert_eq!(config.escrow.pbkdf2_rounds, parsed.escrow.pbkdf2_rounds);
    }
}
