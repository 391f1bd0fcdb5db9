//! TOML file configuration structures.
//!
//! These structs directly map to the `loginguard.toml` file format.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub admin: AdminConfig,
    #[serde(default)]
    pub guard: GuardConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "127.0.0.1:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

/// Admin configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// The admin secret. If this is plaintext (doesn't start with `$argon2`),
    /// it will be hashed and the config file will be rewritten.
    pub secret: String,
}

/// Verification settings that are fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Several sites share one network. Display options then come from the
    /// network settings only.
    #[serde(default = "default_multi_tenant")]
    pub multi_tenant: bool,
    /// JSON file holding the stored settings of every scope.
    #[serde(default = "default_options_path")]
    pub options_path: PathBuf,
    /// Override the provider's verification endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_url: Option<Url>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            multi_tenant: default_multi_tenant(),
            options_path: default_options_path(),
            verify_url: None,
        }
    }
}

fn default_multi_tenant() -> bool {
    true
}

fn default_options_path() -> PathBuf {
    PathBuf::from("./loginguard-options.json")
}

impl FileConfig {
    /// Check if the admin secret is already hashed (argon2 format).
    pub fn is_admin_secret_hashed(&self) -> bool {
        self.admin.secret.starts_with("$argon2")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[admin]
secret = "test-secret"

[guard]
multi_tenant = false
options_path = "/var/lib/loginguard/options.json"
verify_url = "http://127.0.0.1:9000/siteverify"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert!(!config.guard.multi_tenant);
        assert_eq!(
            config.guard.options_path,
            PathBuf::from("/var/lib/loginguard/options.json")
        );
        assert_eq!(
            config.guard.verify_url.as_ref().map(Url::as_str),
            Some("http://127.0.0.1:9000/siteverify")
        );
        assert!(!config.is_admin_secret_hashed());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: FileConfig = toml::from_str("[admin]\nsecret = \"s\"\n").unwrap();
        assert_eq!(config.server.listen, default_listen_addr());
        assert_eq!(config.guard, GuardConfig::default());
        assert!(config.guard.multi_tenant);
    }

    #[test]
    fn test_hashed_secret_detection() {
        let config = FileConfig {
            server: ServerConfig::default(),
            admin: AdminConfig {
                secret: "$argon2id$v=19$m=19456,t=2,p=1$abc123".to_string(),
            },
            guard: GuardConfig::default(),
        };
        assert!(config.is_admin_secret_hashed());
    }
}
