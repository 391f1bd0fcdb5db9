//! Configuration module for loginguard-server.
//!
//! Handles loading configuration from TOML files and CLI arguments.
//! Also handles admin secret hashing.

pub mod file;

use crate::config::file::{FileConfig, GuardConfig, ServerConfig};
use loginguard_sdk::config::AdminCredential;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("password hashing error: {0}")]
    HashError(String),
}

/// Loaded configuration result containing all parts.
#[derive(Debug)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub admin: AdminCredential,
    pub guard: GuardConfig,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI overrides
    /// 3. Validate the configuration
    /// 4. Hash the admin secret if it's plaintext (and rewrite the file)
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        self.validate(&file_config)?;

        let secret_hash = if file_config.is_admin_secret_hashed() {
            file_config.admin.secret.clone()
        } else {
            let hash = self.hash_secret(&file_config.admin.secret)?;
            file_config.admin.secret = hash.clone();
            // Rewritten before the CLI override so the file keeps its own listen address.
            self.rewrite_config(&file_config)?;
            tracing::info!("Admin secret hashed and config file updated");
            hash
        };

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        Ok(LoadedConfig {
            server: file_config.server,
            admin: AdminCredential::new(secret_hash),
            guard: file_config.guard,
        })
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        if config.admin.secret.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "admin secret must not be empty".to_string(),
            ));
        }
        if config.guard.options_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "guard.options_path must not be empty".to_string(),
            ));
        }
        if let Some(url) = &config.guard.verify_url
            && !matches!(url.scheme(), "http" | "https")
        {
            return Err(ConfigError::ValidationError(format!(
                "guard.verify_url must be http or https, got {}",
                url.scheme()
            )));
        }
        Ok(())
    }

    fn hash_secret(&self, plaintext: &str) -> Result<String, ConfigError> {
        use argon2::{
            Argon2, PasswordHasher,
            password_hash::{SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ConfigError::HashError(e.to_string()))
    }

    fn rewrite_config(&self, config: &FileConfig) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(config)?;

        // Write atomically: write to temp file, then rename
        let temp_path = self.config_path.with_extension("toml.tmp");
        std::fs::write(&temp_path, toml_string)?;
        std::fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("loginguard.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_plaintext_secret_is_hashed_and_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "[server]\nlisten = \"127.0.0.1:3000\"\n\n[admin]\nsecret = \"network-admin\"\n",
        );

        let loaded = ConfigLoader::new(&path, None).load().unwrap();
        assert!(loaded.admin.matches("network-admin"));

        let rewritten: FileConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(rewritten.is_admin_secret_hashed());
        assert_eq!(rewritten.server.listen.port(), 3000);
        assert!(!path.with_extension("toml.tmp").exists());

        // A second load keeps the existing hash.
        let again = ConfigLoader::new(&path, None).load().unwrap();
        assert!(again.admin.matches("network-admin"));
        let unchanged: FileConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(unchanged.admin.secret, rewritten.admin.secret);
    }

    #[test]
    fn test_listen_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "[server]\nlisten = \"127.0.0.1:3000\"\n\n[admin]\nsecret = \"s\"\n",
        );
        let listen: SocketAddr = "0.0.0.0:9999".parse().unwrap();

        let loaded = ConfigLoader::new(&path, Some(listen)).load().unwrap();
        assert_eq!(loaded.server.listen, listen);
    }

    #[test]
    fn test_validation() {
        let dir = tempfile::tempdir().unwrap();

        let empty_secret = write_config(&dir, "[admin]\nsecret = \"  \"\n");
        assert!(matches!(
            ConfigLoader::new(&empty_secret, None).load(),
            Err(ConfigError::ValidationError(_))
        ));

        let bad_url = write_config(
            &dir,
            "[admin]\nsecret = \"s\"\n\n[guard]\nverify_url = \"ftp://example.com/verify\"\n",
        );
        assert!(matches!(
            ConfigLoader::new(&bad_url, None).load(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::new(dir.path().join("absent.toml"), None).load();
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
