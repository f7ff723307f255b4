//! Configuration service implementation.
//!
//! Loads the client configuration from `config.toml` in the postbox config
//! directory.

use crate::paths::PostboxPaths;
use crate::storage::AtomicTomlFile;
use postbox_core::Result;
use postbox_core::config::ClientConfig;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the client configuration.
///
/// A missing file yields defaults; an unreadable one is an error, since
/// silently falling back would point the client at the wrong backend.
#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicTomlFile<ClientConfig>>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the given file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading `config.toml` from the resolved config dir.
    pub fn new(paths: &PostboxPaths) -> Result<Self> {
        Ok(Self::with_path(paths.config_file()?))
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<ClientConfig> {
        if let Some(cached) = self.cached() {
            return Ok(cached);
        }

        let loaded = match self.file.load()? {
            Some(config) => config,
            None => {
                tracing::debug!(path = %self.file.path().display(), "no config file, using defaults");
                ClientConfig::default()
            }
        };

        self.store_cache(Some(loaded.clone()));
        Ok(loaded)
    }

    /// Writes the configuration and refreshes the cache.
    pub fn save_config(&self, config: &ClientConfig) -> Result<()> {
        self.file.save(config)?;
        self.store_cache(Some(config.clone()));
        Ok(())
    }

    /// Writes a default config file if none exists yet.
    pub fn ensure_config_file(&self) -> Result<ClientConfig> {
        if self.file.load()?.is_none() {
            // Re-checked under the file lock; a concurrently written file wins
            self.file.update(ClientConfig::default(), |_| Ok(()))?;
            self.invalidate_cache();
        }
        self.get_config()
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        self.store_cache(None);
    }

    fn cached(&self) -> Option<ClientConfig> {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn store_cache(&self, config: Option<ClientConfig>) {
        *self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = config;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));
        assert_eq!(service.get_config().unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_base_url = \"https://mail.example.com\"\nrequest_timeout_secs = 5\n",
        )
        .unwrap();

        let config = ConfigService::with_path(path).get_config().unwrap();
        assert_eq!(config.api_base_url, "https://mail.example.com");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "request_timeout_secs = \"soon\"").unwrap();

        assert!(ConfigService::with_path(path).get_config().is_err());
    }

    #[test]
    fn test_save_and_cache() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(path.clone());

        let config = ClientConfig::default().with_overrides(Some("http://10.0.2.2:8001".into()), None);
        service.save_config(&config).unwrap();
        assert_eq!(service.get_config().unwrap(), config);

        let fresh = ConfigService::with_path(path);
        assert_eq!(fresh.get_config().unwrap(), config);
    }

    #[test]
    fn test_ensure_config_file_keeps_existing_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(path.clone());

        service.ensure_config_file().unwrap();
        assert!(path.exists());

        std::fs::write(&path, "log_level = \"debug\"\n").unwrap();
        service.invalidate_cache();
        let config = service.ensure_config_file().unwrap();
        assert_eq!(config.log_level, "debug");
    }
}
