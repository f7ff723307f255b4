//! Atomic TOML file operations.
//!
//! Typed handle over a single TOML document such as `config.toml`.

use postbox_core::Result;
use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::atomic::{FileLock, read_optional, write_atomic};

/// A handle to a TOML file that is always replaced atomically.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>> {
        match read_optional(&self.path)? {
            Some(content) => Ok(Some(toml::from_str(&content)?)),
            None => Ok(None),
        }
    }

    /// Serializes `data` and replaces the file atomically.
    pub fn save(&self, data: &T) -> Result<()> {
        let toml_string = toml::to_string_pretty(data)?;
        write_atomic(&self.path, toml_string.as_bytes())
    }

    /// Performs a locked read-modify-write cycle.
    ///
    /// `default_value` is used when the file does not exist yet.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<()>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data)?;
        self.save(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestConfig {
        name: String,
        count: u32,
    }

    fn default_config() -> TestConfig {
        TestConfig {
            name: "default".to_string(),
            count: 0,
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<TestConfig>::new(temp_dir.path().join("test.toml"));

        let config = TestConfig {
            name: "test".to_string(),
            count: 42,
        };
        file.save(&config).unwrap();

        assert_eq!(file.load().unwrap(), Some(config));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<TestConfig>::new(temp_dir.path().join("missing.toml"));
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        std::fs::write(&path, "name = [unterminated").unwrap();

        let file = AtomicTomlFile::<TestConfig>::new(path);
        assert!(file.load().is_err());
    }

    #[test]
    fn test_update() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<TestConfig>::new(temp_dir.path().join("test.toml"));

        file.update(default_config(), |config| {
            config.count += 10;
            Ok(())
        })
        .unwrap();
        file.update(default_config(), |config| {
            config.count += 5;
            Ok(())
        })
        .unwrap();

        assert_eq!(file.load().unwrap().unwrap().count, 15);
    }
}
