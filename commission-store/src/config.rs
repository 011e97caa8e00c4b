//! Store configuration

use std::env;
use std::path::PathBuf;

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Sled data directory; `None` keeps everything in memory
    pub data_dir: Option<PathBuf>,
    /// Flush to disk after every write
    pub flush_on_write: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: Some(PathBuf::from("./commission_data")),
            flush_on_write: true,
        }
    }
}

impl StoreConfig {
    /// Development configuration
    pub fn development() -> Self {
        Self {
            data_dir: Some(PathBuf::from("./commission_dev_data")),
            flush_on_write: false,
        }
    }

    /// Test configuration (in-memory)
    pub fn test() -> Self {
        Self {
            data_dir: None,
            flush_on_write: false,
        }
    }

    /// Load from `COMMISSION_DATA_DIR` and `COMMISSION_FLUSH_ON_WRITE`
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let data_dir = match env::var("COMMISSION_DATA_DIR") {
            Ok(dir) if dir.trim().is_empty() => None,
            Ok(dir) => Some(PathBuf::from(dir)),
            Err(_) => defaults.data_dir,
        };

        let flush_on_write = env::var("COMMISSION_FLUSH_ON_WRITE")
            .map(|s| s.to_lowercase() == "true" || s == "1")
            .unwrap_or(defaults.flush_on_write);

        Self {
            data_dir,
            flush_on_write,
        }
    }

    /// Override the data directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.data_dir.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(StoreConfig::test().is_in_memory());
        assert!(!StoreConfig::default().is_in_memory());
        assert!(!StoreConfig::development().flush_on_write);
    }

    #[test]
    fn test_with_data_dir() {
        let config = StoreConfig::test().with_data_dir("/tmp/x");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/x")));
    }
}
