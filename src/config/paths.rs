//! Path management for spendscan
//!
//! ## Path Resolution Order
//!
//! 1. `SPENDSCAN_DATA_DIR` environment variable (if set)
//! 2. The platform config directory reported by `directories`
//!    (`~/.config/spendscan` on Linux, `%APPDATA%\spendscan\config` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::SpendscanError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "SPENDSCAN_DATA_DIR";

/// Manages all paths used by spendscan
#[derive(Debug, Clone)]
pub struct SpendscanPaths {
    base_dir: PathBuf,
}

impl SpendscanPaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, SpendscanError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) => PathBuf::from(custom),
            None => ProjectDirs::from("", "", "spendscan")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    SpendscanError::Config("Could not determine a home directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the JSON data files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Directory holding stored receipt images
    pub fn receipts_dir(&self) -> PathBuf {
        self.base_dir.join("receipts")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    pub fn receipts_file(&self) -> PathBuf {
        self.data_dir().join("receipts.json")
    }

    /// Learned merchant -> category associations
    pub fn merchants_file(&self) -> PathBuf {
        self.data_dir().join("merchants.json")
    }

    /// Ensure the base, data and receipt image directories exist
    pub fn ensure_directories(&self) -> Result<(), SpendscanError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SpendscanError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| SpendscanError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.receipts_dir()).map_err(|e| {
            SpendscanError::Io(format!("Failed to create receipts directory: {}", e))
        })?;

        Ok(())
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}
