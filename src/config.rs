use crate::error::{Error, Result};
use crate::storage::{data_dir, project_dirs, write_atomic};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PRODUCT_ROWS: usize = 5;

const DIRECTORY_FILE: &str = "suppliers.csv";
const TEMPLATE_FILE: &str = "email_template.txt";
const EXPORT_DIR: &str = "exports";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub directory_path: Option<PathBuf>,
    pub template_path: Option<PathBuf>,
    pub product_rows: usize,
    pub export_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            directory_path: None,
            template_path: None,
            product_rows: DEFAULT_PRODUCT_ROWS,
            export_dir: None,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config_path() -> Option<PathBuf> {
        let proj = project_dirs()?;
        Some(proj.config_dir().join("config.toml"))
    }

    /// Reads the user's config file, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            log::warn!("no config directory available, using defaults");
            return Self::new();
        };
        if !path.exists() {
            return Self::new();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::new()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&text).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| Error::Config("no config directory".into()))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        write_atomic(path, toml.as_bytes())
    }

    fn in_data_dir(name: &str) -> PathBuf {
        data_dir().unwrap_or_else(|| PathBuf::from(".")).join(name)
    }

    pub fn directory_file(&self) -> PathBuf {
        self.directory_path
            .clone()
            .unwrap_or_else(|| Self::in_data_dir(DIRECTORY_FILE))
    }

    pub fn template_file(&self) -> PathBuf {
        self.template_path
            .clone()
            .unwrap_or_else(|| Self::in_data_dir(TEMPLATE_FILE))
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| Self::in_data_dir(EXPORT_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str("directory_path = \"/srv/suppliers.csv\"").unwrap();
        assert_eq!(config.directory_file(), PathBuf::from("/srv/suppliers.csv"));
        assert_eq!(config.product_rows, DEFAULT_PRODUCT_ROWS);
        assert!(config.template_file().ends_with(TEMPLATE_FILE));
        assert!(config.export_dir().ends_with(EXPORT_DIR));
    }
}
