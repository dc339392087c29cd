use crate::cli::Cli;
use anyhow::{Context, Result};
use brewforge_core::{
    registry::Registry,
    store::{FileStore, Preferences},
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info};

const DEFAULT_FRAME_MS: u64 = 100;
const DEFAULT_OUTPUT_DIR: &str = "./runs";
const DEFAULT_BASE_URL: &str = "http://localhost:3000/";
const FALLBACK_STORE_PATH: &str = "./brewforge-preferences.json";

/// Settings read from an optional YAML file. Command-line flags win over
/// file values, which win over the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog_dir: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
    /// Guide refresh period in milliseconds.
    pub frame_ms: u64,
    pub output_dir: PathBuf,
    pub base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_dir: None,
            store_path: None,
            frame_ms: DEFAULT_FRAME_MS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML from {:?}", path))?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// The config file named on the command line, if any, with flag overrides applied.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(dir) = &cli.catalog {
            config.catalog_dir = Some(dir.clone());
        }
        if let Some(path) = &cli.store {
            config.store_path = Some(path.clone());
        }
        debug!(?config, "resolved configuration");
        Ok(config)
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }

    pub fn load_registry(&self) -> Result<Registry> {
        match &self.catalog_dir {
            Some(dir) => Registry::load_dir(dir)
                .with_context(|| format!("Failed to load brewing catalog from {:?}", dir)),
            None => Registry::builtin().context("Built-in brewing catalog is invalid"),
        }
    }

    pub fn preference_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .or_else(FileStore::default_path)
            .unwrap_or_else(|| PathBuf::from(FALLBACK_STORE_PATH))
    }

    pub fn open_preferences(&self) -> Preferences<FileStore> {
        Preferences::load(FileStore::open(self.preference_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn partial_files_keep_defaults_for_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("brewforge.yaml");
        fs::write(&path, "frame_ms: 250\nbase_url: https://brew.example/\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.frame_period(), Duration::from_millis(250));
        assert_eq!(config.base_url, "https://brew.example/");
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.catalog_dir, None);
    }

    #[test]
    fn flags_override_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("brewforge.yaml");
        fs::write(&path, "store_path: /from/file.json\ncatalog_dir: /from/file\n").unwrap();
        let path_arg = path.to_string_lossy().to_string();

        let cli = Cli::try_parse_from(["brewforge", "--config", &path_arg, "--store", "cli.json", "list"]).unwrap();
        let config = AppConfig::resolve(&cli).unwrap();
        assert_eq!(config.store_path, Some(PathBuf::from("cli.json")));
        assert_eq!(config.catalog_dir, Some(PathBuf::from("/from/file")));
        assert_eq!(config.preference_path(), PathBuf::from("cli.json"));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(AppConfig::load(&dir.path().join("absent.yaml")).is_err());
    }

    #[test]
    fn default_config_uses_the_builtin_catalog() {
        let registry = AppConfig::default().load_registry().unwrap();
        assert_eq!(registry.methods().len(), 10);
    }
}
