use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_CATALOG_URL: &str = "http://localhost:8081";
pub const DEFAULT_CONVERSION_URL: &str = "http://localhost:8082";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServiceConfig {
    pub base_url: String,
}

impl ServiceConfig {
    fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    pub catalog: Option<ServiceConfig>,
    pub conversion: Option<ServiceConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            catalog: Some(ServiceConfig::new(DEFAULT_CATALOG_URL)),
            conversion: Some(ServiceConfig::new(DEFAULT_CONVERSION_URL)),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl AppConfig {
    /// Loads the default config file, or the built-in defaults when it does
    /// not exist yet.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using default service URLs",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("az", "manat", "manat")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn catalog_url(&self) -> &str {
        self.providers
            .catalog
            .as_ref()
            .map_or(DEFAULT_CATALOG_URL, |p| &p.base_url)
    }

    pub fn conversion_url(&self) -> &str {
        self.providers
            .conversion
            .as_ref()
            .map_or(DEFAULT_CONVERSION_URL, |p| &p.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  catalog:
    base_url: "http://rates.example.com"
  conversion:
    base_url: "http://convert.example.com"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.catalog_url(), "http://rates.example.com");
        assert_eq!(config.conversion_url(), "http://convert.example.com");
    }

    #[test]
    fn test_missing_providers_use_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.catalog_url(), DEFAULT_CATALOG_URL);
        assert_eq!(config.conversion_url(), DEFAULT_CONVERSION_URL);

        let partial = r#"
providers:
  catalog:
    base_url: "http://rates.example.com"
"#;
        let config: AppConfig = serde_yaml::from_str(partial).unwrap();
        assert_eq!(config.catalog_url(), "http://rates.example.com");
        assert_eq!(config.conversion_url(), DEFAULT_CONVERSION_URL);
    }

    #[test]
    fn test_load_from_path() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            "providers:\n  conversion:\n    base_url: \"http://127.0.0.1:9000\""
        )?;

        let config = AppConfig::load_from_path(file.path())?;
        assert_eq!(config.conversion_url(), "http://127.0.0.1:9000");
        Ok(())
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let err = AppConfig::load_from_path("/nonexistent/manat/config.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
