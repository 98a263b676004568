use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub roster: RosterConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7410".to_string()
}

/// Geocoding provider. The credential is optional: without one the resolver
/// falls back to scanning the raw address for a state abbreviation.
#[derive(Debug, Deserialize, Clone)]
pub struct GeocoderConfig {
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            api_key: None,
            timeout_secs: default_geocoder_timeout(),
        }
    }
}

fn default_geocoder_url() -> String {
    "https://api.geocod.io/v1.7/geocode".to_string()
}
fn default_geocoder_timeout() -> u64 {
    10
}

/// Cursor-paginated officeholder directory (precise location filtering).
#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryConfig {
    #[serde(default = "default_directory_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_directory_url(),
            api_key: None,
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            timeout_secs: default_provider_timeout(),
        }
    }
}

fn default_directory_url() -> String {
    "https://directory.civicapi.com/graphql".to_string()
}
fn default_page_size() -> usize {
    100
}
fn default_max_pages() -> usize {
    50
}
fn default_provider_timeout() -> u64 {
    15
}

/// State-dump roster directory (state-level filtering only, page pagination).
#[derive(Debug, Deserialize, Clone)]
pub struct RosterConfig {
    #[serde(default = "default_roster_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_roster_page_limit")]
    pub page_limit: usize,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            base_url: default_roster_url(),
            api_key: None,
            page_limit: default_roster_page_limit(),
            max_pages: default_max_pages(),
            timeout_secs: default_provider_timeout(),
        }
    }
}

fn default_roster_url() -> String {
    "https://roster.civicapi.com/v1/officials".to_string()
}
fn default_roster_page_limit() -> usize {
    200
}

impl GeocoderConfig {
    /// Config value wins; the environment variable is the deploy-time path.
    pub fn credential(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("CIVICA_GEOCODER_API_KEY").ok())
    }
}

impl DirectoryConfig {
    pub fn credential(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("CIVICA_DIRECTORY_API_KEY").ok())
    }
}

impl RosterConfig {
    pub fn credential(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("CIVICA_ROSTER_API_KEY").ok())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.directory.page_size == 0 {
        anyhow::bail!("directory.page_size must be > 0");
    }
    if config.directory.max_pages == 0 {
        anyhow::bail!("directory.max_pages must be > 0");
    }
    if config.roster.page_limit == 0 {
        anyhow::bail!("roster.page_limit must be > 0");
    }
    if config.roster.max_pages == 0 {
        anyhow::bail!("roster.max_pages must be > 0");
    }
    if config.geocoder.timeout_secs == 0
        || config.directory.timeout_secs == 0
        || config.roster.timeout_secs == 0
    {
        anyhow::bail!("timeout_secs must be > 0 for all providers");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.directory.page_size, 100);
        assert_eq!(config.roster.page_limit, 200);
        assert_eq!(config.server.bind, "127.0.0.1:7410");
    }

    #[test]
    fn test_overrides() {
        let config: Config = toml::from_str(
            r#"
[directory]
base_url = "http://localhost:9000/graphql"
page_size = 25

[roster]
api_key = "test-key"
"#,
        )
        .unwrap();
        assert_eq!(config.directory.base_url, "http://localhost:9000/graphql");
        assert_eq!(config.directory.page_size, 25);
        assert_eq!(config.roster.credential().as_deref(), Some("test-key"));
    }

    #[test]
    fn test_load_rejects_zero_page_size() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[directory]\npage_size = 0\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }
}
