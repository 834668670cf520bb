use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_MAX_PAGE_SIZE, DEFAULT_PAGE_SIZE,
    DEFAULT_PORT, DEFAULT_TOKEN_TTL_HOURS, MIN_JWT_SECRET_LEN,
};
use crate::utils::file::expand_path;

/// Server configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Auth configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AuthFileConfig {
    pub enabled: Option<bool>,
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: Option<u32>,
}

/// Catalog configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CatalogFileConfig {
    pub page_size: Option<u32>,
    pub max_page_size: Option<u32>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub auth: Option<AuthFileConfig>,
    pub catalog: Option<CatalogFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        if let Some(auth) = other.auth {
            let current = self.auth.get_or_insert_with(AuthFileConfig::default);
            if auth.enabled.is_some() {
                tracing::trace!(enabled = ?auth.enabled, "Merging auth.enabled");
                current.enabled = auth.enabled;
            }
            if auth.jwt_secret.is_some() {
                tracing::trace!("Merging auth.jwt_secret");
                current.jwt_secret = auth.jwt_secret;
            }
            if auth.token_ttl_hours.is_some() {
                tracing::trace!(ttl = ?auth.token_ttl_hours, "Merging auth.token_ttl_hours");
                current.token_ttl_hours = auth.token_ttl_hours;
            }
        }

        if let Some(catalog) = other.catalog {
            let current = self.catalog.get_or_insert_with(CatalogFileConfig::default);
            if catalog.page_size.is_some() {
                tracing::trace!(page_size = ?catalog.page_size, "Merging catalog.page_size");
                current.page_size = catalog.page_size;
            }
            if catalog.max_page_size.is_some() {
                tracing::trace!(max = ?catalog.max_page_size, "Merging catalog.max_page_size");
                current.max_page_size = catalog.max_page_size;
            }
        }

        if let serde_json::Value::Object(extra) = other.extra
            && !extra.is_empty()
        {
            match &mut self.extra {
                serde_json::Value::Object(current) => current.extend(extra),
                current => *current = serde_json::Value::Object(extra),
            }
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub enabled: bool,
    /// Configured signing secret; a random one is generated at startup when absent
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: u32,
}

/// Catalog listing configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub page_size: u32,
    pub max_page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

impl CatalogConfig {
    /// Resolve the page size for a request from its optional `limit` value.
    ///
    /// Falls back to the configured default when the value is absent,
    /// non-numeric or non-positive; caps it at `max_page_size`.
    pub fn resolve_page_size(&self, limit: Option<&str>) -> u32 {
        limit
            .and_then(|l| l.trim().parse::<u32>().ok())
            .filter(|&l| l > 0)
            .map(|l| l.min(self.max_page_size))
            .unwrap_or(self.page_size)
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.storefront/storefront.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::from_sources(cli, file_config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn from_sources(cli: &CliConfig, file_config: FileConfig) -> Result<Self> {
        let file_server = file_config.server.unwrap_or_default();
        let file_auth = file_config.auth.unwrap_or_default();
        let file_catalog = file_config.catalog.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        // auth.enabled: file config sets default, --no-auth CLI flag disables
        let auth_enabled = if cli.no_auth {
            false
        } else {
            file_auth.enabled.unwrap_or(true)
        };

        let jwt_secret = cli
            .jwt_secret
            .clone()
            .or(file_auth.jwt_secret)
            .filter(|s| !s.is_empty());
        if let Some(ref secret) = jwt_secret
            && secret.len() < MIN_JWT_SECRET_LEN
        {
            anyhow::bail!(
                "JWT secret must be at least {} characters",
                MIN_JWT_SECRET_LEN
            );
        }

        let token_ttl_hours = file_auth
            .token_ttl_hours
            .unwrap_or(DEFAULT_TOKEN_TTL_HOURS);
        if token_ttl_hours == 0 {
            anyhow::bail!("auth.token_ttl_hours must be greater than 0");
        }

        let max_page_size = file_catalog
            .max_page_size
            .unwrap_or(DEFAULT_MAX_PAGE_SIZE);
        let page_size = cli
            .page_size
            .or(file_catalog.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 || max_page_size == 0 {
            anyhow::bail!("Catalog page sizes must be greater than 0");
        }
        if page_size > max_page_size {
            anyhow::bail!(
                "catalog.page_size ({}) exceeds catalog.max_page_size ({})",
                page_size,
                max_page_size
            );
        }

        let config = Self {
            server: ServerConfig { host, port },
            auth: AuthConfig {
                enabled: auth_enabled,
                jwt_secret,
                token_ttl_hours,
            },
            catalog: CatalogConfig {
                page_size,
                max_page_size,
            },
        };

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            auth = config.auth.enabled,
            page_size = config.catalog.page_size,
            "Configuration loaded"
        );

        Ok(config)
    }
}

/// Get the profile config path (~/.storefront/storefront.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}
