//! CLI configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use parfum_commerce::checkout::{DEFAULT_FREE_SHIPPING_BANI, DEFAULT_SHIPPING_FEE_BANI};
use parfum_commerce::prelude::ShippingPolicy;
use parfum_observability::LogConfig;
use parfum_store::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, from the working directory upwards.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["parfum.toml", ".parfum.toml", "parfum.json"];

pub const ENV_BACKEND_URL: &str = "PARFUM_BACKEND_URL";
pub const ENV_ANON_KEY: &str = "PARFUM_ANON_KEY";
pub const ENV_ACCESS_TOKEN: &str = "PARFUM_ACCESS_TOKEN";
pub const ENV_FIXTURE: &str = "PARFUM_FIXTURE";

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Where the shop data lives.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Shop settings.
    #[serde(default)]
    pub shop: ShopConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if path.extension().is_some_and(|e| e == "json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Apply `PARFUM_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = lookup(ENV_BACKEND_URL) {
            self.backend.url = Some(url);
        }
        if let Some(key) = lookup(ENV_ANON_KEY) {
            self.backend.anon_key = Some(key);
        }
        if let Some(token) = lookup(ENV_ACCESS_TOKEN) {
            self.backend.access_token = Some(token);
        }
        if let Some(fixture) = lookup(ENV_FIXTURE) {
            self.backend.fixture = Some(PathBuf::from(fixture));
        }
    }

    /// Problems that make the config unusable, then warnings.
    pub fn check(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        match (&self.backend.url, &self.backend.fixture) {
            (None, None) => errors.push(format!(
                "backend.url or backend.fixture is required (or set {} / {})",
                ENV_BACKEND_URL, ENV_FIXTURE
            )),
            (Some(url), _) if !url.starts_with("http://") && !url.starts_with("https://") => {
                errors.push(format!("backend.url must be an http(s) URL, got '{}'", url))
            }
            (Some(_), Some(_)) => {
                warnings.push("backend.fixture is set and takes precedence over backend.url".into())
            }
            _ => {}
        }
        if self.backend.url.is_some()
            && self.backend.fixture.is_none()
            && self.backend.anon_key.is_none()
        {
            errors.push(format!("backend.anon_key is required (or set {})", ENV_ANON_KEY));
        }

        if self.shop.shipping_fee_bani < 0 {
            errors.push("shop.shipping_fee_bani cannot be negative".into());
        }
        if self.shop.free_shipping_threshold_bani.is_some_and(|t| t < 0) {
            errors.push("shop.free_shipping_threshold_bani cannot be negative".into());
        }
        if self.shop.catalog_page_size < 1 {
            errors.push("shop.catalog_page_size must be at least 1".into());
        }
        if self.shop.cache_ttl_secs == 0 {
            warnings.push("shop.cache_ttl_secs is 0: cached reads never expire".into());
        }

        (errors, warnings)
    }
}

/// Backend connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BackendConfig {
    /// Project URL of the hosted backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Public (anon) API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,

    /// Admin session token. Prefer the environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// JSON fixture to use instead of the hosted backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture: Option<PathBuf>,
}

/// Shop settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShopConfig {
    #[serde(default = "default_shipping_fee")]
    pub shipping_fee_bani: i64,

    /// Subtotal from which shipping is free; unset means never free.
    #[serde(default = "default_free_threshold")]
    pub free_shipping_threshold_bani: Option<i64>,

    #[serde(default = "default_page_size")]
    pub catalog_page_size: i64,

    /// Seconds a cached read stays fresh; 0 keeps it forever.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

fn default_shipping_fee() -> i64 {
    DEFAULT_SHIPPING_FEE_BANI
}

fn default_free_threshold() -> Option<i64> {
    Some(DEFAULT_FREE_SHIPPING_BANI)
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

fn default_cache_ttl() -> u64 {
    60
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            shipping_fee_bani: default_shipping_fee(),
            free_shipping_threshold_bani: default_free_threshold(),
            catalog_page_size: default_page_size(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

impl ShopConfig {
    pub fn shipping_policy(&self) -> ShippingPolicy {
        ShippingPolicy {
            flat_fee_bani: self.shipping_fee_bani,
            free_threshold_bani: self.free_shipping_threshold_bani,
        }
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }
}

/// Generate a default parfum.toml.
pub fn generate_default_config() -> String {
    format!(
        r#"# Parfum CLI configuration

[backend]
# url = "https://your-project.example.co"
# anon_key = "public-anon-key"
# Use a local JSON fixture instead of the hosted backend:
# fixture = "shop.json"

[shop]
shipping_fee_bani = {fee}
free_shipping_threshold_bani = {threshold}
catalog_page_size = {page_size}
cache_ttl_secs = 60

[logging]
level = "info"
format = "human"
"#,
        fee = DEFAULT_SHIPPING_FEE_BANI,
        threshold = DEFAULT_FREE_SHIPPING_BANI,
        page_size = DEFAULT_PAGE_SIZE,
    )
}
