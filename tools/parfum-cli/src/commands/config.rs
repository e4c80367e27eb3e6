//! Configuration management commands.

use anyhow::{bail, Result};
use parfum_observability::{LogFormat, LogLevel};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig, CONFIG_FILE_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[backend]");
    for key in ["backend.url", "backend.anon_key", "backend.access_token", "backend.fixture"] {
        if let Some(value) = get_config_value(&ctx.config, key)? {
            ctx.output.kv(key.trim_start_matches("backend."), &value);
        }
    }

    ctx.output.info("");
    ctx.output.info("[shop]");
    for key in SHOP_KEYS {
        let value = get_config_value(&ctx.config, key)?.unwrap_or_else(|| "none".into());
        ctx.output.kv(key.trim_start_matches("shop."), &value);
    }

    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("level", ctx.config.logging.level.as_str());
    ctx.output.kv("format", format_name(ctx.config.logging.format));
    Ok(())
}

const SHOP_KEYS: [&str; 4] = [
    "shop.shipping_fee_bani",
    "shop.free_shipping_threshold_bani",
    "shop.catalog_page_size",
    "shop.cache_ttl_secs",
];

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value.unwrap_or_default());
    }
    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(path) = &ctx.config_path else {
        bail!("No config file found. Run `parfum config init` to create one.");
    };

    // Edit the file as written, without environment overrides.
    let mut config = CliConfig::load(path)?;
    set_config_value(&mut config, key, value)?;
    config.save(path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    tokio::fs::write(&config_path, generate_default_config()).await?;
    ctx.output
        .success(&format!("Created: {}", config_path.display()));
    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = ctx.config.check();
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }
    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }
    ctx.output.success("Configuration is valid (with warnings)");
    Ok(())
}

fn format_name(format: LogFormat) -> &'static str {
    match format {
        LogFormat::Human => "human",
        LogFormat::Json => "json",
    }
}

/// Secrets are shown masked.
fn get_config_value(config: &CliConfig, key: &str) -> Result<Option<String>> {
    let parts: Vec<&str> = key.split('.').collect();

    Ok(match parts.as_slice() {
        ["backend", "url"] => config.backend.url.clone(),
        ["backend", "anon_key"] => config.backend.anon_key.as_deref().map(mask),
        ["backend", "access_token"] => config.backend.access_token.as_deref().map(mask),
        ["backend", "fixture"] => config
            .backend
            .fixture
            .as_ref()
            .map(|p| p.display().to_string()),
        ["shop", "shipping_fee_bani"] => Some(config.shop.shipping_fee_bani.to_string()),
        ["shop", "free_shipping_threshold_bani"] => config
            .shop
            .free_shipping_threshold_bani
            .map(|t| t.to_string()),
        ["shop", "catalog_page_size"] => Some(config.shop.catalog_page_size.to_string()),
        ["shop", "cache_ttl_secs"] => Some(config.shop.cache_ttl_secs.to_string()),
        ["logging", "level"] => Some(config.logging.level.as_str().to_string()),
        ["logging", "format"] => Some(format_name(config.logging.format).to_string()),
        _ => bail!("Unknown config key: {}", key),
    })
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let optional = |v: &str| (!v.trim().is_empty() && v != "none").then(|| v.trim().to_string());

    match parts.as_slice() {
        ["backend", "url"] => config.backend.url = optional(value),
        ["backend", "anon_key"] => config.backend.anon_key = optional(value),
        ["backend", "fixture"] => config.backend.fixture = optional(value).map(Into::into),
        ["shop", "shipping_fee_bani"] => config.shop.shipping_fee_bani = value.parse()?,
        ["shop", "free_shipping_threshold_bani"] => {
            config.shop.free_shipping_threshold_bani =
                optional(value).map(|v| v.parse()).transpose()?
        }
        ["shop", "catalog_page_size"] => config.shop.catalog_page_size = value.parse()?,
        ["shop", "cache_ttl_secs"] => config.shop.cache_ttl_secs = value.parse()?,
        ["logging", "level"] => config.logging.level = value.parse::<LogLevel>()?,
        ["logging", "format"] => {
            config.logging.format = match value.trim().to_ascii_lowercase().as_str() {
                "human" => LogFormat::Human,
                "json" => LogFormat::Json,
                other => bail!("Unknown log format: {} (use human or json)", other),
            }
        }
        ["backend", "access_token"] => {
            bail!("backend.access_token is not stored by `config set`; use the environment")
        }
        _ => bail!("Unknown or read-only config key: {}", key),
    }
    Ok(())
}

fn mask(secret: &str) -> String {
    let shown: String = secret.chars().take(4).collect();
    format!("{}…", shown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_roundtrip_keys() {
        let mut config = CliConfig::default();
        set_config_value(&mut config, "backend.url", "https://shop.example.co").unwrap();
        set_config_value(&mut config, "shop.catalog_page_size", "12").unwrap();
        set_config_value(&mut config, "logging.format", "JSON").unwrap();

        assert_eq!(
            get_config_value(&config, "backend.url").unwrap().as_deref(),
            Some("https://shop.example.co")
        );
        assert_eq!(config.shop.catalog_page_size, 12);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_clear_free_shipping() {
        let mut config = CliConfig::default();
        set_config_value(&mut config, "shop.free_shipping_threshold_bani", "none").unwrap();
        assert_eq!(config.shop.free_shipping_threshold_bani, None);
        assert_eq!(
            get_config_value(&config, "shop.free_shipping_threshold_bani").unwrap(),
            None
        );
    }

    #[test]
    fn test_secrets_masked_and_unknown_keys() {
        let mut config = CliConfig::default();
        config.backend.anon_key = Some("eyJhbGciOi".into());
        assert_eq!(
            get_config_value(&config, "backend.anon_key").unwrap().as_deref(),
            Some("eyJh…")
        );
        assert!(get_config_value(&config, "shop.colour").is_err());
        assert!(set_config_value(&mut config, "backend.access_token", "x").is_err());
        assert!(set_config_value(&mut config, "logging.level", "loud").is_err());
    }
}
