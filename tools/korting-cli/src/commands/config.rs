//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Get { key } => get_config(&key, ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;

    ctx.output.info("");
    ctx.output.info("[source]");
    if let Some(ref url) = config.source.api_url {
        ctx.output.kv("api_url", url);
    }
    if let Some(ref catalog) = config.source.catalog {
        ctx.output.kv("catalog", catalog);
    }
    ctx.output
        .kv("timeout_secs", &config.source.timeout_secs.to_string());

    ctx.output.info("");
    ctx.output.info("[sync]");
    ctx.output
        .kv("abort_superseded", &config.sync.abort_superseded.to_string());
    ctx.output
        .kv("stats_fallback", &config.sync.stats_fallback.to_string());

    ctx.output.info("");
    ctx.output.info("[display]");
    ctx.output.kv("max_rows", &config.display.max_rows.to_string());

    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("level", config.logging.level.as_str());
    ctx.output.kv("format", &config.logging.format.to_string());

    Ok(())
}

async fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        let value: serde_json::Value =
            serde_json::from_str(&value).unwrap_or(serde_json::Value::String(value));
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("korting.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let source = &ctx.config.source;

    // Check the data source
    match (&source.api_url, &source.catalog) {
        (None, None) => errors.push("source.api_url or source.catalog is required".to_string()),
        (Some(_), Some(_)) => {
            warnings.push("source.catalog is ignored while source.api_url is set".to_string())
        }
        _ => {}
    }
    if let Some(url) = &source.api_url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(format!("source.api_url '{}' must be an http(s) URL", url));
        }
    } else if let Some(catalog) = &source.catalog {
        let path = ctx.resolve_path(catalog);
        if !path.exists() {
            errors.push(format!("source.catalog '{}' does not exist", path.display()));
        }
    }
    if source.timeout_secs == 0 {
        errors.push("source.timeout_secs must be positive".to_string());
    }

    // Check display
    if ctx.config.display.max_rows == 0 {
        warnings.push("display.max_rows is 0; no offers will be printed".to_string());
    }

    // Probe the API when the config is otherwise sound
    if errors.is_empty() {
        if let Some(http) = ctx.http_source()? {
            match http.health().await {
                Ok(health) if health.is_healthy() => {
                    ctx.output.success(&format!("API at {} is healthy", http.base_url()));
                }
                Ok(health) => warnings.push(format!(
                    "API at {} reports status '{}'",
                    http.base_url(),
                    health.status
                )),
                Err(e) => errors.push(format!("API at {} is unreachable: {}", http.base_url(), e)),
            }
        }
    }

    // Print results
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

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    let quoted = |value: &Option<String>| {
        value
            .as_ref()
            .map(|v| format!("\"{}\"", v))
            .unwrap_or_else(|| "null".to_string())
    };

    match parts.as_slice() {
        ["source", "api_url"] => Ok(quoted(&config.source.api_url)),
        ["source", "catalog"] => Ok(quoted(&config.source.catalog)),
        ["source", "timeout_secs"] => Ok(config.source.timeout_secs.to_string()),
        ["sync", "abort_superseded"] => Ok(config.sync.abort_superseded.to_string()),
        ["sync", "stats_fallback"] => Ok(config.sync.stats_fallback.to_string()),
        ["display", "max_rows"] => Ok(config.display.max_rows.to_string()),
        ["logging", "level"] => Ok(format!("\"{}\"", config.logging.level)),
        ["logging", "format"] => Ok(format!("\"{}\"", config.logging.format)),
        _ => bail!("Unknown config key: {}", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_value() {
        let mut config = CliConfig::default();
        config.source.api_url = Some("http://localhost:5000/api".to_string());

        assert_eq!(
            get_config_value(&config, "source.api_url").unwrap(),
            "\"http://localhost:5000/api\""
        );
        assert_eq!(get_config_value(&config, "source.catalog").unwrap(), "null");
        assert_eq!(get_config_value(&config, "sync.stats_fallback").unwrap(), "true");
        assert_eq!(get_config_value(&config, "logging.level").unwrap(), "\"warn\"");
        assert!(get_config_value(&config, "deploy.canary").is_err());
    }
}
