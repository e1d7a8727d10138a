//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use shop_actions::ShopSettings;
use shop_core::generate_default_config;
use shop_router::{validate_routing, RedirectTable};

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

const CONFIG_FILE: &str = "shop.toml";

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("source", &path.display().to_string()),
        None => ctx.output.kv("source", "built-in defaults"),
    }
    ctx.output.info("");
    ctx.output.info(&ctx.config.to_toml()?);
    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config()?)?;
    ctx.output.success(&format!("Created: {}", config_path.display()));
    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if let Err(e) = ctx.config.validate() {
        errors.push(e.to_string());
    }
    if let Err(e) = validate_routing(&ctx.config.routing) {
        errors.push(e.to_string());
    }
    if let Err(e) = ShopSettings::from_config(&ctx.config) {
        errors.push(e.to_string());
    }

    if ctx.config.auth.admin_user_ids.is_empty() {
        warnings.push("auth.admin_user_ids is empty; nobody can reach /admin".to_string());
    }
    let redirects = RedirectTable::from_config(&ctx.config.routing);
    for (from, to) in redirects.iter() {
        if !from.starts_with('/') || !to.starts_with('/') {
            warnings.push(format!("redirect {from} -> {to} is not an absolute path"));
        }
    }

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
