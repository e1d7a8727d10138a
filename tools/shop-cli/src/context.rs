//! CLI execution context.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use shop_core::ShopConfig;
use shop_observability::init_logging;

use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    pub config: ShopConfig,
    /// Where the config came from; `None` when running on defaults.
    pub config_path: Option<PathBuf>,
    pub output: Output,
    pub cwd: PathBuf,
}

impl Context {
    /// Load the config, install logging, then apply `SHOP_*` overrides.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config_path, mut config) = match config_path {
            Some(path) => {
                let path = PathBuf::from(path);
                let config = ShopConfig::load(&path)?;
                (Some(path), config)
            }
            None => match ShopConfig::discover(&cwd) {
                Some((path, config)) => (Some(path), config),
                None => (None, ShopConfig::default()),
            },
        };

        let mut logging = config.logging.clone();
        if output.is_verbose() {
            logging.level = "debug".to_string();
        }
        init_logging(&logging);

        // After logging, so a malformed admin list is reported.
        config.apply_env();

        if let Some(path) = &config_path {
            output.debug(&format!("Using config: {}", path.display()));
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }
}
