//! CLI command implementations.

pub mod config;
pub mod demo;
pub mod redirects;
pub mod resolve;
pub mod role;
pub mod totals;

use clap::{Args, Subcommand};

/// Arguments for the totals command.
#[derive(Args)]
pub struct TotalsArgs {
    /// Line item as PRICExQUANTITY in minor units (e.g. 500x2). Repeatable.
    #[arg(short, long = "item")]
    pub items: Vec<String>,

    /// Tax rate as a fraction; defaults to the configured rate.
    #[arg(long)]
    pub tax_rate: Option<f64>,

    /// Shipping fee in minor units; defaults to the configured fee.
    #[arg(long)]
    pub shipping: Option<i64>,
}

/// Arguments for the resolve command.
#[derive(Args)]
pub struct ResolveArgs {
    /// Request path, e.g. /admin.
    pub path: String,

    /// Also run the request gate as this role (guest, user, admin).
    #[arg(short, long)]
    pub role: Option<String>,
}

/// Arguments for the redirects command.
#[derive(Args)]
pub struct RedirectsArgs {
    /// Only report cycles.
    #[arg(long)]
    pub cycles_only: bool,
}

/// Arguments for the role command.
#[derive(Args)]
pub struct RoleArgs {
    /// Identity-provider user id. Omit for a guest.
    pub user_id: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

/// Arguments for the demo command.
#[derive(Args)]
pub struct DemoArgs {
    /// Origin used for the payment return URL.
    #[arg(long, default_value = "http://localhost:3000")]
    pub origin: String,

    /// Leave the payment unpaid to see the cleanup path instead.
    #[arg(long)]
    pub abandon: bool,
}
