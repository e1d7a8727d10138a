//! Shop CLI - command line tool for the storefront.
//!
//! Commands:
//! - `shop totals` - Compute a cart summary from line items
//! - `shop resolve` - Follow the redirect table (and the gate) for a path
//! - `shop redirects` - List redirects and report cycles
//! - `shop role` - Classify a user id against the admin list
//! - `shop config` - Show, create or validate the config file
//! - `shop demo` - Run a full purchase against the in-memory store

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ConfigArgs, DemoArgs, RedirectsArgs, ResolveArgs, RoleArgs, TotalsArgs};

/// Shop CLI - inspect and exercise the storefront
#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute cart totals
    Totals(TotalsArgs),

    /// Resolve a request path
    Resolve(ResolveArgs),

    /// List redirects and check for cycles
    Redirects(RedirectsArgs),

    /// Show the role of a user id
    Role(RoleArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Run an end-to-end purchase in memory
    Demo(DemoArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = context::Context::load(cli.config.as_deref(), output)?;

    let result = match cli.command {
        Commands::Totals(args) => commands::totals::run(args, &ctx).await,
        Commands::Resolve(args) => commands::resolve::run(args, &ctx).await,
        Commands::Redirects(args) => commands::redirects::run(args, &ctx).await,
        Commands::Role(args) => commands::role::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
        Commands::Demo(args) => commands::demo::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
