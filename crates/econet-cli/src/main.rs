//! ecoNET CLI - Command-line tool for ecoNET boiler controllers
//!
//! Reads telemetry from and writes control parameters to a controller's
//! local HTTP API.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use econet_client::{ClientConfig, EconetClient, Setting};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{ArgOverrides, Config, MergedConfig};
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "econet-cli")]
#[command(author, version, about = "ecoNET boiler controller CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// Controller hostname or URL
    #[arg(short = 'H', long, env = "ECONET_HOST")]
    host: Option<String>,

    /// Username for HTTP Basic authentication
    #[arg(short, long, env = "ECONET_USER")]
    user: Option<String>,

    /// Password for HTTP Basic authentication
    #[arg(short, long, env = "ECONET_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Configuration file path
    #[arg(short, long, env = "ECONET_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read all telemetry parameters
    Params,

    /// Show the operating state summary
    Status,

    /// Show the controller identity
    Sys,

    /// Set the target hot-water temperature
    HuwTemp {
        /// Temperature in °C
        temp: i64,
    },

    /// Set the target central-heating temperature
    CoTemp {
        /// Temperature in °C
        temp: i64,
    },

    /// Set the hot-water heater mode
    HuwMode {
        /// Mode value
        mode: i64,
    },

    /// Switch the hot-water heater off
    HuwOff,

    /// Set the boiler operating mode
    Boiler {
        /// Status name (e.g. work, stop, turned_off) or numeric code
        status: String,
    },

    /// Write any parameter code
    Set {
        /// Parameter code (newParamKey)
        key: u16,

        /// Value to write
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },

    /// List the known writable parameters
    Settings,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Settings listing needs no controller
    if let Commands::Settings = cli.command {
        let format = cli.output.unwrap_or_default();
        let ctx = OutputContext::new(format, cli.no_color, cli.quiet);
        commands::settings(&ctx);
        return Ok(());
    }

    // Merge CLI args with config
    let merged = config.merge_with_args(&ArgOverrides {
        host: cli.host.as_deref(),
        username: cli.user.as_deref(),
        password: cli.password.as_deref(),
        timeout: cli.timeout,
        output: cli.output.map(OutputFormat::as_str),
        no_color: cli.no_color,
    })?;

    let format = OutputFormat::parse(&merged.output).map_err(anyhow::Error::msg)?;
    let ctx = OutputContext::new(format, merged.no_color, cli.quiet);

    let client = create_client(&merged).await?;

    // Execute command
    match cli.command {
        Commands::Params => commands::params(&client, &ctx).await?,
        Commands::Status => commands::status(&client, &ctx).await?,
        Commands::Sys => commands::sys(&client, &ctx).await?,
        Commands::HuwTemp { temp } => {
            commands::write_setting(&client, Setting::HuwTemp, temp, &ctx).await?
        }
        Commands::CoTemp { temp } => {
            commands::write_setting(&client, Setting::CoTemp, temp, &ctx).await?
        }
        Commands::HuwMode { mode } => {
            commands::write_setting(&client, Setting::HuwMode, mode, &ctx).await?
        }
        Commands::HuwOff => {
            client
                .disable_huw()
                .await
                .context("Failed to disable hot water")?;
            ctx.success("Hot-water heater switched off");
        }
        Commands::Boiler { status } => commands::boiler(&client, &status, &ctx).await?,
        Commands::Set { key, value } => commands::set(&client, key, value, &ctx).await?,
        Commands::Settings => commands::settings(&ctx),
    }

    Ok(())
}

/// Connect to the controller named in the merged configuration
async fn create_client(merged: &MergedConfig) -> Result<EconetClient> {
    let config = ClientConfig::new(&merged.host, &merged.username, &merged.password)
        .with_timeout(merged.timeout);
    EconetClient::connect(config)
        .await
        .with_context(|| format!("Failed to connect to {}", merged.host))
}
