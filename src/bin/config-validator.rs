//! # Onboarding Configuration Validator
//!
//! Command-line tool for validating `onboarding.yaml` for a given environment
//! before a portal build picks it up.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use onboarding_core::config::{ConfigManager, PortalConfig};
use onboarding_core::workflow::NavigationMode;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "config-validator")]
#[command(about = "Validate onboarding configuration files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Environment to validate (development, test, production)
    #[arg(short, long, default_value = "development")]
    environment: String,

    /// Configuration directory path (default: config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate all configuration components
    All,

    /// Validate one configuration component
    Component {
        /// Component name (gateway, overrides, navigation)
        name: String,
    },

    /// Print the resolved configuration with secrets masked
    Show {
        /// Output format (json, yaml)
        #[arg(long, default_value = "json")]
        format: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let _subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .try_init();

    let result = match &cli.command {
        Some(Commands::All) | None => validate_all_config(&cli),
        Some(Commands::Component { name }) => validate_component(&cli, name),
        Some(Commands::Show { format }) => show_config(&cli, format),
    };

    match result {
        Ok(()) => {
            info!("Configuration validation completed successfully");
            process::exit(0);
        }
        Err(e) => {
            error!("Configuration validation failed: {e}");
            process::exit(1);
        }
    }
}

fn load(cli: &Cli) -> anyhow::Result<std::sync::Arc<ConfigManager>> {
    let manager =
        ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), &cli.environment)?;
    Ok(manager)
}

fn validate_all_config(cli: &Cli) -> anyhow::Result<()> {
    println!("Validating onboarding configuration");
    println!("Environment: {}", cli.environment);
    if let Some(config_dir) = &cli.config_dir {
        println!("Config Directory: {}", config_dir.display());
    }
    println!();

    let manager = match load(cli) {
        Ok(manager) => {
            println!("OK  configuration loaded and validated");
            manager
        }
        Err(e) => {
            println!("ERR {e}");
            return Err(e);
        }
    };

    let config = manager.config();
    validate_gateway_config(config)?;
    validate_overrides_config(config)?;
    validate_navigation_config(config)?;

    println!("\nAll configuration validation checks passed");
    Ok(())
}

fn validate_component(cli: &Cli, component_name: &str) -> anyhow::Result<()> {
    let manager = load(cli)?;
    let config = manager.config();

    match component_name.to_lowercase().as_str() {
        "gateway" => validate_gateway_config(config)?,
        "overrides" | "override-engine" => validate_overrides_config(config)?,
        "navigation" => validate_navigation_config(config)?,
        _ => anyhow::bail!("Unknown component: {component_name}"),
    }

    println!("Component '{component_name}' validation passed");
    Ok(())
}

fn show_config(cli: &Cli, format: &str) -> anyhow::Result<()> {
    let manager = load(cli)?;
    let masked = manager.debug_config();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&masked)?),
        "yaml" => print!("{}", serde_yaml::to_string(&masked)?),
        other => anyhow::bail!("Unsupported format: {other}"),
    }
    Ok(())
}

fn validate_gateway_config(config: &PortalConfig) -> anyhow::Result<()> {
    println!("Gateway");
    println!("   base_url: {}", config.gateway.base_url);
    println!("   timeout:  {} ms", config.gateway.timeout_ms);
    println!(
        "   auth:     {}",
        if config.gateway.bearer_token.is_some() {
            "bearer token"
        } else {
            "none"
        }
    );
    Ok(())
}

fn validate_overrides_config(config: &PortalConfig) -> anyhow::Result<()> {
    println!("Override engine");
    println!(
        "   max_reentrant_passes: {}",
        config.overrides.max_reentrant_passes
    );
    Ok(())
}

fn validate_navigation_config(config: &PortalConfig) -> anyhow::Result<()> {
    println!("Navigation");
    let mode = match config.navigation.mode {
        NavigationMode::Free => "free (every step can be opened)",
        NavigationMode::Sequential => "sequential (locked after first incomplete step)",
    };
    println!("   mode: {mode}");
    Ok(())
}
