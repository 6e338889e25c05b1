//! Config command - inspect configuration.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::Config;
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration.
    Show,

    /// Show the configuration file path.
    Path,
}

/// Runs the config command.
pub fn run(args: &ConfigArgs, cli: &Cli, config: &Config) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli, config),
        ConfigAction::Path => show_path(cli),
    }
}

fn show_config(cli: &Cli, config: &Config) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            println!("Connprobe Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Log level:       {}", config.general.log_level);
            println!("Timeout:         {}s", config.probe.timeout_secs);
            println!("Key vault URL:   {}", config.endpoints.key_vault_url);
            println!("Insights URL:    {}", config.endpoints.insights_url);
            match &config.trust.ca_bundle {
                Some(path) => println!("Trust store:     {}", path.display()),
                None => println!("Trust store:     system"),
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(config)?);
        }
    }

    Ok(())
}

fn show_path(cli: &Cli) -> Result<()> {
    let path = cli.config.clone().unwrap_or_else(Config::default_path);

    match cli.format {
        OutputFormat::Text => println!("Config file: {}", path.display()),
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_file": path.display().to_string(),
                "exists": path.exists(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}
