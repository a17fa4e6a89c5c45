// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notibus - notification dispatch with a conversational job-posting flow.
//!
//! This is the binary entry point for the Notibus service.

mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use notibus_config::{NotibusConfig, validation};

/// Notibus - notification dispatch service.
#[derive(Parser, Debug)]
#[command(name = "notibus", version, about, long_about = None)]
struct Cli {
    /// Path to an explicit config file (bypasses the XDG hierarchy).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Notibus service (default).
    Serve,
    /// Print the resolved configuration and exit.
    Config,
}

fn load_config(cli: &Cli) -> Result<NotibusConfig, Vec<notibus_config::ConfigError>> {
    match &cli.config {
        Some(path) => {
            let config = notibus_config::load_config_from_path(path).map_err(|e| {
                vec![notibus_config::ConfigError {
                    field: path.display().to_string(),
                    message: e.to_string(),
                }]
            })?;
            validation::validate_config(&config)?;
            Ok(config)
        }
        None => notibus_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(errors) => {
            notibus_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("notibus: failed to render config: {e}");
                std::process::exit(1);
            }
        },
        Some(Commands::Serve) | None => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("notibus: {e}");
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        let config =
            notibus_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.service.name, "notibus");
        assert_eq!(config.broker.stream, "notifications");
    }
}
