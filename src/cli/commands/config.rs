//! Configuration inspection commands.

use clap::Subcommand;

use crate::config::{default_config_path, Config};
use crate::error::{Result, TrawlError};

/// Config operations.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the configuration file path.
    Path,
    /// Print the effective configuration as TOML.
    Show,
}

/// Run a config command.
pub fn run(config: &Config, cmd: &ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Path => {
            println!("{}", default_config_path()?.display());
            Ok(())
        }
        ConfigCommands::Show => {
            let rendered =
                toml::to_string_pretty(config).map_err(|e| TrawlError::ConfigError {
                    message: format!("Failed to serialize config: {e}"),
                })?;
            print!("{rendered}");
            Ok(())
        }
    }
}
