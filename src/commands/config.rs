use std::path::PathBuf;

use clap::{ArgAction, Subcommand};
use snakesim::{DEFAULT_CONFIG_FILE, SimConfig};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Write a config file populated with the defaults
    Init {
        /// Destination file
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue, default_value_t = false)]
        force: bool,
    },
    /// Print the effective config (file merged over defaults)
    Show {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}

pub(super) fn run_config(command: ConfigCommand) -> Result<(), String> {
    match command {
        ConfigCommand::Init { path, force } => {
            if path.exists() && !force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ));
            }
            let written = SimConfig::default()
                .save(&path)
                .map_err(|e| e.to_string())?;
            println!("Wrote default config to {}", written.display());
            Ok(())
        }
        ConfigCommand::Show { path } => {
            let config = SimConfig::load(&path).map_err(|e| e.to_string())?;
            config.validate().map_err(|e| e.to_string())?;
            let rendered = config.to_toml_string().map_err(|e| e.to_string())?;
            print!("{}", rendered);
            Ok(())
        }
    }
}
