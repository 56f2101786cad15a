//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let config_file = config::config_file(global);
            let deployment = config::load_deployment(global)?;
            println!("config:   {}", config_file.display());
            println!("settings: {}", deployment.settings_path(&config_file).display());
            Ok(())
        }
        ConfigCommand::Show => {
            let deployment = config::load_deployment(global)?;
            print!("{}", toml::to_string_pretty(&deployment)?);
            Ok(())
        }
    }
}
