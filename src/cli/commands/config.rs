//! Config command - show or initialize configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{LaunchError, LaunchResult};
use console::style;

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> LaunchResult<()> {
    match args.action {
        ConfigAction::Show => {
            let rendered = toml::to_string_pretty(config)?;
            print!("{}", rendered);
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", manager.path().display());
            Ok(())
        }
        ConfigAction::Init { force } => {
            if manager.path().exists() && !force {
                return Err(LaunchError::Internal(format!(
                    "{} already exists; pass --force to overwrite",
                    manager.path().display()
                )));
            }

            manager.save(&Config::default()).await?;
            eprintln!(
                "{} Wrote {}",
                style("✓").green(),
                style(manager.path().display()).cyan()
            );
            Ok(())
        }
    }
}
