use crate::config::Config;
use crate::display::{print_info, print_success, print_warning};
use crate::{ConfigCommands, Result};
use colored::Colorize;
use vultr_api::{mask_key, API_KEY_ENV};

/// Handles the `config` command
pub fn handle(action: ConfigCommands, config: &mut Config) -> Result<()> {
    match action {
        ConfigCommands::Show => handle_show(config),
        ConfigCommands::Get { key } => handle_get(&key, config),
        ConfigCommands::Set { key, value } => handle_set(&key, &value, config),
        ConfigCommands::Unset { key } => handle_unset(&key, config),
        ConfigCommands::Path => {
            println!("{}", config.config_path.display());
            Ok(())
        }
    }
}

fn handle_show(config: &Config) -> Result<()> {
    println!("{}", "Current Configuration:".bold().blue());
    println!("Configuration file: {}", config.config_path.display());
    println!();

    let shown = config.show_config();
    if shown.trim().is_empty() {
        print_info("No values set");
    } else {
        println!("{}", shown);
    }

    if std::env::var(API_KEY_ENV).is_ok() {
        print_info(&format!("{} is set and overrides api.api_key", API_KEY_ENV));
    }
    Ok(())
}

fn handle_get(key: &str, config: &Config) -> Result<()> {
    match config.get(key)? {
        // keys are never echoed in full
        Some(value) if key == "api.api_key" => println!("{}", mask_key(&value)),
        Some(value) => println!("{}", value),
        None => print_warning(&format!("{} is not set", key)),
    }
    Ok(())
}

fn handle_set(key: &str, value: &str, config: &mut Config) -> Result<()> {
    config.set(key, value)?;
    config.save()?;
    print_success(&format!("Set {}", key));
    Ok(())
}

fn handle_unset(key: &str, config: &mut Config) -> Result<()> {
    if config.unset(key)? {
        config.save()?;
        print_success(&format!("Removed {}", key));
    } else {
        print_warning(&format!("{} was not set", key));
    }
    Ok(())
}
