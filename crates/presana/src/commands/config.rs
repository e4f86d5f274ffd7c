use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::{Config, Settings};

pub fn run(command: ConfigCommands, settings: &Settings) -> Result<()> {
    match command {
        ConfigCommands::Show => show(settings),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show(settings: &Settings) -> Result<()> {
    let path = Config::path()?;
    match Config::load_from(&path) {
        Ok(config) => {
            println!("{} {}", "Config file:".bold(), path.display());
            print!("{}", serde_yaml::to_string(&config)?);
        }
        Err(_) => {
            println!(
                "{} {} {}",
                "Config file:".bold(),
                path.display(),
                "(not created yet)".dimmed()
            );
        }
    }

    println!();
    println!("{}", "Effective settings:".bold());
    println!("  backend.url      {}", settings.url);
    println!("  backend.timeout  {}s", settings.timeout.as_secs());
    println!("  defaults.model   {}", settings.model.id());
    println!("  defaults.theme   {}", settings.theme);
    if settings.pacing.is_immediate() {
        println!("  pacing           off");
    } else {
        println!(
            "  pacing           settle {}ms, stride {}ms, trailing {}ms",
            settings.pacing.settle.as_millis(),
            settings.pacing.stride.as_millis(),
            settings.pacing.trailing.as_millis()
        );
    }
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {key} = {value} ({})",
        "Saved".green().bold(),
        path.display()
    );
    Ok(())
}
