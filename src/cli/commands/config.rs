//! Config command handler

use crate::args::ConfigSubcommand;
use grade_finder::config::Config;
use std::io::{self, BufRead, Write};

/// Dispatch config subcommands
///
/// # Errors
/// Returns a `✗` message when a key is unknown, a value is rejected, or the
/// config file cannot be written.
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) -> Result<(), String> {
    match subcommand {
        None => {
            show(config, None);
            Ok(())
        }
        Some(ConfigSubcommand::Get { key }) => {
            show(config, key.as_deref());
            Ok(())
        }
        Some(ConfigSubcommand::Set { key, value }) => set(config, &key, &value),
        Some(ConfigSubcommand::Unset { key }) => unset(config, defaults, &key),
        Some(ConfigSubcommand::Reset) => reset(&mut io::stdin().lock()),
    }
}

/// Print one value, or the whole configuration
fn show(config: &Config, key: Option<&str>) {
    match key {
        Some(key) => match config.get(key) {
            Some(value) => println!("{value}"),
            None => eprintln!("Unknown config key: '{key}'"),
        },
        None => {
            println!("\n=== GradeFinder configuration ===\n");
            print!("{config}");
            println!("\nFile: {}", Config::get_config_file_path().display());
        }
    }
}

fn set(config: &mut Config, key: &str, value: &str) -> Result<(), String> {
    config.set(key, value).map_err(|e| format!("✗ {e}"))?;
    config
        .save()
        .map_err(|e| format!("✗ Failed to save config: {e}"))?;
    // Show the stored form; campus and theme values are normalized on set.
    let stored = config.get(key).unwrap_or_else(|| value.to_string());
    println!("✓ Set {key} = {stored}");
    Ok(())
}

fn unset(config: &mut Config, defaults: &Config, key: &str) -> Result<(), String> {
    config.unset(key, defaults).map_err(|e| format!("✗ {e}"))?;
    config
        .save()
        .map_err(|e| format!("✗ Failed to save config: {e}"))?;
    println!("✓ Reset {key} to default");
    Ok(())
}

fn confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Delete the config file after a y/n confirmation read from `input`
fn reset(input: &mut impl BufRead) -> Result<(), String> {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return Ok(());
    }

    print!("Reset all settings to defaults? (y/n): ");
    io::stdout().flush().ok();
    let mut answer = String::new();
    input.read_line(&mut answer).ok();

    if !confirmed(&answer) {
        println!("Reset cancelled");
        return Ok(());
    }
    Config::reset().map_err(|e| format!("✗ Failed to remove config file: {e}"))?;
    println!("✓ Config reset to defaults");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_answers() {
        assert!(confirmed("y\n"));
        assert!(confirmed(" YES "));
        assert!(!confirmed("n"));
        assert!(!confirmed(""));
        assert!(!confirmed("yep"));
    }
}
