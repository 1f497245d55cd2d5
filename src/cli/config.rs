//! Config command
//!
//! Shows where data lives and edits the user settings.

use clap::{Subcommand, ValueEnum};

use crate::config::{Settings, SpendscanPaths};
use crate::error::{SpendscanError, SpendscanResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

/// Config subcommands; without one the current configuration is printed
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Save confident scans without review
    SetAutoSave { value: Toggle },

    /// Currency symbol used when printing amounts
    SetCurrency { symbol: String },

    /// OCR program and arguments; `{image}` is replaced by the image path
    SetOcrCommand {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

fn print_config(paths: &SpendscanPaths, settings: &Settings) {
    println!("spendscan configuration");
    println!("=======================");
    println!("Base directory:     {}", paths.base_dir().display());
    println!("Data directory:     {}", paths.data_dir().display());
    println!("Receipt images:     {}", paths.receipts_dir().display());
    println!(
        "Settings file:      {}{}",
        paths.settings_file().display(),
        if paths.is_initialized() { "" } else { " (not written yet, using defaults)" }
    );
    println!();
    println!("Settings:");
    println!(
        "  Auto-save scans:  {}",
        if settings.auto_save_scans { "on" } else { "off" }
    );
    println!("  Currency symbol:  {}", settings.currency_symbol);
    println!("  Date format:      {}", settings.date_format);
    println!("  OCR command:      {}", settings.ocr_command.join(" "));
}

/// Handle `spendscan config`
pub fn handle_config_command(
    paths: &SpendscanPaths,
    settings: &mut Settings,
    cmd: Option<ConfigCommands>,
) -> SpendscanResult<()> {
    let Some(cmd) = cmd else {
        print_config(paths, settings);
        return Ok(());
    };

    match cmd {
        ConfigCommands::SetAutoSave { value } => {
            settings.auto_save_scans = value == Toggle::On;
            println!(
                "Auto-save scans: {}",
                if settings.auto_save_scans { "on" } else { "off" }
            );
        }
        ConfigCommands::SetCurrency { symbol } => {
            let symbol = symbol.trim();
            if symbol.is_empty() {
                return Err(SpendscanError::Validation(
                    "Currency symbol cannot be empty".into(),
                ));
            }
            settings.currency_symbol = symbol.to_string();
            println!("Currency symbol: {}", settings.currency_symbol);
        }
        ConfigCommands::SetOcrCommand { command } => {
            settings.ocr_command = command;
            println!("OCR command: {}", settings.ocr_command.join(" "));
        }
    }

    settings.save(paths)
}
