use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{ConfigField, StoredConfig, config_file_path};
use crate::domain::credentials::mask_secret;
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring storyscribe. Enter keeps a value, '-' clears it.");
    println!("Secrets are written to the local config file.\n");

    for field in ConfigField::ALL {
        print!("{}", question(field, cfg.get(field)));
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        Answer::parse(&answer).apply(cfg.slot(field));
    }

    cfg.save()?;
    println!("\nSaved to {}", config_file_path()?.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;

    println!("Configuration file: {}", config_file_path()?.display());
    for field in ConfigField::ALL {
        println!("{}: {}", field.label(), shown_value(field, cfg.get(field)));
    }
    Ok(())
}

fn question(field: ConfigField, current: Option<&str>) -> String {
    match current {
        Some(_) => format!(
            "{} [{}]: ",
            field.label(),
            shown_value(field, current)
        ),
        None => format!("{} (Enter to skip): ", field.label()),
    }
}

fn shown_value(field: ConfigField, value: Option<&str>) -> String {
    match value.filter(|v| !v.is_empty()) {
        Some(v) if field.is_secret() => mask_secret(v),
        Some(v) => v.to_string(),
        None => "<not set>".to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Answer {
    Keep,
    Clear,
    Set(String),
}

impl Answer {
    fn parse(input: &str) -> Self {
        match input.trim() {
            "" => Answer::Keep,
            "-" => Answer::Clear,
            value => Answer::Set(value.to_string()),
        }
    }

    fn apply(self, slot: &mut Option<String>) {
        match self {
            Answer::Keep => {}
            Answer::Clear => *slot = None,
            Answer::Set(value) => *slot = Some(value),
        }
    }
}
