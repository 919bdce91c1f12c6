//! Settings command handlers (show, set-key, exclude, include, source-mode).

use anyhow::{Context, Result, bail};
use std::path::Path;

use super::open_settings;
use crate::cli::ConfigCommand;
use crate::cli::config::Config;
use crate::cli::output::{Output, OutputFormat};
use crate::domain::Settings;
use crate::infra::SettingsStore;

pub fn handle_config(command: &ConfigCommand, vault_dir: &Path, config: &Config) -> Result<()> {
    if !vault_dir.is_dir() {
        bail!("vault directory not found: {}", vault_dir.display());
    }
    let store = open_settings(vault_dir, config)?;

    match command {
        ConfigCommand::Show(args) => show(&store.current(), args.format),
        ConfigCommand::SetKey(args) => {
            let key = args.key.trim();
            if key.is_empty() {
                bail!("property key cannot be empty");
            }
            update(&store, |s| s.key = key.to_string())?;
            println!("Title property: {}", key);
            Ok(())
        }
        ConfigCommand::Exclude(args) => {
            require_folder(&args.folder)?;
            if update(&store, |s| s.exclude_folder(&args.folder))? {
                println!("Excluded: {}", args.folder);
            } else {
                println!("Already excluded: {}", args.folder);
            }
            Ok(())
        }
        ConfigCommand::Include(args) => {
            require_folder(&args.folder)?;
            if update(&store, |s| s.include_folder(&args.folder))? {
                println!("Included: {}", args.folder);
            } else {
                println!("Not excluded: {}", args.folder);
            }
            Ok(())
        }
        ConfigCommand::SourceMode(args) => {
            let enabled = args.state.enabled();
            update(&store, |s| s.enable_in_source_mode = enabled)?;
            println!("Source mode: {}", on_off(enabled));
            Ok(())
        }
    }
}

fn update<R>(store: &SettingsStore, change: impl FnOnce(&mut Settings) -> R) -> Result<R> {
    store
        .update(change)
        .with_context(|| "failed to save settings")
}

fn require_folder(folder: &str) -> Result<()> {
    if folder.trim().trim_matches(['/', '\\', '.']).is_empty() {
        bail!("folder cannot be empty");
    }
    Ok(())
}

fn show(settings: &Settings, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            println!("Title property:   {}", settings.key);
            println!("Source mode:      {}", on_off(settings.enable_in_source_mode));
            if settings.excluded_folders.is_empty() {
                println!("Excluded folders: (none)");
            } else {
                println!("Excluded folders:");
                for folder in &settings.excluded_folders {
                    println!("  {}", folder);
                }
            }
        }
        OutputFormat::Json => {
            let output = Output::new(settings);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
