//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::render::RenderMode;
use output::OutputFormat;

/// link-display - custom display text for wikilinks in a markdown vault
#[derive(Parser, Debug)]
#[command(name = "link-display", version, about, long_about = None)]
pub struct Cli {
    /// Vault directory (overrides config file)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the display label of a link written in a note
    Label(LabelArgs),

    /// List the wikilinks of a note with their labels
    Links(LinksArgs),

    /// Print a note body with links rendered
    Render(RenderArgs),

    /// Show or change the display settings of the vault
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `label` command
#[derive(Parser, Debug)]
pub struct LabelArgs {
    /// Note containing the link (path or name)
    pub source: String,

    /// Link text as written between [[ and ]], e.g. "Note#^block-id"
    pub link: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `links` command
#[derive(Parser, Debug)]
pub struct LinksArgs {
    /// Note path or name
    pub note: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `render` command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Note path or name
    pub note: String,

    /// Rendering mode
    #[arg(short, long, value_enum, default_value_t = RenderMode::Preview)]
    pub mode: RenderMode,
}

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the current settings
    Show(ConfigShowArgs),

    /// Set the frontmatter property used as note title
    SetKey(SetKeyArgs),

    /// Stop labelling links written in a folder
    Exclude(FolderArgs),

    /// Remove a folder from the excluded folders
    Include(FolderArgs),

    /// Enable or disable labels in source mode
    SourceMode(SourceModeArgs),
}

/// Arguments for `config show`
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for `config set-key`
#[derive(Parser, Debug)]
pub struct SetKeyArgs {
    /// Frontmatter property name
    pub key: String,
}

/// Arguments for `config exclude` and `config include`
#[derive(Parser, Debug)]
pub struct FolderArgs {
    /// Vault-relative folder path
    pub folder: String,
}

/// On/off switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::On
    }
}

/// Arguments for `config source-mode`
#[derive(Parser, Debug)]
pub struct SourceModeArgs {
    #[arg(value_enum)]
    pub state: Toggle,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
