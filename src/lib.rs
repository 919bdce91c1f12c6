//! link-display - custom display text for wikilinks in a markdown vault

pub mod cli;
pub mod domain;
pub mod infra;
pub mod render;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{handle_config, handle_label, handle_links, handle_render},
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::Completions(args) = &cli.command {
        clap_complete::generate(
            args.shell,
            &mut Cli::command(),
            "link-display",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    let config = Config::load()?;
    let vault_dir = config.vault_dir(cli.dir.as_deref());

    match &cli.command {
        Command::Label(args) => handle_label(args, &vault_dir, &config),
        Command::Links(args) => handle_links(args, &vault_dir, &config),
        Command::Render(args) => handle_render(args, &vault_dir, &config),
        Command::Config(command) => handle_config(command, &vault_dir, &config),
        Command::Completions(_) => Ok(()),
    }
}

/// Logs to stderr; `RUST_LOG` overrides the level chosen by `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("link_display={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
