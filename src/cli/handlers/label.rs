//! Label command handler.

use anyhow::{Context, Result};
use std::path::Path;

use super::Workspace;
use crate::cli::LabelArgs;
use crate::cli::config::Config;
use crate::cli::output::{LabelOutput, Output, OutputFormat};
use crate::domain::LinkReference;
use crate::render::LinkRenderer;

pub fn handle_label(args: &LabelArgs, vault_dir: &Path, config: &Config) -> Result<()> {
    let workspace = Workspace::open(vault_dir, config)?;
    let source = workspace.find_note(&args.source)?;

    let text = strip_brackets(&args.link);
    let link = LinkReference::parse(text).with_context(|| format!("invalid link: '{}'", args.link))?;

    let mut renderer = LinkRenderer::new(&workspace.vault, &workspace.settings);
    let label = renderer.label(&source, &link);
    let display = label.clone().unwrap_or_else(|| link.default_display());

    match args.format {
        OutputFormat::Human => println!("{}", display),
        OutputFormat::Json => {
            let output = Output::new(LabelOutput {
                source: source.path().to_string(),
                link: link.to_string(),
                label,
                display,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Accepts link text pasted with its `[[` `]]` brackets.
pub(crate) fn strip_brackets(text: &str) -> &str {
    let text = text.trim();
    text.strip_prefix("[[")
        .and_then(|t| t.strip_suffix("]]"))
        .unwrap_or(text)
}
