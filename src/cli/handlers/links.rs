//! Links command handler.

use anyhow::Result;
use std::path::Path;

use super::{Workspace, truncate_str};
use crate::cli::LinksArgs;
use crate::cli::config::Config;
use crate::cli::output::{Output, OutputFormat};
use crate::render::LinkRenderer;

pub fn handle_links(args: &LinksArgs, vault_dir: &Path, config: &Config) -> Result<()> {
    let workspace = Workspace::open(vault_dir, config)?;
    let note = workspace.find_note(&args.note)?;
    let (_, body) = workspace.read_note(&note)?;

    let mut renderer = LinkRenderer::new(&workspace.vault, &workspace.settings);
    let links = renderer.links(&note, &body);

    match args.format {
        OutputFormat::Human => {
            if links.is_empty() {
                println!("No links found.");
            } else {
                println!("{:<40}  {}", "Link", "Display");
                println!("{:<40}  {}", "-".repeat(40), "-".repeat(40));

                for link in &links {
                    let text = if link.embed {
                        format!("!{}", link.link)
                    } else {
                        link.link.clone()
                    };
                    let marker = if link.label.is_some() { "" } else { "  (default)" };
                    println!(
                        "{:<40}  {}{}",
                        truncate_str(&text, 40),
                        link.display,
                        marker
                    );
                }

                println!();
                println!("{} link(s)", links.len());
            }
        }
        OutputFormat::Json => {
            let output = Output::new(links);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
