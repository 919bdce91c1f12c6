//! Render command handler.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use super::Workspace;
use crate::cli::RenderArgs;
use crate::cli::config::Config;
use crate::render::{LinkRenderer, RenderMode};

pub fn handle_render(args: &RenderArgs, vault_dir: &Path, config: &Config) -> Result<()> {
    let workspace = Workspace::open(vault_dir, config)?;
    let note = workspace.find_note(&args.note)?;
    let (frontmatter, body) = workspace.read_note(&note)?;

    let mut renderer = LinkRenderer::new(&workspace.vault, &workspace.settings);
    let output = renderer.render(&note, &body, args.mode);

    info!(
        note = note.path(),
        links = output.links,
        labelled = output.labelled,
        aliased = output.aliased,
        deferred = output.deferred,
        "rendered"
    );

    // Preview hides frontmatter, source keeps the file as written
    if args.mode == RenderMode::Source {
        print!("{}", frontmatter);
    }
    print!("{}", output.content);

    Ok(())
}
