//! Command handlers for the CLI.

mod label;
mod links;
mod render;
mod settings;

#[cfg(test)]
pub(crate) mod tests;

use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::cli::config::Config;
use crate::domain::NoteFile;
use crate::infra::{SettingsStore, Vault, parse_lenient, read_text};

// Re-export public items
pub use label::handle_label;
pub use links::handle_links;
pub use render::handle_render;
pub use settings::handle_config;

// ===========================================
// Shared Utilities
// ===========================================

/// A loaded vault together with its persisted settings.
pub(crate) struct Workspace {
    pub(crate) vault: Vault,
    pub(crate) settings: SettingsStore,
}

impl Workspace {
    pub(crate) fn open(vault_dir: &Path, config: &Config) -> Result<Self> {
        let vault = Vault::load(vault_dir)
            .with_context(|| format!("failed to load vault at {}", vault_dir.display()))?;
        let settings = open_settings(vault_dir, config)?;
        Ok(Self { vault, settings })
    }

    /// Finds a note by vault path or name.
    pub(crate) fn find_note(&self, name: &str) -> Result<NoteFile> {
        match self.vault.resolve_link(name.trim(), "") {
            Some(note) => Ok(note.clone()),
            None => bail!("note not found: '{}'", name),
        }
    }

    /// Reads a note and splits it into its frontmatter text and body.
    ///
    /// A frontmatter block whose YAML is malformed is still split off.
    pub(crate) fn read_note(&self, note: &NoteFile) -> Result<(String, String)> {
        let path = self.vault.full_path(note);
        let mut content = read_text(&path)
            .with_context(|| format!("failed to read note: {}", path.display()))?;

        let (parsed, _) = parse_lenient(&content);
        let frontmatter_len = if parsed.has_frontmatter {
            content.len() - parsed.body.len()
        } else {
            0
        };
        let body = content.split_off(frontmatter_len);
        Ok((content, body))
    }
}

/// Opens the vault's settings, seeded from the config's `[defaults]`.
pub(crate) fn open_settings(vault_dir: &Path, config: &Config) -> Result<SettingsStore> {
    SettingsStore::open_or(vault_dir, config.seed_settings())
        .with_context(|| format!("failed to load settings in {}", vault_dir.display()))
}

/// Truncates a string to a maximum display width, adding ellipsis if needed.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
