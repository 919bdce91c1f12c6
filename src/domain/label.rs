//! Link label resolution.
//!
//! Computes the text displayed in place of a raw internal link from the
//! target note's display title and the anchor the link points to.

use tracing::debug;

use crate::domain::{Anchor, LinkReference, NoteFile, NoteMetadata, Settings};

/// Kind reported for block ids found on a list item.
const LIST_ITEM_KIND: &str = "listitem";

/// Kind reported for block ids found on neither a section nor a list item.
const FALLBACK_BLOCK_KIND: &str = "block";

/// A link target that exists in the vault.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedTarget<'a> {
    pub note: &'a NoteFile,
    /// Absent when the note has not been indexed.
    pub metadata: Option<&'a NoteMetadata>,
}

impl<'a> ResolvedTarget<'a> {
    pub fn new(note: &'a NoteFile, metadata: Option<&'a NoteMetadata>) -> Self {
        Self { note, metadata }
    }
}

/// Everything known about one link at render time.
#[derive(Debug, Clone, Copy)]
pub struct LinkContext<'a> {
    /// The link as written.
    pub link: &'a LinkReference,
    /// The note the link resolves to, if any.
    pub target: Option<ResolvedTarget<'a>>,
    /// The heading or block the subpath resolves to.
    pub anchor: &'a Anchor,
    /// Vault-relative path of the note containing the link.
    pub source_path: &'a str,
}

/// Computes the display label for a link.
///
/// Returns `None` when default rendering should be used: the source note is
/// inside an excluded folder, the target does not exist, or the target has
/// no metadata yet.
///
/// # Examples
///
/// ```
/// use link_display::domain::{
///     resolve_label, Anchor, LinkContext, LinkReference, NoteFile, NoteMetadata,
///     ResolvedTarget, Settings,
/// };
///
/// let note = NoteFile::new("Target.md");
/// let meta = NoteMetadata::new().with_property("link-display", "My Title");
/// let link = LinkReference::new("Target", "Intro");
/// let anchor = Anchor::heading(2, "Intro");
///
/// let ctx = LinkContext {
///     link: &link,
///     target: Some(ResolvedTarget::new(&note, Some(&meta))),
///     anchor: &anchor,
///     source_path: "Source.md",
/// };
/// assert_eq!(
///     resolve_label(&Settings::default(), &ctx).as_deref(),
///     Some("My Title - h2:Intro")
/// );
/// ```
pub fn resolve_label(settings: &Settings, ctx: &LinkContext<'_>) -> Option<String> {
    if settings.is_excluded(ctx.source_path) {
        debug!(source = ctx.source_path, "source note is in an excluded folder");
        return None;
    }

    let Some(target) = ctx.target else {
        debug!(link = %ctx.link, "link target does not exist");
        return None;
    };
    let Some(metadata) = target.metadata else {
        debug!(target = target.note.path(), "link target has no metadata");
        return None;
    };

    let title = metadata
        .frontmatter_str(&settings.key)
        .unwrap_or_else(|| target.note.basename());

    let fragment = match ctx.anchor {
        Anchor::None => return Some(title.to_string()),
        Anchor::Heading { level, text } => format!("h{}:{}", level, text),
        Anchor::Block { id } => format!("{}:{}", block_kind(metadata, id), id),
    };

    if ctx.link.is_same_note() {
        Some(fragment)
    } else {
        Some(format!("{} - {}", title, fragment))
    }
}

/// Classifies a block id by the section or list item carrying it.
fn block_kind<'m>(metadata: &'m NoteMetadata, id: &str) -> &'m str {
    if let Some(kind) = metadata.section_kind(id) {
        return kind.as_str();
    }
    if metadata.has_list_item(id) {
        return LIST_ITEM_KIND;
    }
    FALLBACK_BLOCK_KIND
}
