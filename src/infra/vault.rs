//! In-memory metadata cache for a directory of markdown notes.
//!
//! Plays the part of the host's metadata cache: it knows which notes exist,
//! holds a [`NoteMetadata`] snapshot per note, and resolves link paths and
//! subpaths to notes and anchors.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::domain::{Anchor, HeadingInfo, LinkContext, LinkReference, NoteFile, NoteMetadata, ResolvedTarget};
use crate::infra::fs::{FsError, read_text, scan_notes_directory};
use crate::infra::markdown::parse_metadata_lenient;

#[derive(Debug, Clone)]
struct IndexedNote {
    file: NoteFile,
    metadata: Option<NoteMetadata>,
}

fn index_content(path: &str, content: &str) -> NoteMetadata {
    let (metadata, err) = parse_metadata_lenient(content);
    if let Some(e) = err {
        warn!(path = %path, error = %e, "ignoring malformed frontmatter");
    }
    metadata
}

/// All notes of a vault with their metadata snapshots.
#[derive(Debug, Clone, Default)]
pub struct Vault {
    root: PathBuf,
    /// Keyed by vault-relative path.
    notes: BTreeMap<String, IndexedNote>,
}

/// A link resolved against the vault.
#[derive(Debug, Clone)]
pub struct ResolvedLink<'v> {
    pub link: LinkReference,
    pub target: Option<&'v NoteFile>,
    pub metadata: Option<&'v NoteMetadata>,
    pub anchor: Anchor,
}

impl<'v> ResolvedLink<'v> {
    /// Builds the resolver input for this link written inside `source_path`.
    pub fn context<'a>(&'a self, source_path: &'a str) -> LinkContext<'a> {
        LinkContext {
            link: &self.link,
            target: self
                .target
                .map(|note| ResolvedTarget::new(note, self.metadata)),
            anchor: &self.anchor,
            source_path,
        }
    }
}

impl Vault {
    /// Creates an empty vault rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            notes: BTreeMap::new(),
        }
    }

    /// Scans `root` for markdown notes and indexes each one.
    ///
    /// Notes that cannot be read are kept without a metadata snapshot.
    /// Malformed frontmatter is logged and indexed as empty.
    ///
    /// # Errors
    ///
    /// Returns `FsError` if `root` is missing or not a directory.
    pub fn load(root: &Path) -> Result<Self, FsError> {
        let mut vault = Self::new(root);

        for relative in scan_notes_directory(root)? {
            let full_path = root.join(&relative);
            let path = relative.to_string_lossy().replace('\\', "/");

            let metadata = match read_text(&full_path) {
                Ok(content) => Some(index_content(&path, &content)),
                Err(e) => {
                    warn!(path = %path, error = %e, "failed to read note");
                    None
                }
            };

            vault.insert(&path, metadata);
        }

        info!(root = %root.display(), notes = vault.len(), "loaded vault");
        Ok(vault)
    }

    /// Adds or replaces a note.
    pub fn insert(&mut self, path: &str, metadata: Option<NoteMetadata>) {
        let file = NoteFile::new(path);
        self.notes
            .insert(file.path().to_string(), IndexedNote { file, metadata });
    }

    /// Parses `content` and adds the note.
    ///
    /// Malformed frontmatter is indexed as empty, like [`Vault::load`] does.
    pub fn insert_content(&mut self, path: &str, content: &str) {
        let metadata = index_content(path, content);
        self.insert(path, Some(metadata));
    }

    /// Returns the vault root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Iterates over all notes in path order.
    pub fn notes(&self) -> impl Iterator<Item = &NoteFile> {
        self.notes.values().map(|n| &n.file)
    }

    /// Looks up a note by its exact vault-relative path.
    pub fn note(&self, path: &str) -> Option<&NoteFile> {
        self.notes.get(path).map(|n| &n.file)
    }

    /// Returns the metadata snapshot of a note, if it has been indexed.
    pub fn metadata(&self, path: &str) -> Option<&NoteMetadata> {
        self.notes.get(path).and_then(|n| n.metadata.as_ref())
    }

    /// Absolute path of a note on disk.
    pub fn full_path(&self, note: &NoteFile) -> PathBuf {
        self.root.join(note.path())
    }

    /// Resolves a link path written inside `source_path` to a note.
    ///
    /// An empty link path points at the source note itself. Otherwise,
    /// ignoring case and a `.md` suffix, the first of these wins:
    /// 1. a note at exactly that vault path
    /// 2. a note at that path relative to the source note's folder
    /// 3. the note with the shortest path ending in the link path
    pub fn resolve_link(&self, link_path: &str, source_path: &str) -> Option<&NoteFile> {
        let needle = normalize_link_path(link_path);
        if needle.is_empty() {
            return self.note(source_path);
        }

        if let Some(note) = self.find_by_key(&needle) {
            return Some(note);
        }

        let source_folder = NoteFile::new(source_path).folder().to_string();
        if !source_folder.is_empty() {
            if let Some(relative) = join_relative(&source_folder, &needle) {
                if let Some(note) = self.find_by_key(&relative) {
                    return Some(note);
                }
            }
        }

        let suffix = format!("/{}", needle);
        self.notes()
            .filter(|note| {
                note.path_without_extension()
                    .to_lowercase()
                    .ends_with(&suffix)
            })
            .min_by_key(|note| (note.path().len(), note.path().to_string()))
    }

    fn find_by_key(&self, key: &str) -> Option<&NoteFile> {
        self.notes()
            .find(|note| note.path_without_extension().to_lowercase() == key)
    }

    /// Resolves link text written inside `source_path`.
    pub fn resolve(&self, link: LinkReference, source_path: &str) -> ResolvedLink<'_> {
        let target = self.resolve_link(link.path(), source_path);
        let metadata = target.and_then(|note| self.metadata(note.path()));
        let anchor = metadata
            .map(|m| resolve_subpath(m, link.subpath()))
            .unwrap_or_default();

        debug!(link = %link, source = source_path, target = ?target.map(NoteFile::path), anchor = ?anchor, "resolved link");

        ResolvedLink {
            link,
            target,
            metadata,
            anchor,
        }
    }
}

/// Resolves a link subpath against a note's metadata.
///
/// `^id` resolves to a block when the note contains that block id. Anything
/// else is a `#`-separated heading path, matched in document order where each
/// component must be nested under the previous one. Unmatched subpaths
/// resolve to [`Anchor::None`].
pub fn resolve_subpath(metadata: &NoteMetadata, subpath: &str) -> Anchor {
    let subpath = subpath.trim();
    if subpath.is_empty() {
        return Anchor::None;
    }

    if let Some(id) = subpath.strip_prefix('^') {
        let id = id.trim();
        return if metadata.has_block_id(id) {
            Anchor::block(id)
        } else {
            Anchor::None
        };
    }

    let parts: Vec<String> = subpath
        .split('#')
        .map(normalize_heading)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        return Anchor::None;
    }

    let headings = metadata.headings();
    let mut start = 0;
    let mut current: Option<&HeadingInfo> = None;

    for part in &parts {
        let parent_level = current.map(|h| h.level);
        let mut found = None;

        for (offset, heading) in headings[start..].iter().enumerate() {
            if let Some(parent) = parent_level {
                if heading.level <= parent {
                    break;
                }
            }
            if normalize_heading(&heading.text) == *part {
                found = Some(start + offset);
                break;
            }
        }

        let index = match found {
            Some(index) => index,
            None => return Anchor::None,
        };
        current = Some(&headings[index]);
        start = index + 1;
    }

    current
        .map(|h| Anchor::heading(h.level, h.text.clone()))
        .unwrap_or_default()
}

/// Lowercased link path without `.md` suffix or leading `./` and `/`.
fn normalize_link_path(link_path: &str) -> String {
    let path = link_path.trim().replace('\\', "/");
    let path = path.trim_start_matches("./").trim_start_matches('/');
    let lower = path.to_lowercase();
    lower.strip_suffix(".md").unwrap_or(&lower).to_string()
}

/// Joins a relative link path onto a folder, collapsing `.` and `..`.
///
/// Returns `None` if the path climbs above the vault root.
fn join_relative(folder: &str, relative: &str) -> Option<String> {
    let mut parts: Vec<&str> = folder.split('/').filter(|p| !p.is_empty()).collect();
    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/").to_lowercase())
}

/// Heading comparison form: no link syntax characters, single spaces, lowercase.
fn normalize_heading(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, '#' | '^' | '[' | ']' | '|'))
        .collect();
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
