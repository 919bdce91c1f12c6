//! Note identity and the metadata snapshot read by the label resolver.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A note in the vault, identified by its vault-relative path.
///
/// Paths always use `/` as separator, regardless of platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NoteFile {
    path: String,
    basename: String,
}

impl NoteFile {
    /// Creates a note from a vault-relative path such as `Projects/Roadmap.md`.
    ///
    /// Backslashes are normalized to `/`. The basename is the final path
    /// component without its `.md` extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use link_display::domain::NoteFile;
    ///
    /// let note = NoteFile::new("Projects/Roadmap.md");
    /// assert_eq!(note.basename(), "Roadmap");
    /// assert_eq!(note.folder(), "Projects");
    /// ```
    pub fn new(path: impl AsRef<str>) -> Self {
        let path = path.as_ref().replace('\\', "/");
        let path = path.trim_start_matches("./").trim_start_matches('/').to_string();
        let file_name = path.rsplit('/').next().unwrap_or(&path);
        let basename = file_name
            .strip_suffix(".md")
            .unwrap_or(file_name)
            .to_string();
        Self { path, basename }
    }

    /// Returns the vault-relative path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the file name without extension.
    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// Returns the containing folder, or `""` for notes at the vault root.
    pub fn folder(&self) -> &str {
        self.path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
    }

    /// Returns the path without its `.md` extension.
    pub fn path_without_extension(&self) -> &str {
        self.path.strip_suffix(".md").unwrap_or(&self.path)
    }
}

impl fmt::Display for NoteFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// A frontmatter property value.
///
/// Only YAML strings can be used as a display title; every other value
/// (numbers, booleans, null, lists, mappings) is kept as `Other`.
#[derive(Debug, Clone, PartialEq)]
pub enum FrontmatterValue {
    String(String),
    Other(serde_yaml::Value),
}

impl FrontmatterValue {
    /// Returns the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Other(_) => None,
        }
    }
}

impl From<serde_yaml::Value> for FrontmatterValue {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::String(s) => Self::String(s),
            other => Self::Other(other),
        }
    }
}

impl From<&str> for FrontmatterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// Type tag of a top-level document section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Yaml,
    Heading,
    Paragraph,
    List,
    Code,
    Blockquote,
    Callout,
    Table,
    ThematicBreak,
    Html,
    Math,
    FootnoteDefinition,
}

impl SectionKind {
    /// Returns the tag used in link labels, e.g. `paragraph` or `thematicBreak`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
            Self::List => "list",
            Self::Code => "code",
            Self::Blockquote => "blockquote",
            Self::Callout => "callout",
            Self::Table => "table",
            Self::ThematicBreak => "thematicBreak",
            Self::Html => "html",
            Self::Math => "math",
            Self::FootnoteDefinition => "footnoteDefinition",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A top-level section of a note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo {
    pub kind: SectionKind,
    pub id: Option<String>,
}

/// A list item at any nesting depth.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListItemInfo {
    pub id: Option<String>,
}

/// A heading with its level (1-6) and plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingInfo {
    pub level: u8,
    pub text: String,
}

/// Metadata snapshot of one note, as indexed by the vault.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteMetadata {
    frontmatter: BTreeMap<String, FrontmatterValue>,
    sections: Vec<SectionInfo>,
    list_items: Vec<ListItemInfo>,
    headings: Vec<HeadingInfo>,
    block_ids: BTreeSet<String>,
}

impl NoteMetadata {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a frontmatter property (builder method).
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<FrontmatterValue>) -> Self {
        self.frontmatter.insert(key.into(), value.into());
        self
    }

    /// Replaces the frontmatter mapping (builder method).
    pub fn with_frontmatter(mut self, frontmatter: BTreeMap<String, FrontmatterValue>) -> Self {
        self.frontmatter = frontmatter;
        self
    }

    /// Appends a section (builder method). Its id, if any, joins the block-id set.
    pub fn with_section(mut self, kind: SectionKind, id: Option<&str>) -> Self {
        self.push_section(SectionInfo {
            kind,
            id: id.map(str::to_string),
        });
        self
    }

    /// Appends a list item (builder method). Its id, if any, joins the block-id set.
    pub fn with_list_item(mut self, id: Option<&str>) -> Self {
        self.push_list_item(ListItemInfo {
            id: id.map(str::to_string),
        });
        self
    }

    /// Appends a heading (builder method).
    pub fn with_heading(mut self, level: u8, text: impl Into<String>) -> Self {
        self.headings.push(HeadingInfo {
            level,
            text: text.into(),
        });
        self
    }

    pub(crate) fn push_section(&mut self, section: SectionInfo) {
        if let Some(id) = &section.id {
            self.block_ids.insert(id.clone());
        }
        self.sections.push(section);
    }

    pub(crate) fn push_list_item(&mut self, item: ListItemInfo) {
        if let Some(id) = &item.id {
            self.block_ids.insert(id.clone());
        }
        self.list_items.push(item);
    }

    pub(crate) fn push_heading(&mut self, heading: HeadingInfo) {
        self.headings.push(heading);
    }

    pub(crate) fn insert_block_id(&mut self, id: String) {
        self.block_ids.insert(id);
    }

    /// Assigns an id to the most recent section, if there is one.
    pub(crate) fn set_last_section_id(&mut self, id: String) -> bool {
        match self.sections.last_mut() {
            Some(section) => {
                section.id = Some(id.clone());
                self.block_ids.insert(id);
                true
            }
            None => false,
        }
    }

    pub fn frontmatter(&self) -> &BTreeMap<String, FrontmatterValue> {
        &self.frontmatter
    }

    /// Returns the frontmatter property `key` when its value is a string.
    pub fn frontmatter_str(&self, key: &str) -> Option<&str> {
        self.frontmatter.get(key).and_then(FrontmatterValue::as_str)
    }

    pub fn sections(&self) -> &[SectionInfo] {
        &self.sections
    }

    pub fn list_items(&self) -> &[ListItemInfo] {
        &self.list_items
    }

    pub fn headings(&self) -> &[HeadingInfo] {
        &self.headings
    }

    /// Returns true if any block in the note carries the id.
    pub fn has_block_id(&self, id: &str) -> bool {
        self.block_ids.contains(id)
    }

    /// Type of the first section whose id matches.
    pub fn section_kind(&self, id: &str) -> Option<SectionKind> {
        self.sections
            .iter()
            .find(|s| s.id.as_deref() == Some(id))
            .map(|s| s.kind)
    }

    /// Returns true if some list item carries the id.
    pub fn has_list_item(&self, id: &str) -> bool {
        self.list_items.iter().any(|item| item.id.as_deref() == Some(id))
    }
}
