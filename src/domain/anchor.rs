//! Link references and the anchors they resolve to.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The heading or block fragment a link points to within its target note.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Anchor {
    /// The link points at the note as a whole.
    #[default]
    None,
    /// The link points at a heading.
    Heading { level: u8, text: String },
    /// The link points at a block carrying a `^id` marker.
    Block { id: String },
}

impl Anchor {
    /// Creates a heading anchor.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            text: text.into(),
        }
    }

    /// Creates a block anchor.
    pub fn block(id: impl Into<String>) -> Self {
        Self::Block { id: id.into() }
    }
}

/// A raw link target as written inside a note: `path#subpath`.
///
/// An empty `path` means the link points into the note that contains it.
///
/// # Examples
///
/// ```
/// use link_display::domain::LinkReference;
///
/// let link: LinkReference = "Projects/Roadmap#Goals#Q3".parse().unwrap();
/// assert_eq!(link.path(), "Projects/Roadmap");
/// assert_eq!(link.subpath(), "Goals#Q3");
///
/// let same_note: LinkReference = "#^abc123".parse().unwrap();
/// assert!(same_note.is_same_note());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LinkReference {
    path: String,
    subpath: String,
}

/// Error returned when link text cannot be parsed.
#[derive(Debug, Clone)]
pub struct ParseLinkError(String);

impl fmt::Display for ParseLinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseLinkError {}

impl LinkReference {
    /// Creates a link reference from already-split parts.
    pub fn new(path: impl Into<String>, subpath: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            subpath: subpath.into(),
        }
    }

    /// Parses link text of the form `path#subpath`.
    ///
    /// Surrounding whitespace of both parts is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `ParseLinkError` if the text is empty, or if it contains
    /// characters that cannot appear inside a wikilink (`[`, `]`, `|`, newline).
    pub fn parse(text: &str) -> Result<Self, ParseLinkError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseLinkError("link text cannot be empty".to_string()));
        }
        if let Some(c) = text.chars().find(|c| matches!(c, '[' | ']' | '|' | '\n')) {
            return Err(ParseLinkError(format!(
                "invalid link text '{}': contains '{}'",
                text,
                c.escape_default()
            )));
        }

        let (path, subpath) = match text.split_once('#') {
            Some((path, subpath)) => (path.trim(), subpath.trim()),
            None => (text, ""),
        };

        Ok(Self::new(path, subpath))
    }

    /// Returns the path component (empty for same-note links).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the subpath component (empty when the link has no fragment).
    pub fn subpath(&self) -> &str {
        &self.subpath
    }

    /// Returns true when the link points into the note that contains it.
    pub fn is_same_note(&self) -> bool {
        self.path.is_empty()
    }

    /// Text shown for the link when no provider overrides it.
    ///
    /// Subpath components are joined with ` > `, so `Note#Intro` displays as
    /// `Note > Intro` and `#^abc` as `^abc`.
    pub fn default_display(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if !self.path.is_empty() {
            parts.push(self.path.as_str());
        }
        parts.extend(self.subpath.split('#').filter(|p| !p.trim().is_empty()));
        parts.join(" > ")
    }
}

impl fmt::Display for LinkReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subpath.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}#{}", self.path, self.subpath)
        }
    }
}

impl FromStr for LinkReference {
    type Err = ParseLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
