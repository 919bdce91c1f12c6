//! Frontmatter parser for extracting YAML properties from markdown files.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::FrontmatterValue;

/// Result of splitting a markdown file into frontmatter and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNote {
    /// Frontmatter properties, empty when the note has no frontmatter.
    pub properties: BTreeMap<String, FrontmatterValue>,
    /// Whether the note starts with a frontmatter block.
    pub has_frontmatter: bool,
    pub body: String,
}

/// Errors during frontmatter parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid YAML in frontmatter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("frontmatter must be a mapping of properties")]
    NotAMapping,
}

/// Parses markdown content with optional YAML frontmatter.
///
/// # Format
/// ```text
/// ---
/// link-display: Project Roadmap
/// tags: [planning]
/// ---
/// Body content here...
/// ```
///
/// Content that does not start with a `---` line has no frontmatter and is
/// returned whole as the body. So is content whose opening `---` is never
/// closed: that line is a thematic break, not a frontmatter block.
///
/// # Errors
///
/// Returns `ParseError` if:
/// - The YAML between delimiters is invalid
/// - The YAML is not a mapping
pub fn parse(content: &str) -> Result<ParsedNote, ParseError> {
    let Some((yaml, body)) = split(content) else {
        return Ok(ParsedNote {
            properties: BTreeMap::new(),
            has_frontmatter: false,
            body: content.to_string(),
        });
    };

    Ok(ParsedNote {
        properties: parse_properties(yaml)?,
        has_frontmatter: true,
        body: body.to_string(),
    })
}

/// Parses like [`parse`] but always yields a note.
///
/// When the properties cannot be read, the frontmatter block is still split
/// off the body and the properties are left empty. The error is returned
/// alongside so the caller can report it.
pub fn parse_lenient(content: &str) -> (ParsedNote, Option<ParseError>) {
    match parse(content) {
        Ok(parsed) => (parsed, None),
        Err(err) => {
            let (has_frontmatter, body) = match split(content) {
                Some((_, body)) => (true, body),
                None => (false, content),
            };
            let parsed = ParsedNote {
                properties: BTreeMap::new(),
                has_frontmatter,
                body: body.to_string(),
            };
            (parsed, Some(err))
        }
    }
}

/// Splits content into `(yaml, body)`.
///
/// Returns `None` when the content does not open with a `---` line or the
/// opening line is never closed.
pub(crate) fn split(content: &str) -> Option<(&str, &str)> {
    let after_opening = if content.starts_with("---\r\n") {
        5
    } else if content.starts_with("---\n") {
        4
    } else {
        // No delimiter, or "---" followed by something other than a newline
        return None;
    };

    let yaml_and_rest = &content[after_opening..];
    let closing_pos = find_closing_delimiter(yaml_and_rest)?;
    let yaml = &yaml_and_rest[..closing_pos];

    let after_closing = &yaml_and_rest[closing_pos..];
    let body = if let Some(rest) = after_closing.strip_prefix("---\r\n") {
        rest
    } else if let Some(rest) = after_closing.strip_prefix("---\n") {
        rest
    } else {
        ""
    };

    Some((yaml, body))
}

fn parse_properties(yaml: &str) -> Result<BTreeMap<String, FrontmatterValue>, ParseError> {
    if yaml.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;

    let mapping = match value {
        serde_yaml::Value::Null => return Ok(BTreeMap::new()),
        serde_yaml::Value::Mapping(mapping) => mapping,
        _ => return Err(ParseError::NotAMapping),
    };

    let properties = mapping
        .into_iter()
        .filter_map(|(key, value)| property_key(&key).map(|key| (key, value.into())))
        .collect();

    Ok(properties)
}

/// Scalar keys become strings; complex keys are dropped.
fn property_key(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Finds the position of the closing `---` delimiter.
///
/// The closing delimiter must:
/// - Appear at the start of a line
/// - Be exactly `---` followed by newline or EOF
fn find_closing_delimiter(content: &str) -> Option<usize> {
    let mut pos = 0;
    let bytes = content.as_bytes();

    while pos < bytes.len() {
        if content[pos..].starts_with("---") {
            let after = pos + 3;
            if after >= bytes.len()
                || bytes[after] == b'\n'
                || (bytes[after] == b'\r' && after + 1 < bytes.len() && bytes[after + 1] == b'\n')
            {
                return Some(pos);
            }
        }

        match content[pos..].find('\n') {
            Some(newline_offset) => pos += newline_offset + 1,
            None => break,
        }
    }

    None
}
