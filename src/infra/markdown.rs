//! Block structure extraction using pulldown-cmark.
//!
//! Builds the [`NoteMetadata`] snapshot of a note: frontmatter properties,
//! top-level sections with their type tags, list items, headings and block ids.

use std::sync::LazyLock;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};
use regex::Regex;

use crate::domain::{HeadingInfo, ListItemInfo, NoteMetadata, SectionInfo, SectionKind};
use crate::infra::frontmatter::{self, ParseError, ParsedNote};

/// `^id` at the end of a line, preceded by whitespace or alone on the line.
static TRAILING_BLOCK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)\^([A-Za-z0-9-]+)$").unwrap());

/// A block whose whole text is a single `^id`.
static STANDALONE_BLOCK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\^([A-Za-z0-9-]+)$").unwrap());

/// Parses a whole note (frontmatter and body) into a metadata snapshot.
///
/// # Errors
///
/// Returns `ParseError` if the frontmatter is malformed.
pub fn parse_metadata(content: &str) -> Result<NoteMetadata, ParseError> {
    frontmatter::parse(content).map(build_metadata)
}

/// Parses a note the way the vault indexes it.
///
/// Malformed frontmatter yields empty properties; the body's sections, list
/// items and headings are still extracted. The frontmatter error, if any, is
/// returned alongside.
pub fn parse_metadata_lenient(content: &str) -> (NoteMetadata, Option<ParseError>) {
    let (parsed, err) = frontmatter::parse_lenient(content);
    (build_metadata(parsed), err)
}

fn build_metadata(parsed: ParsedNote) -> NoteMetadata {
    let mut metadata = NoteMetadata::new().with_frontmatter(parsed.properties);
    if parsed.has_frontmatter {
        metadata.push_section(SectionInfo {
            kind: SectionKind::Yaml,
            id: None,
        });
    }
    extract_blocks(&parsed.body, &mut metadata);
    metadata
}

/// A list item whose end has not been seen yet.
struct OpenItem {
    index: usize,
    start: usize,
    /// Offset where the item's own text stops (start of a nested list).
    own_end: Option<usize>,
}

/// Appends the sections, list items, headings and block ids of `body`.
pub fn extract_blocks(body: &str, metadata: &mut NoteMetadata) {
    let mut depth = 0usize;
    let mut top_level: Option<SectionKind> = None;
    let mut items: Vec<Option<String>> = Vec::new();
    let mut open_items: Vec<OpenItem> = Vec::new();
    let mut html_end: Option<usize> = None;

    for (event, range) in Parser::new_ext(body, parser_options()).into_offset_iter() {
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    top_level = Some(section_kind(&tag, &body[range.clone()]));
                    html_end = None;
                }
                match tag {
                    Tag::Item => {
                        items.push(None);
                        open_items.push(OpenItem {
                            index: items.len() - 1,
                            start: range.start,
                            own_end: None,
                        });
                    }
                    Tag::List(_) => {
                        if let Some(item) = open_items.last_mut() {
                            item.own_end.get_or_insert(range.start);
                        }
                    }
                    _ => {}
                }
                depth += 1;
            }
            Event::End(tag) => {
                depth = depth.saturating_sub(1);
                match tag {
                    Tag::Heading(level, _, _) => metadata.push_heading(HeadingInfo {
                        level: heading_level(level),
                        text: heading_text(&body[range.clone()]),
                    }),
                    Tag::Item => {
                        if let Some(item) = open_items.pop() {
                            let end = item.own_end.unwrap_or(range.end);
                            items[item.index] = trailing_block_id(&body[item.start..end]);
                        }
                    }
                    Tag::Paragraph if depth > 0 => {
                        if let Some(id) = trailing_block_id(&body[range.clone()]) {
                            metadata.insert_block_id(id);
                        }
                    }
                    _ => {}
                }
                if depth == 0 {
                    if let Some(kind) = top_level.take() {
                        close_section(metadata, kind, &body[range]);
                    }
                }
            }
            Event::Rule if depth == 0 => {
                html_end = None;
                metadata.push_section(SectionInfo {
                    kind: SectionKind::ThematicBreak,
                    id: None,
                });
            }
            // HTML blocks arrive one line at a time
            Event::Html(_) if depth == 0 => {
                if html_end != Some(range.start) {
                    metadata.push_section(SectionInfo {
                        kind: SectionKind::Html,
                        id: None,
                    });
                }
                html_end = Some(range.end);
            }
            _ => {}
        }
    }

    for id in items {
        metadata.push_list_item(ListItemInfo { id });
    }
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

fn section_kind(tag: &Tag<'_>, text: &str) -> SectionKind {
    match tag {
        Tag::Heading(..) => SectionKind::Heading,
        Tag::BlockQuote if is_callout(text) => SectionKind::Callout,
        Tag::BlockQuote => SectionKind::Blockquote,
        Tag::CodeBlock(_) => SectionKind::Code,
        Tag::List(_) => SectionKind::List,
        Tag::Table(_) => SectionKind::Table,
        Tag::FootnoteDefinition(_) => SectionKind::FootnoteDefinition,
        _ => SectionKind::Paragraph,
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Raw text of a heading from its source, markup kept.
///
/// Drops the ATX `#` markers and closing sequence, or the setext underline,
/// and a trailing `^id`.
fn heading_text(source: &str) -> String {
    let source = source.trim();
    let text = if source.starts_with('#') {
        let line = source.trim_start_matches('#').trim();
        let unclosed = line.trim_end_matches('#');
        if unclosed.is_empty() {
            unclosed
        } else if unclosed.ends_with([' ', '\t']) {
            unclosed.trim_end()
        } else {
            line
        }
    } else {
        source.rsplit_once('\n').map_or(source, |(text, _underline)| text)
    };

    let text = text.lines().map(str::trim).collect::<Vec<_>>().join(" ");
    match TRAILING_BLOCK_ID.find(&text) {
        Some(found) => text[..found.start()].trim_end().to_string(),
        None => text,
    }
}

/// A blockquote whose first line opens with `[!type]`.
fn is_callout(text: &str) -> bool {
    text.lines()
        .next()
        .map(|line| line.trim_start().trim_start_matches('>').trim_start())
        .is_some_and(|line| line.starts_with("[!"))
}

fn close_section(metadata: &mut NoteMetadata, kind: SectionKind, text: &str) {
    if kind == SectionKind::Paragraph {
        if let Some(id) = standalone_block_id(text) {
            let follows_block = metadata
                .sections()
                .last()
                .is_some_and(|s| s.kind != SectionKind::Yaml);
            if follows_block {
                metadata.set_last_section_id(id);
                return;
            }
        }
    }

    let kind = if kind == SectionKind::Paragraph && text.trim_start().starts_with("$$") {
        SectionKind::Math
    } else {
        kind
    };

    // Lists carry ids on their items; code and tables only via a following `^id` line
    let id = match kind {
        SectionKind::List | SectionKind::Code | SectionKind::Table => None,
        _ => trailing_block_id(text),
    };

    metadata.push_section(SectionInfo { kind, id });
}

/// Block id at the end of the last non-blank line of `text`.
fn trailing_block_id(text: &str) -> Option<String> {
    let last_line = text.lines().rev().find(|line| !line.trim().is_empty())?;
    TRAILING_BLOCK_ID
        .captures(last_line.trim_end())
        .map(|caps| caps[1].to_string())
}

fn standalone_block_id(text: &str) -> Option<String> {
    STANDALONE_BLOCK_ID
        .captures(text.trim())
        .map(|caps| caps[1].to_string())
}
