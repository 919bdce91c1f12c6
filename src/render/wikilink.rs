//! Wikilink scanning.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Inline code spans, or wikilinks `[[target]]`, `[[target|alias]]`, `![[embed]]`.
static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`[^`\n]*`|(!?)\[\[([^\[\]|\n]+)(?:\|([^\[\]\n]*))?\]\]").unwrap()
});

/// A wikilink occurrence in a note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLink<'a> {
    /// Byte range of the whole link, including brackets.
    pub range: Range<usize>,
    /// The link text between `[[` and `|` / `]]`.
    pub target: &'a str,
    /// Display text given after `|`.
    pub alias: Option<&'a str>,
    /// `![[...]]` embeds are not links.
    pub embed: bool,
}

/// Finds wikilinks in `body`, skipping inline code spans and fenced code blocks.
pub fn find_wikilinks(body: &str) -> Vec<WikiLink<'_>> {
    let fenced = fenced_code_ranges(body);

    WIKILINK_RE
        .captures_iter(body)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let target = caps.get(2)?;
            if fenced.iter().any(|r| r.contains(&whole.start())) {
                return None;
            }
            Some(WikiLink {
                range: whole.range(),
                target: target.as_str(),
                alias: caps.get(3).map(|m| m.as_str()),
                embed: caps.get(1).is_some_and(|m| !m.as_str().is_empty()),
            })
        })
        .collect()
}

/// Byte ranges covered by ``` or ~~~ fenced code blocks.
///
/// An unclosed fence runs to the end of the body.
fn fenced_code_ranges(body: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut open: Option<(usize, &str)> = None;
    let mut offset = 0;

    for line in body.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let fence = if trimmed.starts_with("```") {
            Some("```")
        } else if trimmed.starts_with("~~~") {
            Some("~~~")
        } else {
            None
        };

        match (open, fence) {
            (None, Some(marker)) => open = Some((offset, marker)),
            (Some((start, marker)), Some(f)) if f == marker => {
                ranges.push(start..offset + line.len());
                open = None;
            }
            _ => {}
        }
        offset += line.len();
    }

    if let Some((start, _)) = open {
        ranges.push(start..body.len());
    }
    ranges
}
