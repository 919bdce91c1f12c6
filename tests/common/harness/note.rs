//! Builder for test notes with sensible defaults.

/// Builder for creating test notes.
///
/// A note has a vault-relative path, optional frontmatter lines,
/// and a body.
#[derive(Debug)]
pub struct TestNote {
    path: String,
    frontmatter: Vec<String>,
    body: String,
}

impl TestNote {
    /// Creates a new test note at `path`; `.md` is appended when missing.
    pub fn new(path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.ends_with(".md") {
            path.push_str(".md");
        }
        Self {
            path,
            frontmatter: Vec::new(),
            body: String::new(),
        }
    }

    /// Adds a frontmatter property written as `key: value`.
    ///
    /// The value is written as given, so YAML lists or numbers work too.
    pub fn property(mut self, key: &str, value: &str) -> Self {
        self.frontmatter.push(format!("{}: {}", key, value));
        self
    }

    /// Sets the `link-display` property.
    pub fn title(self, title: &str) -> Self {
        self.property("link-display", title)
    }

    /// Sets the body content (builder method).
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the vault-relative path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Renders the note file content.
    pub fn content(&self) -> String {
        if self.frontmatter.is_empty() {
            return self.body.clone();
        }
        format!("---\n{}\n---\n{}", self.frontmatter.join("\n"), self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_appends_extension() {
        assert_eq!(TestNote::new("Folder/Note").path(), "Folder/Note.md");
        assert_eq!(TestNote::new("Note.md").path(), "Note.md");
    }

    #[test]
    fn test_note_without_frontmatter() {
        let note = TestNote::new("Plain").body("Just text\n");
        assert_eq!(note.content(), "Just text\n");
    }

    #[test]
    fn test_note_with_frontmatter() {
        let note = TestNote::new("Titled")
            .title("Custom")
            .property("tags", "[a, b]")
            .body("Body\n");
        assert_eq!(
            note.content(),
            "---\nlink-display: Custom\ntags: [a, b]\n---\nBody\n"
        );
    }
}
