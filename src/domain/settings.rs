//! User settings consumed by the label resolver.

use serde::{Deserialize, Serialize};

/// Default frontmatter property holding a note's display title.
pub const DEFAULT_PROPERTY_KEY: &str = "link-display";

/// Settings controlling how link labels are computed.
///
/// Serialized in camelCase so the persisted file reads
/// `{ "key": ..., "enableInSourceMode": ..., "excludedFolders": [...] }`.
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Frontmatter property whose string value replaces the note basename.
    pub key: String,

    /// Whether labels are applied in source mode.
    pub enable_in_source_mode: bool,

    /// Folders whose notes keep default link rendering.
    pub excluded_folders: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            key: DEFAULT_PROPERTY_KEY.to_string(),
            enable_in_source_mode: false,
            excluded_folders: Vec::new(),
        }
    }
}

impl Settings {
    /// Returns true if a note at `source_path` lies inside an excluded folder.
    ///
    /// Matching respects folder boundaries: excluding `Foo` covers
    /// `Foo/note.md` and `Foo/Bar/note.md` but not `Foobar/note.md`.
    /// Blank entries never match.
    ///
    /// # Examples
    ///
    /// ```
    /// use link_display::domain::Settings;
    ///
    /// let settings = Settings {
    ///     excluded_folders: vec!["Foo".to_string()],
    ///     ..Settings::default()
    /// };
    /// assert!(settings.is_excluded("Foo/note.md"));
    /// assert!(!settings.is_excluded("Foobar/note.md"));
    /// ```
    pub fn is_excluded(&self, source_path: &str) -> bool {
        let source = source_path.replace('\\', "/");
        let source = source.trim_start_matches("./").trim_start_matches('/');

        self.excluded_folders
            .iter()
            .filter_map(|folder| normalize_folder(folder))
            .any(|folder| source.starts_with(&format!("{}/", folder)))
    }

    /// Adds a folder to the exclusion list.
    ///
    /// Returns false if the folder is blank or already excluded.
    pub fn exclude_folder(&mut self, folder: &str) -> bool {
        let Some(normalized) = normalize_folder(folder) else {
            return false;
        };
        let exists = self
            .excluded_folders
            .iter()
            .any(|f| normalize_folder(f).as_deref() == Some(normalized.as_str()));
        if exists {
            return false;
        }
        self.excluded_folders.push(normalized);
        true
    }

    /// Removes a folder from the exclusion list.
    ///
    /// Returns false if the folder was not excluded.
    pub fn include_folder(&mut self, folder: &str) -> bool {
        let Some(normalized) = normalize_folder(folder) else {
            return false;
        };
        let before = self.excluded_folders.len();
        self.excluded_folders
            .retain(|f| normalize_folder(f).as_deref() != Some(normalized.as_str()));
        self.excluded_folders.len() != before
    }
}

/// Normalizes a folder entry to `a/b` form, or `None` if it names nothing.
fn normalize_folder(folder: &str) -> Option<String> {
    let folder = folder.trim().replace('\\', "/");
    let folder = folder
        .trim_start_matches("./")
        .trim_start_matches('/')
        .trim_end_matches('/');
    if folder.is_empty() {
        None
    } else {
        Some(folder.to_string())
    }
}
