//! File I/O, frontmatter and block parsing, the vault metadata cache, settings persistence

mod frontmatter;
mod fs;
mod markdown;
mod settings_store;
mod vault;

pub use frontmatter::{ParseError, ParsedNote, parse, parse_lenient};
pub use fs::{FsError, read_text, scan_notes_directory, write_atomic};
pub use markdown::{extract_blocks, parse_metadata, parse_metadata_lenient};
pub use settings_store::{SETTINGS_FILE, SettingsError, SettingsStore};
pub use vault::{ResolvedLink, Vault, resolve_subpath};
