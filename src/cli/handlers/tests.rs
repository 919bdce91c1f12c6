use super::label::strip_brackets;
use super::*;
use crate::cli::{ConfigCommand, ConfigShowArgs, FolderArgs, SetKeyArgs, SourceModeArgs, Toggle};
use crate::cli::config::Config;
use crate::cli::output::OutputFormat;
use crate::domain::NoteFile;
use crate::infra::SETTINGS_FILE;
use crate::render::{LinkRenderer, RenderMode};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

// Test helpers
fn vault_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("Projects")).unwrap();
    fs::write(
        dir.path().join("Projects/Roadmap.md"),
        "---\nlink-display: Project Roadmap\n---\n# Goals\n\nSee [[Ideas]].\n",
    )
    .unwrap();
    fs::write(dir.path().join("Ideas.md"), "Plain note\n").unwrap();
    fs::write(dir.path().join("Broken.md"), "---\ntitle: [unclosed\n---\n[[Ideas]]\n").unwrap();
    dir
}

fn persisted(dir: &TempDir) -> serde_json::Value {
    let written = fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap();
    serde_json::from_str(&written).unwrap()
}

// ===========================================
// Workspace tests
// ===========================================

#[test]
fn find_note_by_path_and_name() {
    let dir = vault_dir();
    let workspace = Workspace::open(dir.path(), &Config::default()).unwrap();

    assert_eq!(workspace.find_note("Projects/Roadmap.md").unwrap().path(), "Projects/Roadmap.md");
    assert_eq!(workspace.find_note("Roadmap").unwrap().path(), "Projects/Roadmap.md");
    assert_eq!(workspace.find_note(" ideas ").unwrap().path(), "Ideas.md");
}

#[test]
fn find_note_missing_fails() {
    let dir = vault_dir();
    let workspace = Workspace::open(dir.path(), &Config::default()).unwrap();

    let err = workspace.find_note("Nope").unwrap_err();
    assert!(err.to_string().contains("note not found: 'Nope'"));
}

#[test]
fn open_missing_vault_fails() {
    let dir = TempDir::new().unwrap();
    let result = Workspace::open(&dir.path().join("missing"), &Config::default());
    assert!(result.is_err());
}

#[test]
fn read_note_splits_frontmatter() {
    let dir = vault_dir();
    let workspace = Workspace::open(dir.path(), &Config::default()).unwrap();
    let note = workspace.find_note("Roadmap").unwrap();

    let (frontmatter, body) = workspace.read_note(&note).unwrap();
    assert_eq!(frontmatter, "---\nlink-display: Project Roadmap\n---\n");
    assert_eq!(body, "# Goals\n\nSee [[Ideas]].\n");
}

#[test]
fn read_note_without_frontmatter() {
    let dir = vault_dir();
    let workspace = Workspace::open(dir.path(), &Config::default()).unwrap();
    let note = workspace.find_note("Ideas").unwrap();

    let (frontmatter, body) = workspace.read_note(&note).unwrap();
    assert_eq!(frontmatter, "");
    assert_eq!(body, "Plain note\n");
}

#[test]
fn read_note_with_malformed_frontmatter_splits_the_block() {
    let dir = vault_dir();
    let workspace = Workspace::open(dir.path(), &Config::default()).unwrap();
    let note = workspace.find_note("Broken").unwrap();

    let (frontmatter, body) = workspace.read_note(&note).unwrap();
    assert_eq!(frontmatter, "---\ntitle: [unclosed\n---\n");
    assert_eq!(body, "[[Ideas]]\n");

    let metadata = workspace.vault.metadata("Broken.md").unwrap();
    assert!(metadata.frontmatter().is_empty());
}

#[test]
fn read_note_with_unclosed_rule_keeps_whole_body() {
    let dir = vault_dir();
    fs::write(dir.path().join("Rule.md"), "---\nOpens with a rule.\n").unwrap();
    let workspace = Workspace::open(dir.path(), &Config::default()).unwrap();
    let note = workspace.find_note("Rule").unwrap();

    let (frontmatter, body) = workspace.read_note(&note).unwrap();
    assert_eq!(frontmatter, "");
    assert_eq!(body, "---\nOpens with a rule.\n");
}

// ===========================================
// Settings handler tests
// ===========================================

#[test]
fn set_key_persists() {
    let dir = vault_dir();
    let command = ConfigCommand::SetKey(SetKeyArgs {
        key: " title ".to_string(),
    });

    handle_config(&command, dir.path(), &Config::default()).unwrap();
    assert_eq!(persisted(&dir)["key"], "title");
}

#[test]
fn set_key_rejects_blank() {
    let dir = vault_dir();
    let command = ConfigCommand::SetKey(SetKeyArgs { key: "  ".to_string() });

    let err = handle_config(&command, dir.path(), &Config::default()).unwrap_err();
    assert!(err.to_string().contains("cannot be empty"));
    assert!(!dir.path().join(SETTINGS_FILE).exists());
}

#[test]
fn exclude_then_include_folder() {
    let dir = vault_dir();

    let exclude = ConfigCommand::Exclude(FolderArgs {
        folder: "Projects/".to_string(),
    });
    handle_config(&exclude, dir.path(), &Config::default()).unwrap();
    assert_eq!(persisted(&dir)["excludedFolders"][0], "Projects");

    let include = ConfigCommand::Include(FolderArgs {
        folder: "Projects".to_string(),
    });
    handle_config(&include, dir.path(), &Config::default()).unwrap();
    assert_eq!(persisted(&dir)["excludedFolders"], serde_json::json!([]));
}

#[test]
fn exclude_rejects_blank_folder() {
    let dir = vault_dir();
    let command = ConfigCommand::Exclude(FolderArgs {
        folder: "/".to_string(),
    });
    assert!(handle_config(&command, dir.path(), &Config::default()).is_err());
}

#[test]
fn source_mode_toggle() {
    let dir = vault_dir();

    let on = ConfigCommand::SourceMode(SourceModeArgs { state: Toggle::On });
    handle_config(&on, dir.path(), &Config::default()).unwrap();
    assert_eq!(persisted(&dir)["enableInSourceMode"], true);

    let off = ConfigCommand::SourceMode(SourceModeArgs { state: Toggle::Off });
    handle_config(&off, dir.path(), &Config::default()).unwrap();
    assert_eq!(persisted(&dir)["enableInSourceMode"], false);
}

#[test]
fn show_does_not_write_settings() {
    let dir = vault_dir();
    let command = ConfigCommand::Show(ConfigShowArgs {
        format: OutputFormat::Json,
    });

    handle_config(&command, dir.path(), &Config::default()).unwrap();
    assert!(!dir.path().join(SETTINGS_FILE).exists());
}

#[test]
fn config_requires_existing_vault() {
    let dir = TempDir::new().unwrap();
    let command = ConfigCommand::Show(ConfigShowArgs {
        format: OutputFormat::Human,
    });

    let err = handle_config(&command, &dir.path().join("missing"), &Config::default()).unwrap_err();
    assert!(err.to_string().contains("vault directory not found"));
}

#[test]
fn config_defaults_seed_new_vault() {
    let dir = vault_dir();
    let config: Config = toml::from_str("[defaults]\nexcluded_folders = [\"Templates\"]\n").unwrap();

    let command = ConfigCommand::Exclude(FolderArgs {
        folder: "Daily".to_string(),
    });
    handle_config(&command, dir.path(), &config).unwrap();

    assert_eq!(
        persisted(&dir)["excludedFolders"],
        serde_json::json!(["Templates", "Daily"])
    );
}

#[test]
fn config_defaults_do_not_override_saved_settings() {
    let dir = vault_dir();
    fs::write(dir.path().join(SETTINGS_FILE), r#"{"key": "alias"}"#).unwrap();
    let config: Config = toml::from_str("[defaults]\nkey = \"title\"\n").unwrap();

    let workspace = Workspace::open(dir.path(), &config).unwrap();
    assert_eq!(workspace.settings.current().key, "alias");
}

#[test]
fn config_default_key_labels_links() {
    let dir = vault_dir();
    fs::write(dir.path().join("Titled.md"), "---\ntitle: From Title\n---\n").unwrap();
    let config: Config = toml::from_str("[defaults]\nkey = \"title\"\n").unwrap();

    let workspace = Workspace::open(dir.path(), &config).unwrap();
    let mut renderer = LinkRenderer::new(&workspace.vault, &workspace.settings);
    let out = renderer.render(&NoteFile::new("Ideas.md"), "[[Titled]]", RenderMode::Preview);
    assert_eq!(out.content, "From Title");
}

// ===========================================
// Utility tests
// ===========================================

#[test]
fn strip_brackets_accepts_pasted_links() {
    assert_eq!(strip_brackets("[[Note#^abc]]"), "Note#^abc");
    assert_eq!(strip_brackets(" Note "), "Note");
    assert_eq!(strip_brackets("[[Unclosed"), "[[Unclosed");
}

#[test]
fn truncate_str_short_string() {
    assert_eq!(truncate_str("hello", 10), "hello");
}

#[test]
fn truncate_str_long_string() {
    assert_eq!(truncate_str("hello world", 6), "hello…");
}
