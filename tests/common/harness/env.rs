//! Isolated test environment with temp directory.

use super::{LinkDisplayCommand, TestNote};
use link_display::infra::SETTINGS_FILE;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with a temporary vault directory.
///
/// Creates a temp directory that is automatically cleaned up on drop.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    /// Path to the vault directory
    vault_dir: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment with an empty vault.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let vault_dir = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            vault_dir,
        }
    }

    /// Returns the path to the vault directory.
    pub fn vault_dir(&self) -> &Path {
        &self.vault_dir
    }

    /// Returns the path of the user config file the commands read.
    #[allow(dead_code)]
    pub fn config_path(&self) -> PathBuf {
        self.vault_dir.join(".config.toml")
    }

    /// Writes the user config file.
    #[allow(dead_code)]
    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_path(), content).expect("Failed to write config");
    }

    /// Returns the path of the persisted settings file.
    #[allow(dead_code)]
    pub fn settings_path(&self) -> PathBuf {
        self.vault_dir.join(SETTINGS_FILE)
    }

    /// Adds a test note to the vault and returns its path.
    pub fn add_note(&self, note: &TestNote) -> PathBuf {
        self.write_file(note.path(), &note.content())
    }

    /// Writes a file into the vault, creating parent folders, and returns its path.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.vault_dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Creates a command configured for this vault.
    pub fn cmd(&self) -> LinkDisplayCommand {
        LinkDisplayCommand::new()
            .dir(&self.vault_dir)
            .config_file(&self.config_path())
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_creates_temp_directory() {
        let env = TestEnv::new();
        assert!(env.vault_dir().is_dir(), "vault directory should exist");
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.vault_dir().to_path_buf()
        };
        assert!(!path.exists(), "temp directory should be cleaned up on drop");
    }

    #[test]
    fn test_env_add_note_creates_folders() {
        let env = TestEnv::new();
        let path = env.add_note(&TestNote::new("Deep/Nested/Note").body("x"));
        assert!(path.is_file());
        assert!(path.ends_with("Deep/Nested/Note.md"));
    }

    #[test]
    fn test_env_provides_command() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        let args = cmd.get_args();
        assert_eq!(args[0], "--dir");
        assert_eq!(args[1], env.vault_dir().to_string_lossy());
    }

    #[test]
    fn test_env_settings_path() {
        let env = TestEnv::new();
        assert!(env.settings_path().starts_with(env.vault_dir()));
        assert!(!env.settings_path().exists());
    }
}
