//! Fluent wrapper around assert_cmd::Command.

// Allow dead code since this is a test utility shared by several test crates
#![allow(dead_code)]

use assert_cmd::Command;
use link_display::cli::config::CONFIG_ENV;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Fluent wrapper around `assert_cmd::Command` for the `link-display` binary.
///
/// Provides a builder-style API for constructing and executing CLI commands.
pub struct LinkDisplayCommand {
    args: Vec<String>,
    config_file: Option<PathBuf>,
}

impl LinkDisplayCommand {
    /// Creates a new command for the `link-display` binary.
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            config_file: None,
        }
    }

    /// Reads the user config from `path` instead of the home directory.
    pub fn config_file(mut self, path: &Path) -> Self {
        self.config_file = Some(path.to_path_buf());
        self
    }

    /// Sets the `--dir` option to specify the vault directory.
    pub fn dir(mut self, path: &Path) -> Self {
        self.args.push("--dir".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd =
            Command::cargo_bin("link-display").expect("Failed to find link-display binary");
        cmd.env_remove("RUST_LOG");
        match &self.config_file {
            Some(path) => cmd.env(CONFIG_ENV, path),
            None => cmd.env_remove(CONFIG_ENV),
        };
        cmd.args(&self.args);
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Command Shortcuts
    // ===========================================

    /// Configures for the `label` command.
    pub fn label(self, source: &str, link: &str) -> Self {
        self.args(["label", source, link])
    }

    /// Configures for the `links` command.
    pub fn links(self, note: &str) -> Self {
        self.args(["links", note])
    }

    /// Configures for the `render` command.
    pub fn render(self, note: &str) -> Self {
        self.args(["render", note])
    }

    /// Configures for a `config` subcommand.
    pub fn config<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args(["config"]).args(args)
    }

    // ===========================================
    // Options
    // ===========================================

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }

    /// Adds `--mode source` to the command.
    pub fn source_mode(self) -> Self {
        self.args(["--mode", "source"])
    }
}

impl Default for LinkDisplayCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_runs_binary() {
        LinkDisplayCommand::new().args(["--help"]).assert().success();
    }

    #[test]
    fn test_command_with_dir() {
        let temp = TempDir::new().unwrap();
        let cmd = LinkDisplayCommand::new().dir(temp.path());
        let args = cmd.get_args();
        assert_eq!(args[0], "--dir");
        assert_eq!(args[1], temp.path().to_string_lossy());
    }

    #[test]
    fn test_command_shortcuts() {
        let cmd = LinkDisplayCommand::new().label("A", "B#^x").format_json();
        assert_eq!(cmd.get_args(), ["label", "A", "B#^x", "--format", "json"]);
    }

    #[test]
    fn test_config_shortcut() {
        let cmd = LinkDisplayCommand::new().config(["exclude", "Daily"]);
        assert_eq!(cmd.get_args(), ["config", "exclude", "Daily"]);
    }
}
