//! Configuration and per-repository storage.
//!
//! The repository list, root directory, yank template and open-script path
//! live in `config.toml`. Post-create scripts and worktree notes are plain
//! files under `scripts/` and `notes/` next to it, keyed through the name
//! sanitizer — two names that sanitize identically share a file, which is a
//! documented limitation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::naming::{note_key, sanitize};

const CONFIG_FILE: &str = "config.toml";
const NOTES_DIR: &str = "notes";
const SCRIPTS_DIR: &str = "scripts";

/// How a repository entered the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoKind {
    #[default]
    Local,
    Remote,
}

impl std::fmt::Display for RepoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoKind::Local => write!(f, "local"),
            RepoKind::Remote => write!(f, "remote"),
        }
    }
}

/// Guess whether a path/URL field refers to a remote repository.
pub fn infer_repo_kind(path_or_url: &str) -> RepoKind {
    let s = path_or_url.trim();
    if s.starts_with("http://")
        || s.starts_with("https://")
        || s.starts_with("git@")
        || s.starts_with("ssh://")
    {
        RepoKind::Remote
    } else {
        RepoKind::Local
    }
}

/// A registered repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Unique, user-chosen display name; immutable once added
    pub name: String,
    /// Absolute path of the primary checkout
    pub path: PathBuf,
    #[serde(default)]
    pub kind: RepoKind,
    /// Clone URL; empty unless kind is Remote
    #[serde(default)]
    pub url: String,
}

/// Main configuration struct.
///
/// Field order matters for TOML output: plain values first, the repository
/// array of tables last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory new worktrees and clones are created under
    #[serde(default = "default_root_directory")]
    pub root_directory: PathBuf,
    /// Template expanded by the yank action; empty falls back to the path
    #[serde(default = "default_yank_template")]
    pub yank_template: String,
    /// Path to a script file executed by the open action (Enter)
    #[serde(default)]
    pub open_script: String,
    #[serde(default)]
    pub repositories: Vec<Repository>,
}

fn default_root_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("workspace")
}

fn default_yank_template() -> String {
    "${worktree_path}".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_directory: default_root_directory(),
            yank_template: default_yank_template(),
            open_script: String::new(),
            repositories: Vec::new(),
        }
    }
}

impl Config {
    pub fn repo_names(&self) -> impl Iterator<Item = &str> {
        self.repositories.iter().map(|r| r.name.as_str())
    }
}

/// Handle to the on-disk store. Constructed with an explicit base directory
/// so tests can point it at a tempdir.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    base_dir: PathBuf,
}

impl ConfigStore {
    /// Store rooted at the default location, `~/.config/treeline`.
    pub fn open_default() -> Result<Self> {
        let base = dirs::config_dir()
            .context("Could not find config directory")?
            .join("treeline");
        Ok(Self::open(base))
    }

    pub fn open(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the log file, for the tracing writer.
    pub fn log_path(&self) -> PathBuf {
        self.base_dir.join("treeline.log")
    }

    fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE)
    }

    /// Load the configuration, writing a default file on first run.
    pub fn load(&self) -> Result<Config> {
        let path = self.config_path();

        if !path.exists() {
            let config = Config::default();
            self.save(&config)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save the configuration, creating the directory as needed.
    pub fn save(&self, config: &Config) -> Result<()> {
        let path = self.config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    fn script_path(&self, repo_name: &str) -> PathBuf {
        self.base_dir.join(SCRIPTS_DIR).join(sanitize(repo_name))
    }

    fn note_path(&self, repo_name: &str, worktree_name: &str) -> PathBuf {
        self.base_dir
            .join(NOTES_DIR)
            .join(note_key(repo_name, worktree_name))
    }

    /// Read the post-create script for a repository; missing file is empty.
    pub fn repo_script(&self, repo_name: &str) -> Result<String> {
        read_optional(&self.script_path(repo_name))
    }

    /// Whether a non-empty post-create script is stored for the repository.
    pub fn has_repo_script(&self, repo_name: &str) -> bool {
        fs::metadata(self.script_path(repo_name))
            .map(|m| m.len() > 0)
            .unwrap_or(false)
    }

    /// Store the post-create script; empty text deletes the file.
    pub fn set_repo_script(&self, repo_name: &str, script: &str) -> Result<()> {
        write_optional(&self.script_path(repo_name), script)
    }

    pub fn delete_repo_script(&self, repo_name: &str) -> Result<()> {
        remove_if_exists(&self.script_path(repo_name))
    }

    /// Read the note for a worktree; missing file is empty.
    pub fn worktree_note(&self, repo_name: &str, worktree_name: &str) -> Result<String> {
        read_optional(&self.note_path(repo_name, worktree_name))
    }

    /// Store a worktree note; empty text deletes the file.
    pub fn set_worktree_note(
        &self,
        repo_name: &str,
        worktree_name: &str,
        note: &str,
    ) -> Result<()> {
        write_optional(&self.note_path(repo_name, worktree_name), note)
    }

    pub fn delete_worktree_note(&self, repo_name: &str, worktree_name: &str) -> Result<()> {
        remove_if_exists(&self.note_path(repo_name, worktree_name))
    }
}

fn read_optional(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(contents.trim().to_string()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

fn write_optional(path: &Path, contents: &str) -> Result<()> {
    let contents = contents.trim();
    if contents.is_empty() {
        return remove_if_exists(path);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}
