use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How a game stores a single save on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SaveLayout {
    /// Each save is one file in the save directory.
    #[default]
    File,
    /// Each save is a folder (one per run) holding a fixed inner file.
    Directory { inner_file: String },
}

/// Static description of one supported game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProfile {
    /// Canonical game name; also the game's directory name under both the
    /// working root and the backup root.
    pub name: String,
    /// Executable basenames that identify the running game.
    pub processes: Vec<String>,
    /// Save directory relative to the working root.
    /// Defaults to `<name>/save games`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_dir: Option<PathBuf>,
    /// Save file extension including the leading dot. Empty means the game
    /// is recognised but its saves are not supported.
    #[serde(default)]
    pub extension: String,
    /// Base-name suffixes (extension already stripped) that are never
    /// backed up.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_suffixes: Vec<String>,
    #[serde(default)]
    pub layout: SaveLayout,
}

impl GameProfile {
    /// Creates a single-file-save profile with no excluded suffixes.
    pub fn new(name: &str, processes: &[&str], extension: &str) -> Self {
        Self {
            name: name.into(),
            processes: processes.iter().map(|p| (*p).to_string()).collect(),
            save_dir: None,
            extension: extension.into(),
            excluded_suffixes: Vec::new(),
            layout: SaveLayout::File,
        }
    }

    pub fn with_excluded_suffixes(mut self, suffixes: &[&str]) -> Self {
        self.excluded_suffixes = suffixes.iter().map(|s| (*s).to_string()).collect();
        self
    }

    pub fn with_layout(mut self, layout: SaveLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_save_dir(mut self, save_dir: impl Into<PathBuf>) -> Self {
        self.save_dir = Some(save_dir.into());
        self
    }

    /// Save directory relative to the working root.
    pub fn save_dir(&self) -> PathBuf {
        self.save_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.name).join("save games"))
    }

    /// True only for games whose saves are per-run folders.
    pub fn saves_are_directories(&self) -> bool {
        matches!(self.layout, SaveLayout::Directory { .. })
    }

    /// Fixed file inside each save folder, for directory-save games.
    pub fn inner_file(&self) -> Option<&str> {
        match &self.layout {
            SaveLayout::File => None,
            SaveLayout::Directory { inner_file } => Some(inner_file),
        }
    }

    /// True when the game has no known save extension.
    pub fn is_unsupported(&self) -> bool {
        self.extension.is_empty()
    }

    /// Exact, case-sensitive match against the profile's executables.
    pub fn matches_process(&self, executable: &str) -> bool {
        self.processes.iter().any(|p| p == executable)
    }

    /// True if a stripped base name ends with any excluded suffix.
    pub fn is_excluded(&self, stem: &str) -> bool {
        self.excluded_suffixes
            .iter()
            .any(|suffix| stem.ends_with(suffix.as_str()))
    }
}

impl fmt::Display for GameProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
