use std::path::{Path, PathBuf};

use ironback_registry::GameProfile;

/// Default name of the backup store under the working root.
pub const BACKUP_DIR_NAME: &str = "Ironman Backup";

/// Where live saves and backups live on disk.
///
/// Passed explicitly through every operation; nothing in the pipeline reads
/// a process-wide working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    working_root: PathBuf,
    backup_root: PathBuf,
}

impl Layout {
    /// Creates a layout with the backup store at `<working_root>/Ironman Backup`.
    pub fn new(working_root: impl Into<PathBuf>) -> Self {
        let working_root = working_root.into();
        let backup_root = working_root.join(BACKUP_DIR_NAME);
        Self {
            working_root,
            backup_root,
        }
    }

    pub fn with_backup_root(mut self, backup_root: impl Into<PathBuf>) -> Self {
        self.backup_root = backup_root.into();
        self
    }

    /// Root holding `<game>/save games` directories.
    pub fn working_root(&self) -> &Path {
        &self.working_root
    }

    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    /// Live save directory of a game.
    pub fn save_dir(&self, profile: &GameProfile) -> PathBuf {
        self.working_root.join(profile.save_dir())
    }

    /// `<backup_root>/<game>`.
    pub fn game_backup_dir(&self, game: &str) -> PathBuf {
        self.backup_root.join(game)
    }

    /// `<backup_root>/<game>/<folder>`.
    pub fn folder_backup_dir(&self, game: &str, folder: &str) -> PathBuf {
        self.game_backup_dir(game).join(folder)
    }
}
