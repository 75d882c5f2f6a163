use std::path::PathBuf;

use chrono::NaiveDateTime;
use ironback_saves::{SaveError, parse_backup_timestamp};

/// One stored backup file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    /// Absolute path under the backup root.
    pub path: PathBuf,
    pub game: String,
    /// Backup folder (original save's base name or run folder).
    pub folder: String,
    pub file_name: String,
    /// Creation time encoded in the file name.
    pub created: NaiveDateTime,
}

impl BackupRecord {
    /// Builds a record from an existing backup file, reading the creation
    /// time back out of its name.
    pub fn from_file(
        path: PathBuf,
        game: &str,
        folder: &str,
        file_name: &str,
    ) -> Result<Self, SaveError> {
        let created = parse_backup_timestamp(file_name)?;
        Ok(Self {
            path,
            game: game.to_string(),
            folder: folder.to_string(),
            file_name: file_name.to_string(),
            created,
        })
    }
}
