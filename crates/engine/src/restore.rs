use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use ironback_registry::GameRegistry;
use ironback_saves::{Layout, restorable_name};
use tracing::{debug, info, warn};

use crate::EngineError;
use crate::copier::{Copier, FsCopier};
use crate::record::BackupRecord;

/// Browses the backup store and copies backups back into live save slots.
pub struct RestoreEngine {
    registry: Arc<GameRegistry>,
    layout: Layout,
    copier: Box<dyn Copier>,
}

impl RestoreEngine {
    pub fn new(registry: Arc<GameRegistry>, layout: Layout) -> Self {
        Self {
            registry,
            layout,
            copier: Box::new(FsCopier),
        }
    }

    pub fn with_copier(mut self, copier: Box<dyn Copier>) -> Self {
        self.copier = copier;
        self
    }

    /// Games that have a backup directory, sorted by name.
    pub fn list_games(&self) -> Result<Vec<String>, EngineError> {
        let mut games: Vec<String> = child_dirs(self.layout.backup_root())?
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        games.sort();
        Ok(games)
    }

    /// Backup folders of `game`, most recently modified first.
    pub fn list_folders(&self, game: &str) -> Result<Vec<String>, EngineError> {
        validate_name(game)?;
        let mut folders = child_dirs(&self.layout.game_backup_dir(game))?;
        folders.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(folders.into_iter().map(|(name, _)| name).collect())
    }

    /// Backups in one folder, newest first by the timestamp in their names.
    ///
    /// Files whose names carry no readable timestamp are not backups and are
    /// left out.
    pub fn list_folder(&self, game: &str, folder: &str) -> Result<Vec<BackupRecord>, EngineError> {
        validate_name(game)?;
        validate_name(folder)?;
        let mut records = self.folder_records(game, folder)?;
        sort_newest_first(&mut records);
        Ok(records)
    }

    /// Every backup of `game` across all its folders, newest first.
    pub fn list_backups(&self, game: &str) -> Result<Vec<BackupRecord>, EngineError> {
        validate_name(game)?;
        let mut records = Vec::new();
        for (folder, _) in child_dirs(&self.layout.game_backup_dir(game))? {
            records.extend(self.folder_records(game, &folder)?);
        }
        sort_newest_first(&mut records);
        Ok(records)
    }

    /// Copies `<backup_root>/<game>/<folder>/<filename>` back to the game's
    /// save directory under its original name, overwriting any live save of
    /// that name. Returns the restored path.
    ///
    /// For directory-save games the file lands inside `<save_dir>/<folder>/`,
    /// which is created if the run folder is gone.
    pub fn restore(&self, game: &str, folder: &str, filename: &str) -> Result<PathBuf, EngineError> {
        let profile = self
            .registry
            .by_name(game)
            .ok_or_else(|| EngineError::UnknownGame(game.to_string()))?;
        validate_name(folder)?;
        validate_name(filename)?;

        let backup = self.layout.folder_backup_dir(game, folder).join(filename);
        if !backup.is_file() {
            return Err(EngineError::BackupNotFound(backup));
        }
        let original = restorable_name(filename)?;

        let mut target_dir = self.layout.save_dir(profile);
        if profile.saves_are_directories() {
            target_dir.push(folder);
        }
        fs::create_dir_all(&target_dir).map_err(|source| EngineError::CreateDir {
            path: target_dir.clone(),
            source,
        })?;

        let target = target_dir.join(&original);
        if target.exists() {
            debug!(path = %target.display(), "overwriting live save");
        }
        let bytes = self
            .copier
            .copy(&backup, &target)
            .map_err(|source| EngineError::Copy {
                from: backup.clone(),
                to: target.clone(),
                source,
            })?;

        info!(game, folder, backup = filename, restored = %target.display(), bytes, "save restored");
        Ok(target)
    }

    fn folder_records(&self, game: &str, folder: &str) -> Result<Vec<BackupRecord>, EngineError> {
        let dir = self.layout.folder_backup_dir(game, folder);
        let mut records = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                warn!(path = %entry.path().display(), "skipping non UTF-8 backup name");
                continue;
            };
            match BackupRecord::from_file(entry.path(), game, folder, &name) {
                Ok(record) => records.push(record),
                Err(e) => debug!(file = %name, error = %e, "not a backup file"),
            }
        }
        Ok(records)
    }
}

/// Immediate subdirectories with their modification times. A missing
/// directory has no children.
fn child_dirs(dir: &Path) -> Result<Vec<(String, SystemTime)>, EngineError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry?;
        let meta = entry.metadata()?;
        if !meta.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            dirs.push((name.to_string(), meta.modified()?));
        }
    }
    Ok(dirs)
}

fn sort_newest_first(records: &mut [BackupRecord]) {
    records.sort_by(|a, b| {
        b.created
            .cmp(&a.created)
            .then_with(|| a.folder.cmp(&b.folder))
            .then_with(|| a.file_name.cmp(&b.file_name))
    });
}

/// Rejects names that would escape their parent directory.
fn validate_name(name: &str) -> Result<(), EngineError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(EngineError::InvalidName(name.to_string()));
    }
    Ok(())
}
