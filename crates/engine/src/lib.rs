//! Backup and restore orchestration.
//!
//! A [`BackupEngine`] tick runs the whole pipeline once: detect the running
//! game, locate its newest save, derive the timestamped backup path and copy
//! the save there. A [`RestoreEngine`] lists stored backups and copies one
//! back into the game's live save slot.
//!
//! Both engines are synchronous and hold no locks; callers must not run two
//! ticks at once.

mod backup;
mod clock;
mod copier;
mod record;
mod report;
mod restore;

#[cfg(test)]
pub(crate) mod testing;

use std::path::PathBuf;

use ironback_detector::DetectError;
use ironback_saves::SaveError;

pub use backup::BackupEngine;
pub use clock::{Clock, LocalClock};
pub use copier::{Copier, FsCopier};
pub use record::BackupRecord;
pub use report::{Report, TickOutcome};
pub use restore::RestoreEngine;

/// Line reported when no supported game is running.
pub const IDLE_MESSAGE: &str = "Please launch a supported game!";

/// Errors produced by a backup tick or a restore.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Detect(#[from] DetectError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("backup already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("unknown game: {0}")]
    UnknownGame(String),

    #[error("backup not found: {}", .0.display())]
    BackupNotFound(PathBuf),

    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
