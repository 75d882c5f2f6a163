//! Save artifacts and backup naming.
//!
//! - [`Layout`] resolves the live save directories and the backup store.
//! - [`locate`] picks the most recently modified save of a game.
//! - [`plan_backup`] maps a save to its timestamped backup path, and
//!   [`restorable_name`] undoes that mapping for restores.

mod layout;
mod locator;
mod namer;

use std::path::PathBuf;

pub use layout::{BACKUP_DIR_NAME, Layout};
pub use locator::{SaveArtifact, locate};
pub use namer::{
    BackupPlan, BackupTarget, SkipReason, TIMESTAMP_FORMAT, backup_file_name,
    parse_backup_timestamp, plan_backup, restorable_name,
};

/// Errors produced while locating or naming saves.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("no save found in {}: {reason}", path.display())]
    NotFound { path: PathBuf, reason: String },

    #[error("{name} does not end with the expected extension {extension:?}")]
    NamingMismatch { name: String, extension: String },

    #[error("file name is not valid UTF-8: {}", .0.display())]
    InvalidName(PathBuf),

    #[error("no backup timestamp in {0:?}")]
    MissingTimestamp(String),

    #[error("more than one backup timestamp in {0:?}")]
    AmbiguousTimestamp(String),

    #[error("invalid backup timestamp in {0:?}")]
    InvalidTimestamp(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
