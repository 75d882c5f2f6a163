use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::SaveError;
use crate::layout::Layout;
use crate::locator::SaveArtifact;

/// `chrono` format of the timestamp inserted into backup file names
/// (`DD-MM-YY HHMMSS`, 24-hour clock).
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%y %H%M%S";

/// Textual shape of `-<TIMESTAMP_FORMAT>` as it appears in a backup name.
/// ASCII digits only, matching what `chrono` writes.
static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-[0-9]{2}-[0-9]{2}-[0-9]{2} [0-9]{6}").expect("valid timestamp pattern")
});

/// Why a located save is deliberately not backed up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The game is recognised but has no known save extension.
    UnsupportedGame,
    /// The save name ends with an excluded suffix (autosave/temp marker).
    ExcludedSuffix(String),
    /// A run folder without the game's inner save file.
    MissingInnerSave(PathBuf),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedGame => write!(f, "unsupported game, no known save extension"),
            SkipReason::ExcludedSuffix(suffix) => write!(f, "name ends with excluded suffix {suffix}"),
            SkipReason::MissingInnerSave(path) => write!(f, "{} does not exist", path.display()),
        }
    }
}

/// Source and destination of one backup copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupTarget {
    /// File to copy from (inside the live save directory).
    pub source: PathBuf,
    /// New file under `<backup_root>/<game>/<folder>/`.
    pub destination: PathBuf,
    /// Backup folder name: the artifact's base name without extension, or
    /// the run folder name for directory-save games.
    pub folder: String,
}

/// Outcome of naming a located save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupPlan {
    Copy(BackupTarget),
    Skip(SkipReason),
}

/// Builds `<stem>-<timestamp><extension>`.
pub fn backup_file_name(stem: &str, extension: &str, now: NaiveDateTime) -> String {
    format!("{stem}-{}{extension}", now.format(TIMESTAMP_FORMAT))
}

/// Maps a located save to its backup destination, stamped with `now`.
///
/// Extensions are compared as literal suffixes. A save whose name does not
/// end with the profile's extension is a [`SaveError::NamingMismatch`].
pub fn plan_backup(
    layout: &Layout,
    artifact: &SaveArtifact<'_>,
    now: NaiveDateTime,
) -> Result<BackupPlan, SaveError> {
    let profile = artifact.profile;
    if profile.is_unsupported() {
        return Ok(BackupPlan::Skip(SkipReason::UnsupportedGame));
    }

    let name = artifact.file_name()?;

    if let Some(inner_file) = profile.inner_file() {
        let source = artifact.path.join(inner_file);
        if !source.is_file() {
            return Ok(BackupPlan::Skip(SkipReason::MissingInnerSave(source)));
        }
        let inner_stem = strip_extension(inner_file, &profile.extension)?;
        let destination = layout
            .folder_backup_dir(&profile.name, name)
            .join(backup_file_name(inner_stem, &profile.extension, now));
        return Ok(BackupPlan::Copy(BackupTarget {
            source,
            destination,
            folder: name.to_string(),
        }));
    }

    let stem = strip_extension(name, &profile.extension)?;
    if let Some(suffix) = profile
        .excluded_suffixes
        .iter()
        .find(|s| stem.ends_with(s.as_str()))
    {
        return Ok(BackupPlan::Skip(SkipReason::ExcludedSuffix(suffix.clone())));
    }

    let destination = layout
        .folder_backup_dir(&profile.name, stem)
        .join(backup_file_name(stem, &profile.extension, now));
    Ok(BackupPlan::Copy(BackupTarget {
        source: artifact.path.clone(),
        destination,
        folder: stem.to_string(),
    }))
}

fn strip_extension<'a>(name: &'a str, extension: &str) -> Result<&'a str, SaveError> {
    name.strip_suffix(extension)
        .ok_or_else(|| SaveError::NamingMismatch {
            name: name.to_string(),
            extension: extension.to_string(),
        })
}

/// Recovers the live save name from a backup file name.
///
/// Removes the single `-DD-MM-YY HHMMSS` segment wherever it appears. Names
/// with no such segment, or with more than one, are rejected rather than
/// guessed at.
pub fn restorable_name(backup_filename: &str) -> Result<String, SaveError> {
    let m = single_timestamp(backup_filename)?;
    let mut restored = String::with_capacity(backup_filename.len() - m.len());
    restored.push_str(&backup_filename[..m.start()]);
    restored.push_str(&backup_filename[m.end()..]);
    Ok(restored)
}

/// Parses the creation time embedded in a backup file name.
pub fn parse_backup_timestamp(backup_filename: &str) -> Result<NaiveDateTime, SaveError> {
    let m = single_timestamp(backup_filename)?;
    // Skip the leading '-'.
    NaiveDateTime::parse_from_str(&m.as_str()[1..], TIMESTAMP_FORMAT)
        .map_err(|_| SaveError::InvalidTimestamp(backup_filename.to_string()))
}

fn single_timestamp(backup_filename: &str) -> Result<regex::Match<'_>, SaveError> {
    let mut matches = TIMESTAMP_RE.find_iter(backup_filename);
    match (matches.next(), matches.next()) {
        (Some(m), None) => Ok(m),
        (None, _) => Err(SaveError::MissingTimestamp(backup_filename.to_string())),
        (Some(_), Some(_)) => Err(SaveError::AmbiguousTimestamp(backup_filename.to_string())),
    }
}
