use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use ironback_registry::GameProfile;
use tracing::{debug, warn};

use crate::SaveError;
use crate::layout::Layout;

/// A located save: a file, or a run folder for directory-save games.
#[derive(Debug, Clone)]
pub struct SaveArtifact<'p> {
    pub path: PathBuf,
    pub modified: SystemTime,
    pub profile: &'p GameProfile,
}

impl SaveArtifact<'_> {
    /// Base name of the artifact (file or folder name).
    pub fn file_name(&self) -> Result<&str, SaveError> {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SaveError::InvalidName(self.path.clone()))
    }
}

/// Returns the most recently modified save of `profile`.
///
/// Only immediate children of the save directory are considered: files for
/// single-file games, folders for directory-save games. On equal
/// modification times the entry listed first wins; listing order comes from
/// the platform and is not stable across systems.
pub fn locate<'p>(layout: &Layout, profile: &'p GameProfile) -> Result<SaveArtifact<'p>, SaveError> {
    let save_dir = layout.save_dir(profile);
    let (path, modified) = newest_entry(&save_dir, profile.saves_are_directories())?;

    debug!(game = %profile.name, path = %path.display(), "located newest save");
    Ok(SaveArtifact {
        path,
        modified,
        profile,
    })
}

fn newest_entry(dir: &Path, want_dirs: bool) -> Result<(PathBuf, SystemTime), SaveError> {
    let not_found = |reason: String| SaveError::NotFound {
        path: dir.to_path_buf(),
        reason,
    };

    let entries = fs::read_dir(dir).map_err(|e| not_found(e.to_string()))?;

    // `None` sorts below every real timestamp, pre-epoch ones included.
    let mut best: Option<(PathBuf, SystemTime)> = None;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "failed to read save directory entry");
                continue;
            }
        };

        let path = entry.path();
        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to stat save entry");
                continue;
            }
        };

        if metadata.is_dir() != want_dirs {
            continue;
        }

        let modified = match metadata.modified() {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "no modification time for save entry");
                continue;
            }
        };

        let newer = best.as_ref().is_none_or(|(_, current)| modified > *current);
        if newer {
            best = Some((path, modified));
        }
    }

    best.ok_or_else(|| {
        let kind = if want_dirs { "save folders" } else { "save files" };
        not_found(format!("no {kind}"))
    })
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use ironback_registry::SaveLayout;

    use super::*;

    fn set_mtime(path: &Path, secs: u64) {
        let f = fs::File::open(path).unwrap();
        f.set_modified(UNIX_EPOCH + Duration::from_secs(secs)).unwrap();
    }

    fn write_save(dir: &Path, name: &str, secs: u64) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, name.as_bytes()).unwrap();
        set_mtime(&path, secs);
        path
    }

    fn eu4() -> GameProfile {
        GameProfile::new("Europa Universalis IV", &["eu4.exe"], ".eu4")
    }

    fn stellaris() -> GameProfile {
        GameProfile::new("Stellaris", &["stellaris.exe"], ".sav").with_layout(
            SaveLayout::Directory {
                inner_file: "ironman.sav".into(),
            },
        )
    }

    fn setup(profile: &GameProfile) -> (tempfile::TempDir, Layout, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let layout = Layout::new(tmp.path());
        let save_dir = layout.save_dir(profile);
        fs::create_dir_all(&save_dir).unwrap();
        (tmp, layout, save_dir)
    }

    #[test]
    fn picks_newest_of_many() {
        let profile = eu4();
        let (_tmp, layout, dir) = setup(&profile);
        write_save(&dir, "a.eu4", 1_000);
        write_save(&dir, "b.eu4", 3_000);
        write_save(&dir, "c.eu4", 2_000);

        let artifact = locate(&layout, &profile).unwrap();
        assert_eq!(artifact.file_name().unwrap(), "b.eu4");
        assert_eq!(artifact.modified, UNIX_EPOCH + Duration::from_secs(3_000));
        assert_eq!(artifact.profile.name, "Europa Universalis IV");
    }

    #[test]
    fn ignores_directories_for_file_games() {
        let profile = eu4();
        let (_tmp, layout, dir) = setup(&profile);
        write_save(&dir, "old.eu4", 1_000);
        let sub = dir.join("newer_folder");
        fs::create_dir(&sub).unwrap();
        set_mtime(&sub, 9_000);

        let artifact = locate(&layout, &profile).unwrap();
        assert_eq!(artifact.file_name().unwrap(), "old.eu4");
    }

    #[test]
    fn picks_newest_folder_for_directory_games() {
        let profile = stellaris();
        let (_tmp, layout, dir) = setup(&profile);
        for (name, secs) in [("run_a", 5_000), ("run_b", 7_000)] {
            let run = dir.join(name);
            fs::create_dir(&run).unwrap();
            write_save(&run, "ironman.sav", secs);
            set_mtime(&run, secs);
        }
        // A loose file newer than both folders must not be chosen.
        write_save(&dir, "settings.txt", 9_000);

        let artifact = locate(&layout, &profile).unwrap();
        assert_eq!(artifact.file_name().unwrap(), "run_b");
    }

    #[test]
    fn epoch_mtime_is_still_eligible() {
        let profile = eu4();
        let (_tmp, layout, dir) = setup(&profile);
        write_save(&dir, "ancient.eu4", 0);

        let artifact = locate(&layout, &profile).unwrap();
        assert_eq!(artifact.file_name().unwrap(), "ancient.eu4");
    }

    #[test]
    fn equal_mtimes_return_one_of_the_candidates() {
        let profile = eu4();
        let (_tmp, layout, dir) = setup(&profile);
        write_save(&dir, "x.eu4", 4_000);
        write_save(&dir, "y.eu4", 4_000);

        // Listing order decides; only membership is portable.
        let artifact = locate(&layout, &profile).unwrap();
        let name = artifact.file_name().unwrap();
        assert!(name == "x.eu4" || name == "y.eu4");

        // Repeated scans of an unchanged directory agree with each other.
        let again = locate(&layout, &profile).unwrap();
        assert_eq!(again.path, artifact.path);
    }

    #[test]
    fn missing_directory_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = Layout::new(tmp.path());
        let err = locate(&layout, &eu4()).unwrap_err();
        assert!(matches!(err, SaveError::NotFound { .. }));
    }

    #[test]
    fn empty_directory_is_not_found() {
        let profile = eu4();
        let (_tmp, layout, _dir) = setup(&profile);
        let err = locate(&layout, &profile).unwrap_err();
        match err {
            SaveError::NotFound { reason, .. } => assert_eq!(reason, "no save files"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn directory_game_with_only_files_is_not_found() {
        let profile = stellaris();
        let (_tmp, layout, dir) = setup(&profile);
        write_save(&dir, "loose.sav", 1_000);
        let err = locate(&layout, &profile).unwrap_err();
        assert!(matches!(err, SaveError::NotFound { .. }));
    }
}
