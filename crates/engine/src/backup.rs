use std::fs;
use std::path::Path;
use std::sync::Arc;

use ironback_detector::GameDetector;
use ironback_registry::GameRegistry;
use ironback_saves::{BackupPlan, Layout, locate, plan_backup};
use tracing::{debug, info, warn};

use crate::clock::{Clock, LocalClock};
use crate::copier::{Copier, FsCopier};
use crate::record::BackupRecord;
use crate::report::{Report, TickOutcome};
use crate::{EngineError, IDLE_MESSAGE};

/// Runs one detect → locate → name → copy pass per [`tick`](Self::tick).
pub struct BackupEngine {
    registry: Arc<GameRegistry>,
    layout: Layout,
    detector: GameDetector,
    clock: Box<dyn Clock>,
    copier: Box<dyn Copier>,
}

impl BackupEngine {
    /// Creates an engine using local time and `std::fs::copy`.
    pub fn new(registry: Arc<GameRegistry>, layout: Layout, detector: GameDetector) -> Self {
        Self {
            registry,
            layout,
            detector,
            clock: Box::new(LocalClock),
            copier: Box::new(FsCopier),
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_copier(mut self, copier: Box<dyn Copier>) -> Self {
        self.copier = copier;
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    /// Performs one backup pass. Never panics on I/O problems; every failure
    /// ends up in the report as [`TickOutcome::Failed`].
    pub fn tick(&self) -> Report {
        let mut lines = Vec::new();
        let outcome = match self.run(&mut lines) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "backup tick failed");
                lines.push(format!("backup failed: {e}"));
                TickOutcome::Failed(e)
            }
        };
        Report::new(lines, outcome)
    }

    fn run(&self, lines: &mut Vec<String>) -> Result<TickOutcome, EngineError> {
        let Some(profile) = self.detector.detect(&self.registry)? else {
            debug!("no supported game running");
            lines.push(IDLE_MESSAGE.to_string());
            return Ok(TickOutcome::Idle);
        };
        ensure_dir(&self.layout.game_backup_dir(&profile.name), lines)?;

        let artifact = locate(&self.layout, profile)?;
        let now = self.clock.now();
        let target = match plan_backup(&self.layout, &artifact, now)? {
            BackupPlan::Copy(target) => target,
            BackupPlan::Skip(reason) => {
                info!(game = %profile.name, %reason, "skipping save");
                lines.push(format!("skipping {}: {reason}", artifact.file_name()?));
                return Ok(TickOutcome::Skipped {
                    game: profile.name.clone(),
                    reason,
                });
            }
        };

        ensure_dir(&self.layout.folder_backup_dir(&profile.name, &target.folder), lines)?;

        if target.destination.exists() {
            return Err(EngineError::DestinationExists(target.destination));
        }

        let bytes = self
            .copier
            .copy(&target.source, &target.destination)
            .map_err(|source| EngineError::Copy {
                from: target.source.clone(),
                to: target.destination.clone(),
                source,
            })?;

        let copied_name = target
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        lines.push(format!("{copied_name} copied at {}", now.format("%H:%M:%S")));
        info!(
            game = %profile.name,
            destination = %target.destination.display(),
            bytes,
            "backup written"
        );

        let file_name = target
            .destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(TickOutcome::Copied(BackupRecord {
            path: target.destination,
            game: profile.name.clone(),
            folder: target.folder,
            file_name,
            created: now,
        }))
    }
}

fn ensure_dir(path: &Path, lines: &mut Vec<String>) -> Result<(), EngineError> {
    if path.is_dir() {
        return Ok(());
    }
    lines.push(format!("making {}", path.display()));
    fs::create_dir_all(path).map_err(|source| EngineError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
