use std::fmt;

use ironback_saves::SkipReason;

use crate::EngineError;
use crate::record::BackupRecord;

/// What a tick ended up doing.
#[derive(Debug)]
pub enum TickOutcome {
    /// No supported game is running.
    Idle,
    /// A game was found but its newest save is deliberately not backed up.
    Skipped { game: String, reason: SkipReason },
    /// A new backup was written.
    Copied(BackupRecord),
    /// The tick stopped on an error. Directories created before the error
    /// are left in place.
    Failed(EngineError),
}

/// Human-readable log of one tick plus its outcome.
#[derive(Debug)]
pub struct Report {
    lines: Vec<String>,
    outcome: TickOutcome,
}

impl Report {
    pub(crate) fn new(lines: Vec<String>, outcome: TickOutcome) -> Self {
        Self { lines, outcome }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn outcome(&self) -> &TickOutcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> TickOutcome {
        self.outcome
    }

    /// The new backup, if this tick wrote one.
    pub fn copied(&self) -> Option<&BackupRecord> {
        match &self.outcome {
            TickOutcome::Copied(record) => Some(record),
            _ => None,
        }
    }

    /// The error that ended the tick, if any.
    pub fn error(&self) -> Option<&EngineError> {
        match &self.outcome {
            TickOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// All lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
