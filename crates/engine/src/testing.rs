//! Test doubles shared by the engine's unit tests.

use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, UNIX_EPOCH};

use chrono::{NaiveDate, NaiveDateTime};
use ironback_detector::{DetectError, ProcessEntry, ProcessSource};

use crate::clock::Clock;
use crate::copier::Copier;

/// Builds a local time from `DD MM YY hh mm ss` (years 20YY).
pub(crate) fn at(day: u32, month: u32, year: i32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000 + year, month, day)
        .and_then(|d| d.and_hms_opt(h, m, s))
        .unwrap()
}

pub(crate) fn set_mtime(path: &Path, secs: u64) {
    let f = std::fs::File::open(path).unwrap();
    f.set_modified(UNIX_EPOCH + Duration::from_secs(secs)).unwrap();
}

/// Fixed process table.
pub(crate) struct StaticProcesses(Vec<ProcessEntry>);

impl StaticProcesses {
    pub(crate) fn new(names: &[&str]) -> Self {
        Self(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| ProcessEntry::named(i as u32 + 1, *n))
                .collect(),
        )
    }
}

impl ProcessSource for StaticProcesses {
    fn snapshot(&self) -> Result<Vec<ProcessEntry>, DetectError> {
        Ok(self.0.clone())
    }
}

/// Process table that can never be read.
pub(crate) struct FailingProcesses;

impl ProcessSource for FailingProcesses {
    fn snapshot(&self) -> Result<Vec<ProcessEntry>, DetectError> {
        Err(DetectError::Enumeration("access denied".into()))
    }
}

/// Clock that hands out scripted instants, repeating the last one.
pub(crate) struct StepClock {
    times: Mutex<VecDeque<NaiveDateTime>>,
    last: Mutex<NaiveDateTime>,
}

impl StepClock {
    pub(crate) fn fixed(t: NaiveDateTime) -> Self {
        Self::sequence(&[t])
    }

    pub(crate) fn sequence(times: &[NaiveDateTime]) -> Self {
        Self {
            last: Mutex::new(times[0]),
            times: Mutex::new(times.iter().copied().collect()),
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> NaiveDateTime {
        let mut last = self.last.lock().unwrap();
        if let Some(t) = self.times.lock().unwrap().pop_front() {
            *last = t;
        }
        *last
    }
}

/// Copier whose every copy fails.
pub(crate) struct FailingCopier;

impl Copier for FailingCopier {
    fn copy(&self, _from: &Path, _to: &Path) -> io::Result<u64> {
        Err(io::Error::other("disk full"))
    }
}
