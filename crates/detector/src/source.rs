use sysinfo::{ProcessesToUpdate, System};

use crate::DetectError;

/// One row of a process-table snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    /// Executable basename, or `None` when the process could not be
    /// inspected (e.g. access denied).
    pub name: Option<String>,
}

impl ProcessEntry {
    pub fn named(pid: u32, name: impl Into<String>) -> Self {
        Self {
            pid,
            name: Some(name.into()),
        }
    }

    pub fn denied(pid: u32) -> Self {
        Self { pid, name: None }
    }
}

/// Abstract view of the live process list.
///
/// Production code uses [`SystemProcesses`]; tests script their own tables.
pub trait ProcessSource: Send + Sync {
    /// Takes one snapshot of the running processes.
    ///
    /// An `Err` is treated as transient and retried by the detector.
    fn snapshot(&self) -> Result<Vec<ProcessEntry>, DetectError>;
}

/// Process list backed by `sysinfo`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcesses;

impl ProcessSource for SystemProcesses {
    fn snapshot(&self) -> Result<Vec<ProcessEntry>, DetectError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(DetectError::Enumeration(
                "process listing is not supported on this platform".into(),
            ));
        }

        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);

        let entries: Vec<ProcessEntry> = system
            .processes()
            .iter()
            .map(|(pid, process)| {
                let name = process.name().to_str().filter(|n| !n.is_empty());
                ProcessEntry {
                    pid: pid.as_u32(),
                    name: name.map(str::to_string),
                }
            })
            .collect();

        // We are running ourselves, so an empty table means the scan raced
        // with process-table changes or failed silently.
        if entries.is_empty() {
            return Err(DetectError::Enumeration("empty process table".into()));
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_constructors() {
        assert_eq!(ProcessEntry::named(7, "eu4.exe").name.as_deref(), Some("eu4.exe"));
        assert_eq!(ProcessEntry::denied(8).name, None);
    }

    #[test]
    fn system_snapshot_contains_processes() {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return;
        }
        let entries = SystemProcesses.snapshot().unwrap();
        assert!(!entries.is_empty());
    }
}
