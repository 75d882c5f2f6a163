//! Running-game detection.
//!
//! Reads the live process list through a [`ProcessSource`] and maps it to at
//! most one [`GameProfile`](ironback_registry::GameProfile) using registry
//! declaration order as the only tie-break. Transient enumeration failures
//! are retried under a bounded [`RetryPolicy`].

mod detector;
mod retry;
mod source;

pub use detector::GameDetector;
pub use retry::RetryPolicy;
pub use source::{ProcessEntry, ProcessSource, SystemProcesses};

/// Errors produced while detecting the running game.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    /// The process table could not be read on this attempt.
    #[error("process enumeration failed: {0}")]
    Enumeration(String),

    #[error("game detection failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },
}
