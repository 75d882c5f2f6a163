use std::collections::HashSet;

use ironback_registry::{GameProfile, GameRegistry};
use tracing::{debug, info, warn};

use crate::DetectError;
use crate::retry::RetryPolicy;
use crate::source::{ProcessEntry, ProcessSource};

/// Finds the currently running supported game.
pub struct GameDetector {
    source: Box<dyn ProcessSource>,
    retry: RetryPolicy,
}

impl GameDetector {
    /// Creates a detector with the default retry policy.
    pub fn new(source: Box<dyn ProcessSource>) -> Self {
        Self {
            source,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Returns the first profile, in registry order, with a running process.
    ///
    /// `Ok(None)` is the normal idle state. Enumeration failures are retried
    /// up to the policy's attempt cap, sleeping between attempts.
    pub fn detect<'r>(
        &self,
        registry: &'r GameRegistry,
    ) -> Result<Option<&'r GameProfile>, DetectError> {
        let attempts = self.retry.attempts();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match self.source.snapshot() {
                Ok(processes) => return Ok(match_first(registry, &processes)),
                Err(e) if attempt >= attempts => {
                    warn!(attempt, error = %e, "giving up on game detection");
                    return Err(DetectError::RetriesExhausted {
                        attempts: attempt,
                        last: e.to_string(),
                    });
                }
                Err(e) => {
                    let delay = self.retry.delay_after(attempt);
                    warn!(
                        attempt,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "issue detecting the current game, retrying"
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                }
            }
        }
    }
}

/// Matches a snapshot against the registry; registry order decides ties.
fn match_first<'r>(
    registry: &'r GameRegistry,
    processes: &[ProcessEntry],
) -> Option<&'r GameProfile> {
    let mut running = HashSet::with_capacity(processes.len());
    for entry in processes {
        match &entry.name {
            Some(name) => {
                running.insert(name.as_str());
            }
            None => debug!(pid = entry.pid, "access denied to process, skipping"),
        }
    }

    let found = registry
        .iter()
        .find(|profile| profile.processes.iter().any(|p| running.contains(p.as_str())));

    match found {
        Some(profile) => debug!(game = %profile.name, "detected running game"),
        None => info!(
            checked = processes.len(),
            "all processes checked, no supported game running"
        ),
    }
    found
}
