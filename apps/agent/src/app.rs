//! Scheduler loop: one backup tick now, then one per interval.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use ironback_detector::{GameDetector, SystemProcesses};
use ironback_engine::{BackupEngine, Report, TickOutcome};
use tokio::time::MissedTickBehavior;

use crate::config::Config;

/// Runs the agent until Ctrl-C.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let engine = Arc::new(build_engine(&config));
    tracing::info!(
        backup_root = %engine.layout().backup_root().display(),
        games = engine.registry().len(),
        "agent ready"
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for SIGINT: {e}");
        }
    };
    let ticks = run_until(engine, config.interval(), shutdown).await?;

    tracing::info!(ticks, "SIGINT received, shutting down");
    Ok(())
}

/// Ticks immediately, then every `period`, until `shutdown` resolves.
/// Returns the number of completed ticks.
///
/// `shutdown` is polled across iterations, so a signal that arrives during
/// a tick ends the loop once that tick is done.
async fn run_until(
    engine: Arc<BackupEngine>,
    period: Duration,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<u64> {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut ticks = 0u64;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let engine = Arc::clone(&engine);
                // Awaited here so ticks never overlap.
                let report = tokio::task::spawn_blocking(move || engine.tick()).await?;
                log_report(&report);
                ticks += 1;
            }
            _ = &mut shutdown => break,
        }
    }

    Ok(ticks)
}

fn build_engine(config: &Config) -> BackupEngine {
    let detector =
        GameDetector::new(Box::new(SystemProcesses)).with_retry(config.retry_policy());
    BackupEngine::new(Arc::new(config.registry()), config.layout(), detector)
}

fn log_report(report: &Report) {
    for line in report.lines() {
        match report.outcome() {
            TickOutcome::Failed(_) => tracing::warn!("{line}"),
            _ => tracing::info!("{line}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Mutex;

    use ironback_detector::{DetectError, ProcessEntry, ProcessSource, RetryPolicy};
    use ironback_registry::GameRegistry;
    use ironback_saves::Layout;
    use tokio::sync::oneshot;

    use super::*;

    /// Empty process table that fires a shutdown the first time it is read,
    /// i.e. in the middle of a tick.
    struct ShutdownDuringTick(Mutex<Option<oneshot::Sender<()>>>);

    impl ProcessSource for ShutdownDuringTick {
        fn snapshot(&self) -> Result<Vec<ProcessEntry>, DetectError> {
            if let Some(tx) = self.0.lock().unwrap().take() {
                let _ = tx.send(());
            }
            Ok(Vec::new())
        }
    }

    #[test]
    fn engine_uses_configured_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            working_root: tmp.path().to_path_buf(),
            backup_root: Some(tmp.path().join("elsewhere")),
            ..Config::default()
        };
        let engine = build_engine(&config);
        assert_eq!(engine.layout().backup_root(), tmp.path().join("elsewhere"));
        assert_eq!(engine.registry().len(), 7);
    }

    #[test]
    fn tick_without_games_is_idle_or_failed() {
        // The test host runs no Paradox game, so a tick never copies.
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            working_root: tmp.path().to_path_buf(),
            detect_attempts: 1,
            ..Config::default()
        };
        let report = build_engine(&config).tick();
        assert!(report.copied().is_none());
        assert!(fs::read_dir(tmp.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn shutdown_during_tick_stops_the_loop() {
        let tmp = tempfile::tempdir().unwrap();
        let (tx, rx) = oneshot::channel();
        let detector = GameDetector::new(Box::new(ShutdownDuringTick(Mutex::new(Some(tx)))))
            .with_retry(RetryPolicy::immediate(1));
        let engine = Arc::new(BackupEngine::new(
            Arc::new(GameRegistry::paradox()),
            Layout::new(tmp.path()),
            detector,
        ));

        let shutdown = async {
            let _ = rx.await;
        };
        let ticks = tokio::time::timeout(
            Duration::from_secs(10),
            run_until(engine, Duration::from_secs(3600), shutdown),
        )
        .await
        .expect("loop stopped")
        .unwrap();
        assert_eq!(ticks, 1);
    }
}
