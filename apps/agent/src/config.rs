//! Agent configuration management.
//!
//! Configuration is stored as TOML in the platform config directory:
//! - Linux: `~/.config/ironback/agent.toml`
//! - Windows: `%APPDATA%/ironback/agent.toml`
//! - macOS: `~/Library/Application Support/ironback/agent.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use ironback_detector::RetryPolicy;
use ironback_registry::{GameProfile, GameRegistry};
use ironback_saves::Layout;
use serde::{Deserialize, Serialize};

/// Longest accepted tick interval: one week.
pub const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root holding `<game>/save games` (the Paradox Interactive folder).
    #[serde(default = "default_working_root")]
    pub working_root: PathBuf,

    /// Backup store; `<working_root>/Ironman Backup` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_root: Option<PathBuf>,

    /// Minutes between backup ticks.
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,

    /// Attempts at reading the process list before a tick gives up.
    #[serde(default = "default_detect_attempts")]
    pub detect_attempts: u32,

    /// Extra games, checked after the built-in ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub games: Vec<GameProfile>,
}

fn default_working_root() -> PathBuf {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_default()
        .join("Paradox Interactive")
}

fn default_interval_minutes() -> u64 {
    5
}

fn default_detect_attempts() -> u32 {
    RetryPolicy::default().max_attempts
}

impl Default for Config {
    fn default() -> Self {
        Self {
            working_root: default_working_root(),
            backup_root: None,
            interval_minutes: default_interval_minutes(),
            detect_attempts: default_detect_attempts(),
            games: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Loads configuration from `path`, writing defaults there if the file
    /// does not exist yet.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str::<Config>(&content)
                .with_context(|| format!("parsing {}", path.display()))?
        } else {
            let config = Config::default();
            config.save_to(path)?;
            config
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // Restrict permissions on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_INTERVAL_MINUTES).contains(&self.interval_minutes) {
            bail!(
                "interval_minutes must be between 1 and {MAX_INTERVAL_MINUTES}, got {}",
                self.interval_minutes
            );
        }
        if self.detect_attempts == 0 {
            bail!("detect_attempts must be at least 1");
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    pub fn layout(&self) -> Layout {
        let layout = Layout::new(&self.working_root);
        match &self.backup_root {
            Some(root) => layout.with_backup_root(root),
            None => layout,
        }
    }

    /// Built-in games followed by the configured extras.
    pub fn registry(&self) -> GameRegistry {
        GameRegistry::paradox().with_extra(self.games.iter().cloned())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.detect_attempts,
            ..RetryPolicy::default()
        }
    }
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> anyhow::Result<PathBuf> {
    let dir = dirs::config_dir().context("no configuration directory on this platform")?;
    Ok(dir.join("ironback").join("agent.toml"))
}
