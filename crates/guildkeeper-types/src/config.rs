//! Application configuration types.
//!
//! `AppConfig` represents the top-level `guildkeeper.toml`. All fields have
//! sensible defaults; the guild list doubles as the "guild catalog" -- when
//! it is empty the wizard skips the guild step entirely.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Guildkeeper service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database url. Defaults to a per-user data directory.
    #[serde(default)]
    pub database_url: Option<String>,

    /// HTTP bind address for the presentation-facing API.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Guilds members may join. Empty list = no guild step.
    #[serde(default)]
    pub guilds: Vec<String>,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub sheet: SheetConfig,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8460".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: default_bind_addr(),
            guilds: Vec::new(),
            session: SessionConfig::default(),
            sync: SyncConfig::default(),
            sheet: SheetConfig::default(),
        }
    }
}

/// Session store tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds of inactivity before a session expires.
    #[serde(default = "default_session_ttl_secs")]
    pub ttl_secs: u64,

    /// Seconds between TTL sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_session_ttl_secs() -> u64 {
    30 * 60
}

fn default_sweep_interval_secs() -> u64 {
    5 * 60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

/// Sync scheduler tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Minimum seconds between pushes. Doubles on throttling.
    #[serde(default = "default_min_interval_secs")]
    pub min_interval_secs: u64,

    /// Ceiling for the backed-off interval.
    #[serde(default = "default_max_interval_secs")]
    pub max_interval_secs: u64,

    /// Bound on a single push attempt.
    #[serde(default = "default_push_timeout_secs")]
    pub push_timeout_secs: u64,
}

fn default_min_interval_secs() -> u64 {
    30
}

fn default_max_interval_secs() -> u64 {
    300
}

fn default_push_timeout_secs() -> u64 {
    10
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            min_interval_secs: default_min_interval_secs(),
            max_interval_secs: default_max_interval_secs(),
            push_timeout_secs: default_push_timeout_secs(),
        }
    }
}

/// External roster sheet endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Endpoint receiving the full-roster replace. Pushes are disabled when
    /// unset (commits still land in storage).
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer token for the endpoint.
    #[serde(default)]
    pub token: Option<String>,
}
