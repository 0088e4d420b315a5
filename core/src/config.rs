//! Panel configuration, read from the environment at startup.
//!
//! RULE: The data source location has no built-in default. Every deployment
//! must set PANEL_DB_PATH explicitly; development placeholders never ship.

use crate::types::Period;
use serde::{Deserialize, Serialize};

/// Source table holding one row per (comuna, fiducia) pair per period.
pub const DEFAULT_TABLE: &str = "callg_control_presupuesto_comuna_fidu";
/// Reporting period of the current convocatoria.
pub const DEFAULT_PERIOD: Period = 15;
/// How long one fetched result stays fresh, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;
/// Pause between auto-refresh cycles, in seconds.
pub const DEFAULT_REFRESH_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    pub db_path:        String,
    pub table:          String,
    pub period:         Period,
    pub cache_ttl_secs: u64,
    pub refresh_secs:   u64,
}

impl PanelConfig {
    /// Read configuration from the environment.
    /// In tests, use PanelConfig::default_test().
    pub fn from_env() -> anyhow::Result<Self> {
        let db_path = std::env::var("PANEL_DB_PATH")
            .map_err(|_| anyhow::anyhow!("PANEL_DB_PATH is not set (mandatory, no default)"))?;

        Ok(Self {
            db_path,
            table: std::env::var("PANEL_TABLE").unwrap_or_else(|_| DEFAULT_TABLE.to_string()),
            period: env_parsed("PANEL_PERIOD", DEFAULT_PERIOD)?,
            cache_ttl_secs: env_parsed("PANEL_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
            refresh_secs: env_parsed("PANEL_REFRESH_SECS", DEFAULT_REFRESH_SECS)?,
        })
    }

    /// Fixed configuration for tests: in-memory store, development defaults.
    pub fn default_test() -> Self {
        Self {
            db_path: ":memory:".to_string(),
            table: DEFAULT_TABLE.to_string(),
            period: DEFAULT_PERIOD,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            refresh_secs: DEFAULT_REFRESH_SECS,
        }
    }
}

/// Parse an environment variable, falling back to `default` when unset.
/// A variable that is set but invalid is a startup error, never a silent
/// fallback.
fn env_parsed<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Cannot parse {key}='{raw}': {e}")),
        Err(_) => Ok(default),
    }
}
