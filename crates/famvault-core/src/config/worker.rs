//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Inbox sweep worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum number of family sweeps processed concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Interval in seconds between fallback polls for pending inbox files.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Cron schedule (with seconds field) for the periodic inbox sweep.
    #[serde(default = "default_sweep_schedule")]
    pub sweep_schedule: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            concurrency: default_concurrency(),
            poll_interval_seconds: default_poll_interval(),
            sweep_schedule: default_sweep_schedule(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    4
}

fn default_poll_interval() -> u64 {
    60
}

fn default_sweep_schedule() -> String {
    // Every five minutes, on the minute.
    "0 */5 * * * *".to_string()
}
