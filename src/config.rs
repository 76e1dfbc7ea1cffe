//! System configuration parameters
//!
//! All tunable parameters for the Floodwatch monitor. Values are
//! compile-time defaults; nothing is persisted across restarts.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::risk::RiskThresholds;
use crate::sensors::distance::{DISTANCE_MAX_CM, DISTANCE_MIN_CM};

/// Core monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    // --- Sampling ---
    /// Sampler period (milliseconds)
    pub sample_period_ms: u32,
    /// Hard upper bound on each echo-edge wait (microseconds)
    pub echo_timeout_us: u32,
    /// ADC samples averaged per temperature reading
    pub temperature_samples: u8,
    /// Spacing between temperature samples (milliseconds)
    pub temperature_sample_spacing_ms: u32,
    /// Raw counts below the calibrated maximum still treated as "dry"
    pub humidity_dry_band: u16,

    // --- Classification ---
    pub thresholds: RiskThresholds,

    // --- API ---
    /// Step between synthesized history timestamps (milliseconds)
    pub history_spacing_ms: u64,
    /// HTTP listen port
    pub http_port: u16,

    // --- Sampler task ---
    pub sampler_stack_kb: usize,
    pub sampler_priority: u8,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            // Sampling
            sample_period_ms: 1000, // 1 Hz
            echo_timeout_us: 30_000,
            temperature_samples: 5,
            temperature_sample_spacing_ms: 10,
            humidity_dry_band: 100,

            // Classification
            thresholds: RiskThresholds::default(),

            // API
            history_spacing_ms: 1000,
            http_port: 80,

            // Sampler task
            sampler_stack_kb: 6,
            sampler_priority: 5,
        }
    }
}

/// Errors from [`MonitorConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}

impl MonitorConfig {
    /// Reject out-of-range values. Nothing is silently clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("sample_period_ms must be > 0"));
        }
        if self.echo_timeout_us == 0 || self.echo_timeout_us > 1_000_000 {
            return Err(ConfigError::ValidationFailed(
                "echo_timeout_us must be in 1..=1_000_000",
            ));
        }
        if self.temperature_samples == 0 {
            return Err(ConfigError::ValidationFailed("temperature_samples must be > 0"));
        }
        let t = &self.thresholds;
        if !(t.critical_cm < t.warning_cm && t.warning_cm < t.caution_cm) {
            return Err(ConfigError::ValidationFailed(
                "thresholds must be strictly increasing (critical < warning < caution)",
            ));
        }
        if t.critical_cm < DISTANCE_MIN_CM || t.caution_cm > DISTANCE_MAX_CM {
            return Err(ConfigError::ValidationFailed(
                "thresholds must lie within the sensor range",
            ));
        }
        if self.http_port == 0 {
            return Err(ConfigError::ValidationFailed("http_port must be > 0"));
        }
        Ok(())
    }
}
