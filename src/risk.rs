//! Flood-risk classification.
//!
//! Maps a measured water distance to one of four ordered bands. The
//! sensor looks down at the water surface, so a *smaller* distance means
//! a *higher* water level:
//!
//! ```text
//!   distance (cm)   0 ──── 10 ──── 20 ──── 30 ─────────── 400
//!   band            CRITICAL  WARNING  CAUTION     NORMAL
//! ```
//!
//! Band edges belong to the more severe side (`<=` comparisons).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Severity band derived from distance. Ordered: `Normal < … < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskState {
    Normal,
    Caution,
    Warning,
    Critical,
}

impl RiskState {
    pub const ALL: [RiskState; 4] = [Self::Normal, Self::Caution, Self::Warning, Self::Critical];

    /// Wire name used in the JSON API.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Caution => "CAUTION",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }

    /// Case-insensitive parse of the wire name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for RiskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper distance bounds (inclusive) of the three alert bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub critical_cm: f32,
    pub warning_cm: f32,
    pub caution_cm: f32,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            critical_cm: 10.0,
            warning_cm: 20.0,
            caution_cm: 30.0,
        }
    }
}

impl RiskThresholds {
    /// Classify a distance. Total over `f32`: NaN falls through to `Normal`.
    pub fn classify(&self, distance_cm: f32) -> RiskState {
        if distance_cm <= self.critical_cm {
            RiskState::Critical
        } else if distance_cm <= self.warning_cm {
            RiskState::Warning
        } else if distance_cm <= self.caution_cm {
            RiskState::Caution
        } else {
            RiskState::Normal
        }
    }
}

/// Classify with the factory thresholds (10 / 20 / 30 cm).
pub fn classify(distance_cm: f32) -> RiskState {
    RiskThresholds::default().classify(distance_cm)
}
