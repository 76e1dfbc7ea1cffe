//! JSON shapes served by the status API.
//!
//! Every float goes out rounded to one decimal place.

use serde::{Serialize, Serializer};

use crate::risk::RiskState;
use crate::sensors::SensorSnapshot;

fn round1(v: f32) -> f64 {
    (f64::from(v) * 10.0).round() / 10.0
}

fn ser_round1<S: Serializer>(v: &f32, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(round1(*v))
}

fn ser_round1_opt<S: Serializer>(v: &Option<f32>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(v) => s.serialize_some(&round1(*v)),
        None => s.serialize_none(),
    }
}

/// `GET /api/current`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CurrentStatus {
    #[serde(serialize_with = "ser_round1")]
    pub distance: f32,
    #[serde(serialize_with = "ser_round1")]
    pub temperature: f32,
    #[serde(serialize_with = "ser_round1")]
    pub humidity: f32,
    pub status: RiskState,
}

impl From<&SensorSnapshot> for CurrentStatus {
    fn from(s: &SensorSnapshot) -> Self {
        Self {
            distance: s.distance_cm(),
            temperature: s.temperature_c(),
            humidity: s.humidity_pct(),
            status: s.risk_state(),
        }
    }
}

/// One element of `GET /api/history`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HistoryEntry {
    pub timestamp: u64,
    #[serde(serialize_with = "ser_round1")]
    pub distance: f32,
    #[serde(serialize_with = "ser_round1")]
    pub temperature: f32,
    #[serde(serialize_with = "ser_round1")]
    pub humidity: f32,
    pub status: RiskState,
}

impl HistoryEntry {
    pub fn new(timestamp: u64, s: &SensorSnapshot) -> Self {
        Self {
            timestamp,
            distance: s.distance_cm(),
            temperature: s.temperature_c(),
            humidity: s.humidity_pct(),
            status: s.risk_state(),
        }
    }
}

/// `GET /api/stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HistoryStats {
    pub samples: usize,
    #[serde(serialize_with = "ser_round1_opt")]
    pub avg_distance: Option<f32>,
    #[serde(serialize_with = "ser_round1_opt")]
    pub min_temperature: Option<f32>,
    #[serde(serialize_with = "ser_round1_opt")]
    pub max_temperature: Option<f32>,
    pub critical_count: usize,
}

impl HistoryStats {
    pub fn collect<'a>(entries: impl IntoIterator<Item = &'a SensorSnapshot>) -> Self {
        let mut stats = Self::default();
        let mut distance_sum = 0.0f32;
        for s in entries {
            stats.samples += 1;
            distance_sum += s.distance_cm();
            let t = s.temperature_c();
            stats.min_temperature = Some(stats.min_temperature.map_or(t, |m| m.min(t)));
            stats.max_temperature = Some(stats.max_temperature.map_or(t, |m| m.max(t)));
            if s.risk_state() == RiskState::Critical {
                stats.critical_count += 1;
            }
        }
        if stats.samples > 0 {
            stats.avg_distance = Some(distance_sum / stats.samples as f32);
        }
        stats
    }
}
