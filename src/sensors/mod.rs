//! Sensor subsystem: individual drivers and the aggregating [`SensorSampler`].
//!
//! The sampler owns every sensor driver and produces one [`SensorSnapshot`]
//! per cycle. Individual read failures never propagate: each driver
//! substitutes a boundary or default value and logs at `debug`.

pub mod distance;
pub mod humidity;
pub mod temperature;

#[cfg(test)]
pub(crate) mod mock;

use crate::app::ports::SensorIoPort;
use crate::config::MonitorConfig;
use crate::risk::{RiskState, RiskThresholds};
use distance::{DistanceSensor, DISTANCE_MAX_CM, clamp_distance};
use humidity::{CalibrationWindow, HumiditySensor};
use temperature::{TemperatureSensor, clamp_celsius};

/// One immutable bundle of readings plus the risk derived from distance.
///
/// Fields are private: the only way to build a snapshot is through
/// [`SensorSnapshot::new`], which clamps every reading into its domain
/// and classifies the distance, so `risk_state` can never disagree with
/// `distance_cm`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSnapshot {
    distance_cm: f32,
    temperature_c: f32,
    humidity_pct: f32,
    risk_state: RiskState,
}

impl SensorSnapshot {
    pub fn new(
        distance_cm: f32,
        temperature_c: f32,
        humidity_pct: f32,
        thresholds: &RiskThresholds,
    ) -> Self {
        let distance_cm = clamp_distance(distance_cm);
        Self {
            distance_cm,
            temperature_c: clamp_celsius(temperature_c),
            humidity_pct: humidity_pct.clamp(0.0, 100.0),
            risk_state: thresholds.classify(distance_cm),
        }
    }

    /// Distance to the water surface, in [2, 400] cm.
    pub fn distance_cm(&self) -> f32 {
        self.distance_cm
    }

    /// Temperature, in [-10, 26] °C.
    pub fn temperature_c(&self) -> f32 {
        self.temperature_c
    }

    /// Rain-plate wetness in [0, 100] %. Reported as "humidity".
    pub fn humidity_pct(&self) -> f32 {
        self.humidity_pct
    }

    pub fn risk_state(&self) -> RiskState {
        self.risk_state
    }
}

impl Default for SensorSnapshot {
    /// Nothing in range: maximum distance, everything else zero.
    fn default() -> Self {
        Self::new(DISTANCE_MAX_CM, 0.0, 0.0, &RiskThresholds::default())
    }
}

/// Output of one sampling cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleCycle {
    pub snapshot: SensorSnapshot,
    /// Level of the rain comparator line at the end of the cycle.
    pub rain_detected: bool,
}

/// Aggregates all sensor drivers and produces a unified snapshot.
pub struct SensorSampler {
    distance: DistanceSensor,
    temperature: TemperatureSensor,
    humidity: HumiditySensor,
    thresholds: RiskThresholds,
}

impl SensorSampler {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            distance: DistanceSensor::new(config.echo_timeout_us),
            temperature: TemperatureSensor::new(
                config.temperature_samples,
                config.temperature_sample_spacing_ms,
            ),
            humidity: HumiditySensor::new(config.humidity_dry_band),
            thresholds: config.thresholds,
        }
    }

    /// Run the three independent reads and classify.
    pub fn sample(&mut self, io: &mut impl SensorIoPort) -> SampleCycle {
        let distance_cm = self.distance.read(io);
        let temperature_c = self.temperature.read(io);
        let humidity_pct = self.humidity.read(io);
        let rain_detected = io.rain_detected();

        SampleCycle {
            snapshot: SensorSnapshot::new(
                distance_cm,
                temperature_c,
                humidity_pct,
                &self.thresholds,
            ),
            rain_detected,
        }
    }

    /// Running min/max of the rain ADC seen so far.
    pub fn calibration(&self) -> CalibrationWindow {
        self.humidity.window()
    }
}
