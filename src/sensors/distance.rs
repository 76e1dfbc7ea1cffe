//! HC-SR04 ultrasonic range finder (time of flight).
//!
//! A 10 µs trigger pulse starts a ping; the echo line then stays HIGH for
//! the round-trip time. Both echo edges are awaited with a hard timeout
//! measured against the port's monotonic clock, so a missing or stuck
//! echo bounds the cycle at `2 × timeout` instead of hanging the sampler.
//!
//! ## Timeout policy
//!
//! Timeouts never surface as errors to the caller of [`DistanceSensor::read`]:
//!
//! - no rising edge → [`DISTANCE_MIN_CM`] (a dead sensor reads as flooded)
//! - no falling edge → [`DISTANCE_MAX_CM`] (pulse longer than the range)

use log::debug;

use crate::app::ports::SensorIoPort;
use crate::error::SensorError;

pub const DISTANCE_MIN_CM: f32 = 2.0;
pub const DISTANCE_MAX_CM: f32 = 400.0;

/// Speed of sound at ~20 °C.
const SOUND_CM_PER_US: f32 = 0.0343;

const TRIGGER_SETTLE_US: u32 = 2;
const TRIGGER_PULSE_US: u32 = 10;

pub fn clamp_distance(cm: f32) -> f32 {
    cm.clamp(DISTANCE_MIN_CM, DISTANCE_MAX_CM)
}

/// Convert an echo pulse width (round trip) to a one-way distance.
pub fn pulse_to_cm(width_us: u64) -> f32 {
    (width_us as f32 / 2.0) * SOUND_CM_PER_US
}

pub struct DistanceSensor {
    timeout_us: u32,
}

impl DistanceSensor {
    pub fn new(timeout_us: u32) -> Self {
        Self { timeout_us }
    }

    /// Fail-soft read, clamped to the sensor range.
    pub fn read(&self, io: &mut impl SensorIoPort) -> f32 {
        match self.measure(io) {
            Ok(width_us) => clamp_distance(pulse_to_cm(width_us)),
            Err(e) => {
                debug!("distance: {} after {}us", e, self.timeout_us);
                match e {
                    SensorError::EchoRiseTimeout => DISTANCE_MIN_CM,
                    _ => DISTANCE_MAX_CM,
                }
            }
        }
    }

    /// Fire one ping and return the echo pulse width in microseconds.
    pub fn measure(&self, io: &mut impl SensorIoPort) -> Result<u64, SensorError> {
        io.set_trigger(false);
        io.delay_us(TRIGGER_SETTLE_US);
        io.set_trigger(true);
        io.delay_us(TRIGGER_PULSE_US);
        io.set_trigger(false);

        let rise = wait_for_echo(io, true, self.timeout_us).ok_or(SensorError::EchoRiseTimeout)?;
        let fall = wait_for_echo(io, false, self.timeout_us).ok_or(SensorError::EchoFallTimeout)?;
        Ok(fall.saturating_sub(rise))
    }
}

/// Poll the echo line until it reaches `level`, giving up after `timeout_us`.
/// Returns the timestamp at which the level was observed.
fn wait_for_echo(io: &mut impl SensorIoPort, level: bool, timeout_us: u32) -> Option<u64> {
    let start = io.now_us();
    loop {
        if io.echo_high() == level {
            return Some(io.now_us());
        }
        if io.now_us().saturating_sub(start) >= u64::from(timeout_us) {
            return None;
        }
        io.delay_us(1);
    }
}
