//! Outbound application events.
//!
//! [`MonitorService`](super::service::MonitorService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Transition events are
//! edge-triggered: they fire once per change, not once per cycle.

use crate::risk::RiskState;
use crate::sensors::SensorSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Sampler armed and about to run its first cycle.
    Started { alarm_active: bool },

    /// One cycle completed.
    Sampled(Telemetry),

    RiskChanged { from: RiskState, to: RiskState },

    /// The digital rain line changed level.
    RainChanged(bool),

    /// First cycle after the alarm flag was cleared.
    AlarmSilenced,
}

/// Per-cycle telemetry: the published snapshot plus the inputs that
/// drove the indicators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    pub snapshot: SensorSnapshot,
    pub rain_detected: bool,
    pub alarm_active: bool,
    pub buzzer_on: bool,
}
