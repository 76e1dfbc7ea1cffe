//! Monitor service: the sampling side of the hexagon.
//!
//! [`MonitorService`] owns the sensor drivers and a handle to the shared
//! [`MonitorCore`]. Each tick it samples, publishes (which also drives
//! the indicators and appends to history), then reports what changed.
//!
//! ```text
//!  SensorIoPort ──▶ ┌────────────────────┐ ──▶ EventSink
//!                   │   MonitorService    │
//!                   └─────────┬──────────┘
//!                             ▼
//!                    MonitorCore (Arc) ──▶ ActuatorPort
//!                             ▲
//!                       StatusApi (HTTP)
//! ```

use std::sync::Arc;

use log::info;

use crate::config::MonitorConfig;
use crate::sensors::SensorSampler;

use super::events::{AppEvent, Telemetry};
use super::ports::{ActuatorPort, EventSink, SensorIoPort};
use super::state::MonitorCore;

pub struct MonitorService<A: ActuatorPort> {
    sampler: SensorSampler,
    core: Arc<MonitorCore<A>>,
    period_ms: u32,
    last_rain: bool,
    last_alarm: bool,
    tick_count: u64,
}

impl<A: ActuatorPort> MonitorService<A> {
    /// Does not arm the alarm; call [`start`](Self::start) next.
    pub fn new(config: &MonitorConfig, core: Arc<MonitorCore<A>>) -> Self {
        Self {
            sampler: SensorSampler::new(config),
            core,
            period_ms: config.sample_period_ms,
            last_rain: false,
            last_alarm: false,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Arm the alarm. Called once, before the first tick.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.core.arm_alarm();
        self.last_alarm = true;
        sink.emit(&AppEvent::Started { alarm_active: true });
        info!("MonitorService started, period {} ms", self.period_ms);
    }

    /// One sampling cycle.
    pub fn tick(&mut self, io: &mut impl SensorIoPort, sink: &mut impl EventSink) -> Telemetry {
        self.tick_count += 1;

        let cycle = self.sampler.sample(io);
        let published = self.core.publish(cycle.snapshot, cycle.rain_detected);

        let from = published.previous.risk_state();
        let to = cycle.snapshot.risk_state();
        if from != to {
            sink.emit(&AppEvent::RiskChanged { from, to });
        }

        if cycle.rain_detected != self.last_rain {
            self.last_rain = cycle.rain_detected;
            sink.emit(&AppEvent::RainChanged(cycle.rain_detected));
        }

        if self.last_alarm && !published.alarm_active {
            sink.emit(&AppEvent::AlarmSilenced);
        }
        self.last_alarm = published.alarm_active;

        let telemetry = Telemetry {
            snapshot: cycle.snapshot,
            rain_detected: cycle.rain_detected,
            alarm_active: published.alarm_active,
            buzzer_on: published.outputs.buzzer,
        };
        sink.emit(&AppEvent::Sampled(telemetry));
        telemetry
    }

    /// Sample forever at the configured period. There is no stop path;
    /// the sampler ends with the device.
    pub fn run(&mut self, io: &mut impl SensorIoPort, sink: &mut impl EventSink) -> ! {
        loop {
            let started = io.now_us();
            self.tick(io, sink);
            let elapsed_ms = io.now_us().saturating_sub(started) / 1_000;
            let remaining = u64::from(self.period_ms).saturating_sub(elapsed_ms);
            io.delay_ms(remaining as u32);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn sampler(&self) -> &SensorSampler {
        &self.sampler
    }

    pub fn core(&self) -> &Arc<MonitorCore<A>> {
        &self.core
    }
}
