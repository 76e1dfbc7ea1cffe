//! Mock hardware for integration tests.
//!
//! [`MockHardware`] records every actuator call so tests can assert on
//! the full indicator history. [`MockSensorIo`] simulates the sensor
//! lines against a virtual clock that only advances on delays.

use std::sync::{Arc, Mutex};

use embedded_hal::delay::DelayNs;
use floodwatch::actuation::Led;
use floodwatch::app::events::AppEvent;
use floodwatch::app::ports::{ActuatorPort, AdcChannel, ClockPort, EventSink, SensorIoPort};
use floodwatch::error::SensorError;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    SetLed(Led),
    SetBuzzer(bool),
    AllOff,
}

/// Cloneable handle so the test keeps a view after the core takes ownership.
#[derive(Clone, Default)]
pub struct MockHardware {
    pub calls: Arc<Mutex<Vec<ActuatorCall>>>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ActuatorCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn led(&self) -> Option<Led> {
        self.calls().iter().rev().find_map(|c| match c {
            ActuatorCall::SetLed(led) => Some(Some(*led)),
            ActuatorCall::AllOff => Some(None),
            ActuatorCall::SetBuzzer(_) => None,
        })?
    }

    pub fn buzzer_on(&self) -> bool {
        self.calls()
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetBuzzer(on) => Some(*on),
                ActuatorCall::AllOff => Some(false),
                ActuatorCall::SetLed(_) => None,
            })
            .unwrap_or(false)
    }
}

impl ActuatorPort for MockHardware {
    fn set_led(&mut self, led: Led) {
        self.calls.lock().unwrap().push(ActuatorCall::SetLed(led));
    }

    fn set_buzzer(&mut self, on: bool) {
        self.calls.lock().unwrap().push(ActuatorCall::SetBuzzer(on));
    }

    fn all_off(&mut self) {
        self.calls.lock().unwrap().push(ActuatorCall::AllOff);
    }
}

// ── Sensor lines ──────────────────────────────────────────────

const ECHO_DELAY_US: u64 = 200;

pub struct MockSensorIo {
    pub now_us: u64,
    /// Distance the echo should report; `None` = no echo at all.
    pub distance_cm: Option<f32>,
    pub rain: bool,
    pub temp_raw: Result<u16, SensorError>,
    pub rain_raw: Result<u16, SensorError>,
    trigger_high: bool,
    trigger_fell_at: Option<u64>,
}

#[allow(dead_code)]
impl MockSensorIo {
    pub fn new() -> Self {
        Self {
            now_us: 0,
            distance_cm: Some(100.0),
            rain: false,
            // ~20 °C
            temp_raw: Ok(868),
            rain_raw: Ok(4000),
            trigger_high: false,
            trigger_fell_at: None,
        }
    }

    pub fn at_distance(cm: f32) -> Self {
        Self {
            distance_cm: Some(cm),
            ..Self::new()
        }
    }

    fn echo_width_us(&self) -> Option<u64> {
        self.distance_cm
            .map(|cm| (f64::from(cm) / 0.0343 * 2.0).round() as u64)
    }
}

impl DelayNs for MockSensorIo {
    fn delay_ns(&mut self, ns: u32) {
        self.now_us += u64::from(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.now_us += u64::from(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_us += u64::from(ms) * 1_000;
    }
}

impl SensorIoPort for MockSensorIo {
    fn set_trigger(&mut self, high: bool) {
        if self.trigger_high && !high {
            self.trigger_fell_at = Some(self.now_us);
        }
        self.trigger_high = high;
    }

    fn echo_high(&mut self) -> bool {
        let (Some(fell), Some(width)) = (self.trigger_fell_at, self.echo_width_us()) else {
            return false;
        };
        let t = self.now_us - fell;
        t >= ECHO_DELAY_US && t < ECHO_DELAY_US + width
    }

    fn rain_detected(&mut self) -> bool {
        self.rain
    }

    fn read_adc(&mut self, channel: AdcChannel) -> Result<u16, SensorError> {
        match channel {
            AdcChannel::Temperature => self.temp_raw,
            AdcChannel::Rain => self.rain_raw,
        }
    }

    fn now_us(&self) -> u64 {
        self.now_us
    }
}

// ── Event sink / clock ────────────────────────────────────────

#[derive(Default)]
pub struct CollectingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for CollectingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

pub struct FixedClock(pub u64);

impl ClockPort for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}
