//! Scripted [`SensorIoPort`] for unit tests.
//!
//! Time only moves when a delay is requested, so edge waits and sample
//! spacing are deterministic. The echo line is a function of the time
//! since the last trigger falling edge.

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;

use crate::app::ports::{AdcChannel, SensorIoPort};
use crate::error::SensorError;

pub struct ScriptedIo {
    pub now_us: u64,
    pub trigger_high: bool,
    pub trigger_pulses: u32,
    pub adc_reads: u32,
    pub rain: bool,
    trigger_fell_at: Option<u64>,
    echo_delay_us: Option<u64>,
    echo_width_us: Option<u64>,
    temperature: VecDeque<Result<u16, SensorError>>,
    rain_adc: VecDeque<Result<u16, SensorError>>,
}

/// ~20 °C on a TMP36 at 3.3 V full scale.
const DEFAULT_TEMP_RAW: u16 = 868;
const DEFAULT_RAIN_RAW: u16 = 4000;

impl ScriptedIo {
    pub fn new() -> Self {
        Self {
            now_us: 1_000,
            trigger_high: false,
            trigger_pulses: 0,
            adc_reads: 0,
            rain: false,
            trigger_fell_at: None,
            echo_delay_us: Some(100),
            echo_width_us: Some(2332),
            temperature: VecDeque::new(),
            rain_adc: VecDeque::new(),
        }
    }

    /// `delay`: µs from trigger fall to echo rise (`None` = never rises).
    /// `width`: echo HIGH duration (`None` = never falls).
    pub fn with_echo(mut self, delay: Option<u64>, width: Option<u64>) -> Self {
        self.echo_delay_us = delay;
        self.echo_width_us = width;
        self
    }

    pub fn push_adc(&mut self, channel: AdcChannel, value: Result<u16, SensorError>) {
        match channel {
            AdcChannel::Temperature => self.temperature.push_back(value),
            AdcChannel::Rain => self.rain_adc.push_back(value),
        }
    }
}

impl DelayNs for ScriptedIo {
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

impl SensorIoPort for ScriptedIo {
    fn set_trigger(&mut self, high: bool) {
        if high && !self.trigger_high {
            self.trigger_pulses += 1;
        }
        if !high && self.trigger_high {
            self.trigger_fell_at = Some(self.now_us);
        }
        self.trigger_high = high;
    }

    fn echo_high(&mut self) -> bool {
        let (Some(fell), Some(delay)) = (self.trigger_fell_at, self.echo_delay_us) else {
            return false;
        };
        let t = self.now_us - fell;
        if t < delay {
            return false;
        }
        match self.echo_width_us {
            Some(width) => t < delay + width,
            None => true,
        }
    }

    fn rain_detected(&mut self) -> bool {
        self.rain
    }

    fn read_adc(&mut self, channel: AdcChannel) -> Result<u16, SensorError> {
        self.adc_reads += 1;
        match channel {
            AdcChannel::Temperature => self
                .temperature
                .pop_front()
                .unwrap_or(Ok(DEFAULT_TEMP_RAW)),
            AdcChannel::Rain => self.rain_adc.pop_front().unwrap_or(Ok(DEFAULT_RAIN_RAW)),
        }
    }

    fn now_us(&self) -> u64 {
        self.now_us
    }
}
