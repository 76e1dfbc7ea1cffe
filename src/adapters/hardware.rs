//! Hardware adapters: bridge real peripherals to the domain ports.
//!
//! [`HardwareSensorIo`] implements [`SensorIoPort`] for the sampler
//! thread; [`HardwareActuators`] implements [`ActuatorPort`] and lives
//! inside the shared core. These are the only types in the system that
//! touch pins. On non-espidf targets the underlying `hw_init` accessors
//! are cfg-gated simulation stubs.

use embedded_hal::delay::DelayNs;

use crate::actuation::Led;
use crate::app::ports::{ActuatorPort, AdcChannel, SensorIoPort};
use crate::drivers::hw_init;
use crate::drivers::indicators::Indicators;
use crate::error::SensorError;
use crate::pins;

/// Raw GPIO/ADC access for the sensors.
pub struct HardwareSensorIo;

impl HardwareSensorIo {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HardwareSensorIo {
    fn default() -> Self {
        Self::new()
    }
}

// ── Delays ────────────────────────────────────────────────────
//
// Sub-millisecond waits busy-spin (trigger pulse, edge polling);
// millisecond waits yield to the scheduler.

#[cfg(target_os = "espidf")]
impl DelayNs for HardwareSensorIo {
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_hal::delay::Ets::delay_us(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        esp_idf_hal::delay::Ets::delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for HardwareSensorIo {
    fn delay_ns(&mut self, ns: u32) {
        let until = hw_init::now_us() + u64::from(ns.div_ceil(1_000));
        while hw_init::now_us() < until {
            core::hint::spin_loop();
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}

// ── SensorIoPort implementation ───────────────────────────────

impl SensorIoPort for HardwareSensorIo {
    fn set_trigger(&mut self, high: bool) {
        hw_init::gpio_write(pins::TRIGGER_GPIO, high);
    }

    fn echo_high(&mut self) -> bool {
        hw_init::gpio_read(pins::ECHO_GPIO)
    }

    fn rain_detected(&mut self) -> bool {
        // comparator pulls LOW when the plate is wet
        !hw_init::gpio_read(pins::RAIN_DIGITAL_GPIO)
    }

    fn read_adc(&mut self, channel: AdcChannel) -> Result<u16, SensorError> {
        match channel {
            AdcChannel::Temperature => hw_init::adc1_read(hw_init::ADC1_CH_TEMP),
            AdcChannel::Rain => hw_init::adc1_read(hw_init::ADC1_CH_RAIN),
        }
    }

    fn now_us(&self) -> u64 {
        hw_init::now_us()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

pub struct HardwareActuators {
    indicators: Indicators,
}

impl HardwareActuators {
    pub fn new(indicators: Indicators) -> Self {
        Self { indicators }
    }

    pub fn indicators(&self) -> &Indicators {
        &self.indicators
    }
}

impl ActuatorPort for HardwareActuators {
    fn set_led(&mut self, led: Led) {
        self.indicators.set_led(led);
    }

    fn set_buzzer(&mut self, on: bool) {
        self.indicators.set_buzzer(on);
    }

    fn all_off(&mut self) {
        self.indicators.off();
    }
}
