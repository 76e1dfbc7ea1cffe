//! TMP36 analog temperature sensor.
//!
//! Five raw samples, 10 ms apart, are averaged and converted with the
//! linear datasheet model: 500 mV at 0 °C, 10 mV per °C.
//!
//! ## Range clamp
//!
//! Readings above [`TEMP_MAX_C`] clamp to it. Readings below
//! [`TEMP_MIN_C`] snap to [`TEMP_UNDERRANGE_C`] (6 °C), not to the lower
//! bound, matching the deployed units.

use log::debug;

use crate::app::ports::{AdcChannel, SensorIoPort};

const ADC_MAX: f32 = 4095.0;
const V_REF: f32 = 3.3;
const OFFSET_V: f32 = 0.5;
const DEG_PER_V: f32 = 100.0;

pub const TEMP_MIN_C: f32 = -10.0;
pub const TEMP_MAX_C: f32 = 26.0;
pub const TEMP_UNDERRANGE_C: f32 = 6.0;

pub fn clamp_celsius(celsius: f32) -> f32 {
    if celsius < TEMP_MIN_C {
        TEMP_UNDERRANGE_C
    } else if celsius > TEMP_MAX_C {
        TEMP_MAX_C
    } else {
        celsius
    }
}

pub fn raw_to_celsius(raw: f32) -> f32 {
    let voltage = raw * V_REF / ADC_MAX;
    (voltage - OFFSET_V) * DEG_PER_V
}

pub struct TemperatureSensor {
    samples: u8,
    spacing_ms: u32,
}

impl TemperatureSensor {
    pub fn new(samples: u8, spacing_ms: u32) -> Self {
        Self {
            samples: samples.max(1),
            spacing_ms,
        }
    }

    /// Averaged, clamped reading. A failed ADC sample yields 0 °C.
    pub fn read(&self, io: &mut impl SensorIoPort) -> f32 {
        let mut sum: u32 = 0;
        for i in 0..self.samples {
            if i > 0 {
                io.delay_ms(self.spacing_ms);
            }
            match io.read_adc(AdcChannel::Temperature) {
                Ok(raw) => sum += u32::from(raw),
                Err(e) => {
                    debug!("temperature: {} on sample {}", e, i);
                    return 0.0;
                }
            }
        }
        let avg = sum as f32 / f32::from(self.samples);
        clamp_celsius(raw_to_celsius(avg))
    }
}
