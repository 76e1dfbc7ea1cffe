//! Rain-plate wetness, reported as "humidity".
//!
//! The FC-37 plate's analog output falls as it gets wetter. With no
//! factory calibration, the driver keeps a running min/max of every raw
//! sample it has seen and rescales into 0–100 % against that window:
//! the driest value seen reads 0 %, the wettest 100 %.
//!
//! The window is never reset; it only widens.

use log::debug;

use crate::app::ports::{AdcChannel, SensorIoPort};

/// Running `(min, max)` of raw ADC values. Starts empty (`min > max`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationWindow {
    pub min_raw: u16,
    pub max_raw: u16,
}

impl Default for CalibrationWindow {
    fn default() -> Self {
        Self {
            min_raw: u16::MAX,
            max_raw: 0,
        }
    }
}

impl CalibrationWindow {
    pub fn observe(&mut self, raw: u16) {
        self.min_raw = self.min_raw.min(raw);
        self.max_raw = self.max_raw.max(raw);
    }

    pub fn is_empty(&self) -> bool {
        self.min_raw > self.max_raw
    }
}

pub struct HumiditySensor {
    window: CalibrationWindow,
    dry_band: u16,
}

impl HumiditySensor {
    pub fn new(dry_band: u16) -> Self {
        Self {
            window: CalibrationWindow::default(),
            dry_band,
        }
    }

    /// One sample. A failed ADC read yields 0 % and leaves the window alone.
    pub fn read(&mut self, io: &mut impl SensorIoPort) -> f32 {
        match io.read_adc(AdcChannel::Rain) {
            Ok(raw) => self.update(raw),
            Err(e) => {
                debug!("humidity: {}", e);
                0.0
            }
        }
    }

    /// Fold `raw` into the window and rescale it.
    pub fn update(&mut self, raw: u16) -> f32 {
        self.window.observe(raw);
        let CalibrationWindow { min_raw, max_raw } = self.window;

        if max_raw - raw <= self.dry_band || max_raw == min_raw {
            return 0.0;
        }
        let pct = 100.0 * f32::from(max_raw - raw) / f32::from(max_raw - min_raw);
        pct.clamp(0.0, 100.0)
    }

    pub fn window(&self) -> CalibrationWindow {
        self.window
    }
}
