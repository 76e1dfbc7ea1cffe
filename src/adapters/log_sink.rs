//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Sampled(t) => {
                let s = &t.snapshot;
                info!(
                    "SAMPLE | d={:.1}cm | T={:.1}\u{00b0}C | H={:.1}% | {} | rain={} | alarm={} buzzer={}",
                    s.distance_cm(),
                    s.temperature_c(),
                    s.humidity_pct(),
                    s.risk_state(),
                    if t.rain_detected { "YES" } else { "no" },
                    if t.alarm_active { "armed" } else { "silenced" },
                    if t.buzzer_on { "ON" } else { "off" },
                );
            }
            AppEvent::RiskChanged { from, to } => {
                if to > from {
                    warn!("RISK | {} -> {}", from, to);
                } else {
                    info!("RISK | {} -> {}", from, to);
                }
            }
            AppEvent::RainChanged(wet) => {
                info!("RAIN | {}", if *wet { "detected" } else { "cleared" });
            }
            AppEvent::AlarmSilenced => {
                info!("ALARM | silenced");
            }
            AppEvent::Started { alarm_active } => {
                info!("START | alarm_active={}", alarm_active);
            }
        }
    }
}
