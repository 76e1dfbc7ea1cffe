//! Indicator mapping: risk, rain and alarm flag to LED/buzzer levels.
//!
//! | rain | risk               | LED    | buzzer          |
//! |------|--------------------|--------|-----------------|
//! | yes  | any                | red    | off             |
//! | no   | Critical           | red    | on iff alarm    |
//! | no   | Warning            | yellow | off             |
//! | no   | Caution / Normal   | green  | off             |
//!
//! `Caution` has no indicator of its own; it shares green with `Normal`.

use crate::risk::RiskState;

/// One of the three indicator LEDs. Exactly one is lit at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Led {
    Red,
    Yellow,
    Green,
}

/// Resolved output levels for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorOutputs {
    pub led: Led,
    pub buzzer: bool,
}

impl IndicatorOutputs {
    pub fn red(&self) -> bool {
        self.led == Led::Red
    }

    pub fn yellow(&self) -> bool {
        self.led == Led::Yellow
    }

    pub fn green(&self) -> bool {
        self.led == Led::Green
    }
}

/// Pure mapping, no side effects.
pub fn resolve(risk: RiskState, rain_detected: bool, alarm_active: bool) -> IndicatorOutputs {
    if rain_detected {
        return IndicatorOutputs {
            led: Led::Red,
            buzzer: false,
        };
    }
    match risk {
        RiskState::Critical => IndicatorOutputs {
            led: Led::Red,
            buzzer: alarm_active,
        },
        RiskState::Warning => IndicatorOutputs {
            led: Led::Yellow,
            buzzer: false,
        },
        RiskState::Caution | RiskState::Normal => IndicatorOutputs {
            led: Led::Green,
            buzzer: false,
        },
    }
}
