//! LED and buzzer driver.
//!
//! Three discrete LEDs (red/yellow/green) and an active buzzer, all plain
//! digital outputs. Exactly one LED is lit at a time.
//!
//! On host/test the writes land in the `hw_init` simulation atomics.

use crate::actuation::Led;
use crate::drivers::hw_init;
use crate::pins;

pub struct Indicators {
    lit: Option<Led>,
    buzzer: bool,
}

impl Indicators {
    pub fn new() -> Self {
        Self {
            lit: None,
            buzzer: false,
        }
    }

    pub fn set_led(&mut self, led: Led) {
        hw_init::gpio_write(pins::LED_RED_GPIO, led == Led::Red);
        hw_init::gpio_write(pins::LED_YELLOW_GPIO, led == Led::Yellow);
        hw_init::gpio_write(pins::LED_GREEN_GPIO, led == Led::Green);
        self.lit = Some(led);
    }

    pub fn set_buzzer(&mut self, on: bool) {
        hw_init::gpio_write(pins::BUZZER_GPIO, on);
        self.buzzer = on;
    }

    pub fn off(&mut self) {
        for pin in [pins::LED_RED_GPIO, pins::LED_YELLOW_GPIO, pins::LED_GREEN_GPIO] {
            hw_init::gpio_write(pin, false);
        }
        self.lit = None;
        self.set_buzzer(false);
    }

    pub fn lit(&self) -> Option<Led> {
        self.lit
    }

    pub fn buzzer_on(&self) -> bool {
        self.buzzer
    }
}

impl Default for Indicators {
    fn default() -> Self {
        Self::new()
    }
}
