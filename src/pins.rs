//! GPIO / peripheral pin assignments for the Floodwatch board (ESP32-WROOM).
//!
//! Every driver references this module rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Ultrasonic range finder (HC-SR04)
// ---------------------------------------------------------------------------

/// Digital output: 10 µs HIGH pulse starts a measurement.
pub const TRIGGER_GPIO: i32 = 5;
/// Digital input: HIGH for the round-trip time of the ping.
pub const ECHO_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// Rain sensor (FC-37 / YL-83 board)
// ---------------------------------------------------------------------------

/// Digital input from the comparator. LOW = water on the plate.
pub const RAIN_DIGITAL_GPIO: i32 = 4;
/// Analog output of the plate on GPIO 34.
pub const RAIN_ADC1_CHANNEL: u32 = 6;

// ---------------------------------------------------------------------------
// Temperature (TMP36, 10 mV/°C with 500 mV offset)
// ---------------------------------------------------------------------------

/// TMP36 output on GPIO 35.
pub const TEMP_ADC1_CHANNEL: u32 = 7;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

pub const LED_RED_GPIO: i32 = 25;
pub const LED_YELLOW_GPIO: i32 = 26;
pub const LED_GREEN_GPIO: i32 = 27;
/// Active buzzer, driven HIGH to sound.
pub const BUZZER_GPIO: i32 = 14;
