//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements      | Connects to               |
//! |-------------|-----------------|---------------------------|
//! | `hardware`  | SensorIoPort    | ESP32 ADC1, GPIO, Ets     |
//! |             | ActuatorPort    | LED / buzzer GPIO         |
//! | `http`      | RouteRegistrar  | ESP-IDF HTTP server       |
//! | `log_sink`  | EventSink       | Serial log output         |
//! | `time`      | ClockPort       | esp_timer + SNTP clock    |
//! | `wifi`      | (none)          | ESP-IDF WiFi STA          |

pub mod hardware;
#[cfg(target_os = "espidf")]
pub mod http;
pub mod log_sink;
pub mod time;
pub mod wifi;
