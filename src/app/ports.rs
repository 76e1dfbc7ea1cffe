//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService / StatusApi (domain)
//! ```
//!
//! Driven adapters (raw sensor I/O, indicators, event sinks, clocks, the
//! HTTP server) implement these traits. The domain consumes them via
//! generics, so the core never touches hardware directly.

use embedded_hal::delay::DelayNs;

use crate::actuation::Led;
use crate::api::{ApiRequest, ApiResponse, Method};
use crate::error::{Error, SensorError};

// ───────────────────────────────────────────────────────────────
// Raw sensor I/O port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Analog inputs sampled by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcChannel {
    Temperature,
    Rain,
}

/// Blocking GPIO/ADC primitives with microsecond timing.
///
/// Delays come from the [`DelayNs`] supertrait. `now_us` must be
/// monotonic; edge waits are bounded by comparing against it.
pub trait SensorIoPort: DelayNs {
    /// Drive the ultrasonic trigger line.
    fn set_trigger(&mut self, high: bool);

    /// Current level of the ultrasonic echo line.
    fn echo_high(&mut self) -> bool;

    /// Rain comparator output, already mapped to "water present".
    fn rain_detected(&mut self) -> bool;

    /// One raw 12-bit ADC sample.
    fn read_adc(&mut self, channel: AdcChannel) -> Result<u16, SensorError>;

    /// Monotonic microseconds since boot.
    fn now_us(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive indicators.
pub trait ActuatorPort {
    /// Light exactly one LED, switching the other two off.
    fn set_led(&mut self, led: Led);

    /// Switch the buzzer on or off.
    fn set_buzzer(&mut self, on: bool);

    /// All LEDs and the buzzer off.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Wall-clock source for API timestamps.
pub trait ClockPort {
    /// Milliseconds since the Unix epoch once time is synced,
    /// milliseconds since boot before that.
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// HTTP route registration (driven adapter: domain → HTTP server)
// ───────────────────────────────────────────────────────────────

/// Handler invoked once per inbound request, possibly concurrently.
pub type RouteHandler = Box<dyn Fn(&ApiRequest<'_>) -> ApiResponse + Send + Sync + 'static>;

/// The HTTP collaborator's contract: bind a handler to a method and path.
///
/// `path` may end in `*` for a wildcard match.
pub trait RouteRegistrar {
    fn register(&mut self, method: Method, path: &'static str, handler: RouteHandler)
    -> Result<(), Error>;
}
