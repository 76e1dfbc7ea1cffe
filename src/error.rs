//! Unified error types for the Floodwatch firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping
//! the top-level error handling uniform. All variants are `Copy` so they
//! can be passed through the sampler and API layers without allocation.
//!
//! ## Propagation policy
//!
//! Sensor faults never leave the sampler: a wrong-but-plausible reading
//! is reported instead (see [`crate::sensors`]). Only API-side buffer
//! exhaustion reaches a caller, as an HTTP 500.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read.
    Sensor(SensorError),
    /// A status API response could not be produced.
    Api(ApiError),
    /// Peripheral or server initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Api(e) => write!(f, "api: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC oneshot read returned an error code.
    AdcReadFailed,
    /// Echo line never went high within the edge timeout.
    EchoRiseTimeout,
    /// Echo line never went low within the edge timeout.
    EchoFallTimeout,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::EchoRiseTimeout => write!(f, "echo rise timeout"),
            Self::EchoFallTimeout => write!(f, "echo fall timeout"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// API errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// The response buffer could not be allocated.
    OutOfMemory,
    /// The response body failed to serialise.
    Serialize,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "response buffer allocation failed"),
            Self::Serialize => write!(f, "response serialisation failed"),
        }
    }
}

impl From<ApiError> for Error {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
