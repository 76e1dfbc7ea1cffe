//! Floodwatch firmware library.
//!
//! Exposes the domain and adapter modules for the binary and for
//! integration testing. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod actuation;
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod history;
pub mod risk;
pub mod sensors;

mod pins;

pub mod adapters;
pub mod drivers;
