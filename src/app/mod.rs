//! Application core: domain orchestration, zero direct I/O.
//!
//! The sampler side ([`service`]) and the HTTP side
//! ([`crate::api`]) meet only in [`state::MonitorCore`]. Everything that
//! touches hardware sits behind the traits in [`ports`].

pub mod events;
pub mod ports;
pub mod service;
pub mod state;
