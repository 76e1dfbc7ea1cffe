//! Floodwatch Firmware: Main Entry Point
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                     │
//! │                                                               │
//! │  HardwareSensorIo   HardwareActuators   LogEventSink          │
//! │  (SensorIoPort)     (ActuatorPort)      (EventSink)           │
//! │  EspRouteRegistrar  Esp32TimeAdapter    WifiStation           │
//! │  (RouteRegistrar)   (ClockPort)                               │
//! │                                                               │
//! │  ──────────────── Port Trait Boundary ───────────────────     │
//! │                                                               │
//! │   MonitorService ──▶ MonitorCore (Arc) ◀── StatusApi          │
//! │   (sampler thread)   state·history·LEDs    (HTTP handlers)    │
//! └───────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sntp::EspSntp;
use log::{error, info, warn};

use floodwatch::adapters::hardware::{HardwareActuators, HardwareSensorIo};
use floodwatch::adapters::http::{EspRouteRegistrar, start_server};
use floodwatch::adapters::log_sink::LogEventSink;
use floodwatch::adapters::time::Esp32TimeAdapter;
use floodwatch::adapters::wifi::{WifiCredentials, WifiStation};
use floodwatch::api::StatusApi;
use floodwatch::app::ports::ActuatorPort;
use floodwatch::app::service::MonitorService;
use floodwatch::app::state::MonitorCore;
use floodwatch::config::MonitorConfig;
use floodwatch::drivers::indicators::Indicators;
use floodwatch::drivers::task_pin::{TaskSpec, spawn_pinned};
use floodwatch::drivers::hw_init;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Floodwatch v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = MonitorConfig::default();
    config.validate()?;

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Without ADC/GPIO there is nothing to monitor; halt and let
        // the task watchdog reset the board.
        error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let mut actuators = HardwareActuators::new(Indicators::new());
    actuators.all_off();

    // ── 3. Network ────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let creds = WifiCredentials::from_build_env()?;
    let mut wifi = WifiStation::connect(peripherals.modem, sysloop, nvs, &creds)?;
    // Kept alive for the lifetime of main; history timestamps fall back
    // to uptime until the first sync lands.
    let _sntp = match EspSntp::new_default() {
        Ok(sntp) => Some(sntp),
        Err(e) => {
            warn!("SNTP start failed ({}), timestamps will be uptime-based", e);
            None
        }
    };

    // ── 4. Shared core + status API ───────────────────────────
    let core = Arc::new(MonitorCore::new(actuators));
    let clock = Arc::new(Esp32TimeAdapter::new());
    let api = Arc::new(StatusApi::new(
        Arc::clone(&core),
        clock,
        config.history_spacing_ms,
    ));

    let mut server = start_server(config.http_port)?;
    api.mount(&mut EspRouteRegistrar::new(&mut server))?;

    // ── 5. Sampler thread (App core) ──────────────────────────
    let mut service = MonitorService::new(&config, Arc::clone(&core));
    let _sampler = spawn_pinned(TaskSpec::sampler(&config), move || {
        let mut io = HardwareSensorIo::new();
        let mut sink = LogEventSink::new();
        service.start(&mut sink);
        service.run(&mut io, &mut sink);
    })?;

    // ── 6. Link supervision ───────────────────────────────────
    // `server` and `_sntp` must outlive this loop; it never returns.
    loop {
        let wait_secs = wifi.maintain();
        FreeRtos::delay_ms(wait_secs * 1_000);
    }
}
