//! WiFi station-mode adapter.
//!
//! Credentials come from the build environment (`WIFI_SSID`,
//! `WIFI_PASS`) and are validated before the driver is touched.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: [`WifiStation`] wraps `BlockingWifi<EspWifi>`.
//! - **all targets**: validation and the reconnect [`Backoff`] are pure
//!   and host-tested.
//!
//! ## Reconnection policy
//!
//! On disconnect the station waits an exponential backoff (2 s → 4 s →
//! 8 s … capped at 60 s) before retrying.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
        }
    }
}

impl std::error::Error for ConnectivityError {}

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl WifiCredentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConnectivityError> {
        if ssid.is_empty() || !is_printable_ascii(ssid) {
            return Err(ConnectivityError::InvalidSsid);
        }
        if !password.is_empty() && password.len() < 8 {
            return Err(ConnectivityError::InvalidPassword);
        }
        Ok(Self {
            ssid: ssid.try_into().map_err(|_| ConnectivityError::InvalidSsid)?,
            password: password
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
        })
    }

    /// Credentials baked in at compile time.
    pub fn from_build_env() -> Result<Self, ConnectivityError> {
        let ssid = option_env!("WIFI_SSID").ok_or(ConnectivityError::NoCredentials)?;
        Self::new(ssid, option_env!("WIFI_PASS").unwrap_or(""))
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

// ───────────────────────────────────────────────────────────────
// Reconnect backoff
// ───────────────────────────────────────────────────────────────

const MIN_BACKOFF_SECS: u32 = 2;
const MAX_BACKOFF_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    next_secs: u32,
    attempt: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            next_secs: MIN_BACKOFF_SECS,
            attempt: 0,
        }
    }
}

impl Backoff {
    /// Delay before the next attempt, doubling up to the cap.
    pub fn next_delay_secs(&mut self) -> u32 {
        let delay = self.next_secs;
        self.next_secs = (self.next_secs * 2).min(MAX_BACKOFF_SECS);
        self.attempt += 1;
        delay
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

// ───────────────────────────────────────────────────────────────
// Station (ESP-IDF)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use station::WifiStation;

#[cfg(target_os = "espidf")]
mod station {
    use esp_idf_hal::modem::Modem;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::{info, warn};

    use super::{Backoff, ConnectivityError, WifiCredentials};

    pub struct WifiStation {
        wifi: BlockingWifi<EspWifi<'static>>,
        backoff: Backoff,
    }

    impl WifiStation {
        /// Bring the station up and block until the netif has an address.
        pub fn connect(
            modem: Modem,
            sysloop: EspSystemEventLoop,
            nvs: EspDefaultNvsPartition,
            creds: &WifiCredentials,
        ) -> Result<Self, ConnectivityError> {
            let fail = |_| ConnectivityError::ConnectionFailed;
            let driver = EspWifi::new(modem, sysloop.clone(), Some(nvs)).map_err(fail)?;
            let mut wifi = BlockingWifi::wrap(driver, sysloop).map_err(fail)?;

            let auth_method = if creds.is_open() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            };
            wifi.set_configuration(&Configuration::Client(ClientConfiguration {
                ssid: creds
                    .ssid()
                    .try_into()
                    .map_err(|_| ConnectivityError::InvalidSsid)?,
                password: creds
                    .password()
                    .try_into()
                    .map_err(|_| ConnectivityError::InvalidPassword)?,
                auth_method,
                ..Default::default()
            }))
            .map_err(fail)?;

            wifi.start().map_err(fail)?;
            info!("wifi: connecting to {}", creds.ssid());
            wifi.connect().map_err(fail)?;
            wifi.wait_netif_up().map_err(fail)?;

            if let Ok(ip) = wifi.wifi().sta_netif().get_ip_info() {
                info!("wifi: connected, ip {}", ip.ip);
            }
            Ok(Self {
                wifi,
                backoff: Backoff::default(),
            })
        }

        pub fn is_connected(&self) -> bool {
            self.wifi.is_connected().unwrap_or(false)
        }

        /// Reconnect if the link dropped. Returns the delay to wait before
        /// the next call.
        pub fn maintain(&mut self) -> u32 {
            if self.is_connected() {
                self.backoff.reset();
                return MAINTAIN_INTERVAL_SECS;
            }
            warn!("wifi: link lost, reconnect attempt {}", self.backoff.attempt() + 1);
            match self.wifi.connect().and_then(|()| self.wifi.wait_netif_up()) {
                Ok(()) => {
                    info!("wifi: reconnected");
                    self.backoff.reset();
                    MAINTAIN_INTERVAL_SECS
                }
                Err(e) => {
                    warn!("wifi: reconnect failed: {}", e);
                    self.backoff.next_delay_secs()
                }
            }
        }
    }

    const MAINTAIN_INTERVAL_SECS: u32 = 5;
}
