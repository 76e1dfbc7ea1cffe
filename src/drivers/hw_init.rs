//! One-shot hardware peripheral initialization and raw pin access.
//!
//! Configures the two ADC1 channels and the GPIO directions using raw
//! ESP-IDF sys calls. Called once from `main()` before the sampler and
//! the HTTP server start.
//!
//! On host targets every accessor is backed by simulation atomics that
//! tests can drive through the `sim_*` setters.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::error::SensorError;
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

pub const ADC1_CH_RAIN: u32 = pins::RAIN_ADC1_CHANNEL;
pub const ADC1_CH_TEMP: u32 = pins::TEMP_ADC1_CHANNEL;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before any other task exists.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── Monotonic clock ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn now_us() -> u64 {
    // SAFETY: read of the free-running high-resolution timer.
    (unsafe { esp_timer_get_time() }) as u64
}

#[cfg(not(target_os = "espidf"))]
pub fn now_us() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;
    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_micros() as u64
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: `ADC1_HANDLE` is written once in `init_adc()` before the
/// sampler thread is spawned; afterwards only the sampler reads it.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    // 12 dB attenuation: full 0-3.3 V input range
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    for channel in [ADC1_CH_RAIN, ADC1_CH_TEMP] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::AdcInitFailed(ret));
        }
    }

    info!("hw_init: ADC1 configured (CH6=rain, CH7=temp)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, SensorError> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, sampler thread only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed);
    }
    Ok(raw.clamp(0, 4095) as u16)
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(channel: u32) -> Result<u16, SensorError> {
    use core::sync::atomic::Ordering;
    if sim::ADC_FAIL.load(Ordering::Relaxed) {
        return Err(SensorError::AdcReadFailed);
    }
    Ok(match channel {
        ADC1_CH_TEMP => sim::TEMP_ADC.load(Ordering::Relaxed),
        _ => sim::RAIN_ADC.load(Ordering::Relaxed),
    })
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // Echo is push-pull from the HC-SR04; the rain comparator is open
    // collector and needs the pull-up.
    let inputs = [
        (pins::ECHO_GPIO, gpio_pullup_t_GPIO_PULLUP_DISABLE),
        (pins::RAIN_DIGITAL_GPIO, gpio_pullup_t_GPIO_PULLUP_ENABLE),
    ];

    for (pin, pull_up_en) in inputs {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    info!("hw_init: GPIO inputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: read-only register access on an already-configured input.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    use core::sync::atomic::Ordering;
    match pin {
        pins::ECHO_GPIO => sim::echo_level(now_us()),
        // comparator is active-low
        pins::RAIN_DIGITAL_GPIO => !sim::RAIN_DETECTED.load(Ordering::Relaxed),
        _ => false,
    }
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [
        pins::TRIGGER_GPIO,
        pins::LED_RED_GPIO,
        pins::LED_YELLOW_GPIO,
        pins::LED_GREEN_GPIO,
        pins::BUZZER_GPIO,
    ];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: write to an output configured in init_gpio_outputs().
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    sim::set_output(pin, high, now_us());
}

// ── Simulation (host only) ────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU64, Ordering};

    use crate::pins;

    /// Trigger fall to echo rise.
    const ECHO_DELAY_US: u64 = 100;

    /// Echo pulse width; 0 = no echo at all.
    pub(super) static ECHO_US: AtomicU32 = AtomicU32::new(2_332);
    pub(super) static RAIN_DETECTED: AtomicBool = AtomicBool::new(false);
    pub(super) static TEMP_ADC: AtomicU16 = AtomicU16::new(868);
    pub(super) static RAIN_ADC: AtomicU16 = AtomicU16::new(4_000);
    pub(super) static ADC_FAIL: AtomicBool = AtomicBool::new(false);

    /// Bit `n` = level of output GPIO `n`.
    pub(super) static OUTPUTS: AtomicU64 = AtomicU64::new(0);
    static TRIGGER_FELL_US: AtomicU64 = AtomicU64::new(u64::MAX);

    pub(super) fn set_output(pin: i32, high: bool, now_us: u64) {
        let bit = 1u64 << pin;
        let prev = if high {
            OUTPUTS.fetch_or(bit, Ordering::Relaxed)
        } else {
            OUTPUTS.fetch_and(!bit, Ordering::Relaxed)
        };
        if pin == pins::TRIGGER_GPIO && !high && prev & bit != 0 {
            TRIGGER_FELL_US.store(now_us, Ordering::Relaxed);
        }
    }

    pub(super) fn echo_level(now_us: u64) -> bool {
        let width = u64::from(ECHO_US.load(Ordering::Relaxed));
        let fell = TRIGGER_FELL_US.load(Ordering::Relaxed);
        if width == 0 || now_us < fell {
            return false;
        }
        let t = now_us - fell;
        t >= ECHO_DELAY_US && t < ECHO_DELAY_US + width
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_echo_us(width_us: u32) {
    sim::ECHO_US.store(width_us, core::sync::atomic::Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_rain_detected(wet: bool) {
    sim::RAIN_DETECTED.store(wet, core::sync::atomic::Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_adc(raw: u16) {
    sim::TEMP_ADC.store(raw, core::sync::atomic::Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_rain_adc(raw: u16) {
    sim::RAIN_ADC.store(raw, core::sync::atomic::Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_fail_adc(fail: bool) {
    sim::ADC_FAIL.store(fail, core::sync::atomic::Ordering::Relaxed);
}

/// Last level written to an output pin.
#[cfg(not(target_os = "espidf"))]
pub fn sim_output_level(pin: i32) -> bool {
    sim::OUTPUTS.load(core::sync::atomic::Ordering::Relaxed) & (1u64 << pin) != 0
}
