//! Sampler task placement.
//!
//! The sampler busy-waits on the echo line for up to two edge timeouts
//! per cycle, so it runs on APP_CPU and leaves PRO_CPU to WiFi, lwIP and
//! the httpd workers. On ESP-IDF `std::thread` is a pthread over a
//! FreeRTOS task; `esp_pthread_set_cfg()` sets affinity, priority and
//! stack for the next spawn from the calling thread only.
//!
//! Host builds spawn an ordinary thread with the requested stack.

use core::ffi::CStr;
use std::thread::JoinHandle;

use crate::config::MonitorConfig;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// PRO_CPU: network stack and HTTP server.
    Pro = 0,
    /// APP_CPU: sampling.
    App = 1,
}

/// Where and how a task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: &'static CStr,
    pub core: Core,
    pub priority: u8,
    pub stack_kb: usize,
}

impl TaskSpec {
    /// The sampler task, sized from the monitor config.
    pub fn sampler(config: &MonitorConfig) -> Self {
        Self {
            name: c"sampler",
            core: Core::App,
            priority: config.sampler_priority,
            stack_kb: config.sampler_stack_kb,
        }
    }

    fn label(&self) -> &'static str {
        self.name.to_str().unwrap_or("task")
    }
}

#[cfg(target_os = "espidf")]
pub fn spawn_pinned(spec: TaskSpec, f: impl FnOnce() + Send + 'static) -> Result<JoinHandle<()>, Error> {
    // SAFETY: the IDF helper fully initialises `cfg`; `spec.name` is a
    // 'static C string, so the pointer outlives the task.
    unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = spec.core as i32;
        cfg.prio = i32::from(spec.priority);
        cfg.stack_size = (spec.stack_kb * 1024) as i32;
        cfg.thread_name = spec.name.as_ptr();
        if esp_idf_sys::esp_pthread_set_cfg(&cfg) != esp_idf_sys::ESP_OK as i32 {
            return Err(Error::Init("esp_pthread_set_cfg"));
        }
    }

    log::info!(
        "task '{}' on {:?}, pri {}, {} KB stack",
        spec.label(),
        spec.core,
        spec.priority,
        spec.stack_kb
    );
    std::thread::Builder::new()
        .name(spec.label().into())
        .spawn(f)
        .map_err(|_| Error::Init("task spawn"))
}

#[cfg(not(target_os = "espidf"))]
pub fn spawn_pinned(spec: TaskSpec, f: impl FnOnce() + Send + 'static) -> Result<JoinHandle<()>, Error> {
    log::info!("task '{}' (host, unpinned), {} KB stack", spec.label(), spec.stack_kb);
    std::thread::Builder::new()
        .name(spec.label().into())
        .stack_size(spec.stack_kb * 1024)
        .spawn(f)
        .map_err(|_| Error::Init("task spawn"))
}
