//! Status API: HTTP-facing view of the monitor.
//!
//! Transport-agnostic: handlers take an [`ApiRequest`] and return an
//! [`ApiResponse`]. The HTTP server adapter binds them to routes through
//! the [`RouteRegistrar`] port, and tests call [`StatusApi::dispatch`]
//! directly.
//!
//! | method  | path           | handler                      |
//! |---------|----------------|------------------------------|
//! | GET     | `/api/current` | [`StatusApi::current`]       |
//! | GET     | `/api/history` | [`StatusApi::history`]       |
//! | GET     | `/api/stats`   | [`StatusApi::stats`]         |
//! | POST    | `/apagar`      | [`StatusApi::silence`]       |
//! | OPTIONS | `*`            | [`StatusApi::preflight`]     |
//! | any     | anything else  | [`StatusApi::not_found`]     |
//!
//! Every response carries `Access-Control-Allow-Origin: *`.

pub mod dto;
pub mod query;

use std::sync::Arc;

use log::{info, warn};
use serde::Serialize;

use crate::app::ports::{ActuatorPort, ClockPort, RouteRegistrar};
use crate::app::state::MonitorCore;
use crate::error::{ApiError, Error};

use dto::{CurrentStatus, HistoryEntry, HistoryStats};
use query::HistoryQuery;

pub const SILENCE_CONFIRMATION: &str = "Alarmas apagadas";

/// Bytes reserved per history element before serializing.
const HISTORY_ENTRY_JSON_BYTES: usize = 96;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Options,
}

/// Borrowed view of one inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiRequest<'a> {
    pub method: Method,
    pub path: &'a str,
    /// Raw query string without the leading `?`; empty if absent.
    pub query: &'a str,
}

impl<'a> ApiRequest<'a> {
    pub fn from_uri(method: Method, uri: &'a str) -> Self {
        let (path, query) = uri.split_once('?').unwrap_or((uri, ""));
        Self {
            method,
            path,
            query,
        }
    }
}

/// Fully rendered response, ready for any transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Set only on preflight responses.
    pub preflight: bool,
}

impl ApiResponse {
    pub const ALLOW_ORIGIN: (&'static str, &'static str) = ("Access-Control-Allow-Origin", "*");
    pub const ALLOW_METHODS: (&'static str, &'static str) =
        ("Access-Control-Allow-Methods", "GET, POST, OPTIONS");
    pub const ALLOW_HEADERS: (&'static str, &'static str) =
        ("Access-Control-Allow-Headers", "Content-Type");

    pub fn json(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body,
            preflight: false,
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.as_bytes().to_vec(),
            preflight: false,
        }
    }

    /// Every header to send, CORS included.
    pub fn headers(&self) -> heapless::Vec<(&'static str, &'static str), 4> {
        let all = [
            ("Content-Type", self.content_type),
            Self::ALLOW_ORIGIN,
            Self::ALLOW_METHODS,
            Self::ALLOW_HEADERS,
        ];
        let n = if self.preflight { 4 } else { 2 };
        all.into_iter().take(n).collect()
    }

    pub fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            204 => "No Content",
            404 => "Not Found",
            _ => "Internal Server Error",
        }
    }

    pub fn body_str(&self) -> &str {
        core::str::from_utf8(&self.body).unwrap_or("")
    }
}

impl From<ApiError> for ApiResponse {
    fn from(e: ApiError) -> Self {
        warn!("api: {}", e);
        Self::text(500, "Internal Server Error")
    }
}

/// Serialize into a freshly reserved buffer. Reservation failure is the
/// one error the API surfaces to callers.
fn to_json<T: Serialize + ?Sized>(value: &T, capacity: usize) -> Result<Vec<u8>, ApiError> {
    let mut buf = Vec::new();
    buf.try_reserve(capacity).map_err(|_| ApiError::OutOfMemory)?;
    serde_json::to_writer(&mut buf, value).map_err(|_| ApiError::Serialize)?;
    Ok(buf)
}

pub struct StatusApi<A: ActuatorPort> {
    core: Arc<MonitorCore<A>>,
    clock: Arc<dyn ClockPort + Send + Sync>,
    history_spacing_ms: u64,
}

impl<A: ActuatorPort> StatusApi<A> {
    pub fn new(
        core: Arc<MonitorCore<A>>,
        clock: Arc<dyn ClockPort + Send + Sync>,
        history_spacing_ms: u64,
    ) -> Self {
        Self {
            core,
            clock,
            history_spacing_ms,
        }
    }

    // ── Handlers ──────────────────────────────────────────────

    pub fn current(&self) -> ApiResponse {
        let state = self.core.current();
        match to_json(&CurrentStatus::from(&state.snapshot), 128) {
            Ok(body) => ApiResponse::json(body),
            Err(e) => e.into(),
        }
    }

    /// Entries are stamped `now - index * spacing`, index 0 being the
    /// newest, then filtered, then limited by `count`.
    pub fn history(&self, query: &str) -> ApiResponse {
        match self.render_history(HistoryQuery::parse(query)) {
            Ok(body) => ApiResponse::json(body),
            Err(e) => e.into(),
        }
    }

    fn render_history(&self, q: HistoryQuery) -> Result<Vec<u8>, ApiError> {
        let now = self.clock.now_ms();
        let spacing = self.history_spacing_ms;

        let entries = self.core.with_history(|store| {
            // Filters run first, so `count` caps the filtered stream rather
            // than the raw ring; `limit` is its upper bound.
            let limit = store.limit(q.count);
            let mut entries = Vec::new();
            entries
                .try_reserve(limit)
                .map_err(|_| ApiError::OutOfMemory)?;
            entries.extend(
                store
                    .iter()
                    .enumerate()
                    .map(|(i, s)| {
                        let age = (i as u64).saturating_mul(spacing);
                        HistoryEntry::new(now.saturating_sub(age), s)
                    })
                    .filter(|e| q.status.is_none_or(|st| e.status == st))
                    .filter(|e| q.from_ms.is_none_or(|from| e.timestamp >= from))
                    .take(limit),
            );
            Ok::<_, ApiError>(entries)
        })?;

        to_json(&entries, 2 + entries.len() * HISTORY_ENTRY_JSON_BYTES)
    }

    pub fn stats(&self) -> ApiResponse {
        let stats = self.core.with_history(|store| HistoryStats::collect(store.iter()));
        match to_json(&stats, 160) {
            Ok(body) => ApiResponse::json(body),
            Err(e) => e.into(),
        }
    }

    pub fn silence(&self) -> ApiResponse {
        if self.core.silence_alarm() {
            info!("alarm silenced via API");
        }
        ApiResponse::text(200, SILENCE_CONFIRMATION)
    }

    pub fn preflight(&self) -> ApiResponse {
        ApiResponse {
            status: 204,
            content_type: "text/plain",
            body: Vec::new(),
            preflight: true,
        }
    }

    pub fn not_found(&self) -> ApiResponse {
        ApiResponse::text(404, "Not Found")
    }

    /// Route a request to its handler.
    pub fn dispatch(&self, req: &ApiRequest<'_>) -> ApiResponse {
        match (req.method, req.path) {
            (Method::Options, _) => self.preflight(),
            (Method::Get, "/api/current") => self.current(),
            (Method::Get, "/api/history") => self.history(req.query),
            (Method::Get, "/api/stats") => self.stats(),
            (Method::Post, "/apagar") => self.silence(),
            _ => self.not_found(),
        }
    }
}

impl<A: ActuatorPort + Send + 'static> StatusApi<A> {
    /// Register every route with the HTTP collaborator.
    pub fn mount(self: &Arc<Self>, registrar: &mut impl RouteRegistrar) -> Result<(), Error> {
        // Catch-alls last: the server matches in registration order.
        let routes: [(Method, &'static str); 7] = [
            (Method::Get, "/api/current"),
            (Method::Get, "/api/history"),
            (Method::Get, "/api/stats"),
            (Method::Post, "/apagar"),
            (Method::Options, "/*"),
            (Method::Get, "/*"),
            (Method::Post, "/*"),
        ];
        for (method, path) in routes {
            let api = Arc::clone(self);
            let handler = move |req: &ApiRequest<'_>| api.dispatch(req);
            registrar.register(method, path, Box::new(handler))?;
        }
        info!("status API mounted ({} routes)", routes.len());
        Ok(())
    }
}
