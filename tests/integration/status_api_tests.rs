//! Integration tests: StatusApi over a core fed by MonitorService.

use std::sync::Arc;

use floodwatch::api::{ApiRequest, ApiResponse, Method, SILENCE_CONFIRMATION, StatusApi};
use floodwatch::app::service::MonitorService;
use floodwatch::app::state::MonitorCore;
use floodwatch::config::MonitorConfig;
use serde_json::Value;

use super::mock_hw::{CollectingSink, FixedClock, MockHardware, MockSensorIo};

const NOW_MS: u64 = 1_700_000_000_000;

struct Rig {
    hw: MockHardware,
    core: Arc<MonitorCore<MockHardware>>,
    service: MonitorService<MockHardware>,
    sink: CollectingSink,
    api: StatusApi<MockHardware>,
}

impl Rig {
    fn new() -> Self {
        let hw = MockHardware::new();
        let core = Arc::new(MonitorCore::new(hw.clone()));
        let config = MonitorConfig::default();
        let mut service = MonitorService::new(&config, Arc::clone(&core));
        let mut sink = CollectingSink::default();
        service.start(&mut sink);
        let api = StatusApi::new(
            Arc::clone(&core),
            Arc::new(FixedClock(NOW_MS)),
            config.history_spacing_ms,
        );
        Self {
            hw,
            core,
            service,
            sink,
            api,
        }
    }

    fn sample_at(&mut self, cm: f32) {
        let mut io = MockSensorIo::at_distance(cm);
        self.service.tick(&mut io, &mut self.sink);
    }

    fn call(&self, method: Method, uri: &str) -> ApiResponse {
        self.api.dispatch(&ApiRequest::from_uri(method, uri))
    }

    fn json(&self, uri: &str) -> Value {
        let resp = self.call(Method::Get, uri);
        assert_eq!(resp.status, 200, "{uri}");
        assert_eq!(resp.content_type, "application/json");
        serde_json::from_slice(&resp.body).unwrap()
    }
}

#[test]
fn current_reports_latest_snapshot() {
    let mut rig = Rig::new();
    rig.sample_at(5.0);

    let v = rig.json("/api/current");
    assert_eq!(v["status"], "CRITICAL");
    assert_eq!(v["distance"], 5.0);
    assert_eq!(v["humidity"], 0.0);
    let t = v["temperature"].as_f64().unwrap();
    assert!((t - 20.0).abs() < 0.5);
    assert_eq!(v.as_object().unwrap().len(), 4);
}

#[test]
fn history_count_semantics() {
    let mut rig = Rig::new();
    for cm in [50.0, 40.0, 30.0, 20.0, 10.0] {
        rig.sample_at(cm);
    }

    let all = rig.json("/api/history");
    assert_eq!(all.as_array().unwrap().len(), 5);
    assert_eq!(all[0]["distance"], 10.0);
    assert_eq!(all[0]["timestamp"], NOW_MS);
    assert_eq!(all[4]["timestamp"], NOW_MS - 4_000);

    assert_eq!(rig.json("/api/history?count=2").as_array().unwrap().len(), 2);
    for fallback in ["count=0", "count=-1", "count=abc", "count=99"] {
        let v = rig.json(&format!("/api/history?{fallback}"));
        assert_eq!(v.as_array().unwrap().len(), 5, "{fallback}");
    }
}

#[test]
fn count_returns_the_most_recent_newest_first() {
    let mut rig = Rig::new();
    for cm in [5.0, 15.0, 35.0] {
        rig.sample_at(cm);
    }

    let v = rig.json("/api/history?count=2");
    let distances: Vec<f64> = v
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["distance"].as_f64().unwrap())
        .collect();
    assert_eq!(distances, vec![35.0, 15.0]);
    assert_eq!(v[0]["status"], "NORMAL");
    assert_eq!(v[1]["status"], "WARNING");
}

#[test]
fn empty_history_is_empty_array() {
    let rig = Rig::new();
    let resp = rig.call(Method::Get, "/api/history");
    assert_eq!(resp.body_str(), "[]");
}

#[test]
fn stats_summarise_history() {
    let mut rig = Rig::new();
    let empty = rig.json("/api/stats");
    assert_eq!(empty["samples"], 0);
    assert!(empty["avg_distance"].is_null());

    for cm in [5.0, 8.0, 50.0, 17.0] {
        rig.sample_at(cm);
    }
    let v = rig.json("/api/stats");
    assert_eq!(v["samples"], 4);
    assert_eq!(v["critical_count"], 2);
    assert_eq!(v["avg_distance"], 20.0);
}

#[test]
fn silence_endpoint_is_idempotent() {
    let mut rig = Rig::new();
    rig.sample_at(3.0);
    assert!(rig.hw.buzzer_on());

    for _ in 0..2 {
        let resp = rig.call(Method::Post, "/apagar");
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body_str(), SILENCE_CONFIRMATION);
        assert!(!rig.core.current().alarm_active);
        assert!(!rig.hw.buzzer_on());
    }

    rig.sample_at(3.0);
    assert!(!rig.hw.buzzer_on());
    assert_eq!(rig.json("/api/current")["status"], "CRITICAL");
}

#[test]
fn every_response_allows_any_origin() {
    let rig = Rig::new();
    let responses = [
        rig.call(Method::Get, "/api/current"),
        rig.call(Method::Get, "/api/history?count=1"),
        rig.call(Method::Get, "/api/stats"),
        rig.call(Method::Post, "/apagar"),
        rig.call(Method::Options, "/api/current"),
        rig.call(Method::Get, "/missing"),
    ];
    for resp in &responses {
        assert!(
            resp.headers().contains(&ApiResponse::ALLOW_ORIGIN),
            "status {}",
            resp.status
        );
    }
    let preflight = &responses[4];
    assert_eq!(preflight.status, 204);
    assert!(preflight.body.is_empty());
    assert!(preflight.headers().contains(&ApiResponse::ALLOW_METHODS));
    assert_eq!(responses[5].status, 404);
}

#[test]
fn readers_never_see_torn_state_while_sampling() {
    use std::thread;

    let mut rig = Rig::new();
    rig.sample_at(50.0);
    let Rig {
        core,
        mut service,
        mut sink,
        api,
        ..
    } = rig;
    let api = Arc::new(api);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let api = Arc::clone(&api);
            thread::spawn(move || {
                for _ in 0..200 {
                    let resp = api.dispatch(&ApiRequest::from_uri(Method::Get, "/api/current"));
                    let v: Value = serde_json::from_slice(&resp.body).unwrap();
                    let d = v["distance"].as_f64().unwrap();
                    let expected = if d <= 10.0 { "CRITICAL" } else { "NORMAL" };
                    assert_eq!(v["status"], expected, "distance {d}");

                    let h = api.dispatch(&ApiRequest::from_uri(Method::Get, "/api/history"));
                    let arr: Value = serde_json::from_slice(&h.body).unwrap();
                    assert!(arr.as_array().unwrap().len() <= 100);
                }
            })
        })
        .collect();

    for i in 0..200 {
        let cm = if i % 2 == 0 { 5.0 } else { 60.0 };
        service.tick(&mut MockSensorIo::at_distance(cm), &mut sink);
    }
    for r in readers {
        r.join().unwrap();
    }
    assert!(core.history(None).len() <= 100);
}
