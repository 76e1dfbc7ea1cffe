//! Integration tests: MonitorService → MonitorCore → indicators.

use std::sync::Arc;

use floodwatch::actuation::Led;
use floodwatch::app::events::AppEvent;
use floodwatch::app::service::MonitorService;
use floodwatch::app::state::MonitorCore;
use floodwatch::config::MonitorConfig;
use floodwatch::error::SensorError;
use floodwatch::history::HISTORY_CAPACITY;
use floodwatch::risk::RiskState;
use floodwatch::sensors::distance::{DISTANCE_MAX_CM, DISTANCE_MIN_CM};

use super::mock_hw::{ActuatorCall, CollectingSink, MockHardware, MockSensorIo};

fn setup() -> (
    MockHardware,
    Arc<MonitorCore<MockHardware>>,
    MonitorService<MockHardware>,
    CollectingSink,
) {
    let hw = MockHardware::new();
    let core = Arc::new(MonitorCore::new(hw.clone()));
    let mut service = MonitorService::new(&MonitorConfig::default(), Arc::clone(&core));
    let mut sink = CollectingSink::default();
    service.start(&mut sink);
    (hw, core, service, sink)
}

#[test]
fn critical_distance_sounds_buzzer() {
    let (hw, core, mut service, mut sink) = setup();
    let mut io = MockSensorIo::at_distance(5.0);

    let t = service.tick(&mut io, &mut sink);

    assert_eq!(t.snapshot.risk_state(), RiskState::Critical);
    assert!((t.snapshot.distance_cm() - 5.0).abs() < 0.1);
    assert_eq!(hw.led(), Some(Led::Red));
    assert!(hw.buzzer_on());
    assert!(core.current().alarm_active);
    assert_eq!(sink.events[0], AppEvent::Started { alarm_active: true });
}

#[test]
fn each_band_lights_its_led() {
    let cases = [
        (15.0, RiskState::Warning, Led::Yellow),
        (25.0, RiskState::Caution, Led::Green),
        (150.0, RiskState::Normal, Led::Green),
    ];
    for (cm, risk, led) in cases {
        let (hw, _core, mut service, mut sink) = setup();
        let t = service.tick(&mut MockSensorIo::at_distance(cm), &mut sink);
        assert_eq!(t.snapshot.risk_state(), risk, "at {cm} cm");
        assert_eq!(hw.led(), Some(led), "at {cm} cm");
        assert!(!hw.buzzer_on());
    }
}

#[test]
fn rain_forces_red_and_silent() {
    let (hw, _core, mut service, mut sink) = setup();
    let mut io = MockSensorIo::at_distance(5.0);
    io.rain = true;

    let t = service.tick(&mut io, &mut sink);

    assert!(t.rain_detected);
    assert!(t.alarm_active);
    assert!(!t.buzzer_on);
    assert_eq!(hw.led(), Some(Led::Red));
    assert!(!hw.buzzer_on());
    assert!(sink.events.contains(&AppEvent::RainChanged(true)));
}

#[test]
fn silence_holds_across_cycles() {
    let (hw, core, mut service, mut sink) = setup();
    let mut io = MockSensorIo::at_distance(4.0);
    service.tick(&mut io, &mut sink);
    assert!(hw.buzzer_on());

    assert!(core.silence_alarm());
    assert_eq!(hw.calls().last(), Some(&ActuatorCall::SetBuzzer(false)));

    for _ in 0..3 {
        let t = service.tick(&mut io, &mut sink);
        assert!(!t.alarm_active);
        assert!(!t.buzzer_on);
    }
    assert!(!hw.buzzer_on());
    assert_eq!(hw.led(), Some(Led::Red));
    assert_eq!(
        sink.events
            .iter()
            .filter(|e| **e == AppEvent::AlarmSilenced)
            .count(),
        1
    );
}

#[test]
fn missing_echo_reads_as_flooded() {
    let (_hw, _core, mut service, mut sink) = setup();
    let mut io = MockSensorIo::new();
    io.distance_cm = None;

    let started = io.now_us;
    let t = service.tick(&mut io, &mut sink);

    assert_eq!(t.snapshot.distance_cm(), DISTANCE_MIN_CM);
    assert_eq!(t.snapshot.risk_state(), RiskState::Critical);
    // 30 ms edge wait and four 10 ms temperature gaps
    assert!(io.now_us - started < 75_000);
}

#[test]
fn out_of_range_echo_clamps_to_ceiling() {
    let (_hw, _core, mut service, mut sink) = setup();
    let t = service.tick(&mut MockSensorIo::at_distance(480.0), &mut sink);
    assert_eq!(t.snapshot.distance_cm(), DISTANCE_MAX_CM);
    assert_eq!(t.snapshot.risk_state(), RiskState::Normal);
}

#[test]
fn adc_failures_report_zero() {
    let (_hw, _core, mut service, mut sink) = setup();
    let mut io = MockSensorIo::at_distance(50.0);
    io.temp_raw = Err(SensorError::AdcReadFailed);
    io.rain_raw = Err(SensorError::AdcReadFailed);

    let t = service.tick(&mut io, &mut sink);
    assert_eq!(t.snapshot.temperature_c(), 0.0);
    assert_eq!(t.snapshot.humidity_pct(), 0.0);
    assert!(service.sampler().calibration().is_empty());
}

#[test]
fn humidity_rescales_as_plate_wets() {
    let (_hw, _core, mut service, mut sink) = setup();
    let mut io = MockSensorIo::at_distance(50.0);

    io.rain_raw = Ok(4000);
    assert_eq!(service.tick(&mut io, &mut sink).snapshot.humidity_pct(), 0.0);
    io.rain_raw = Ok(1000);
    assert_eq!(
        service.tick(&mut io, &mut sink).snapshot.humidity_pct(),
        100.0
    );
    io.rain_raw = Ok(2500);
    let h = service.tick(&mut io, &mut sink).snapshot.humidity_pct();
    assert!((h - 50.0).abs() < 0.01, "got {h}");
}

#[test]
fn history_keeps_last_hundred_cycles() {
    let (_hw, core, mut service, mut sink) = setup();
    let mut io = MockSensorIo::new();
    for i in 0..=HISTORY_CAPACITY {
        io.distance_cm = Some(10.0 + i as f32);
        service.tick(&mut io, &mut sink);
    }
    let history = core.history(None);
    assert_eq!(history.len(), HISTORY_CAPACITY);
    assert!((history[0].distance_cm() - (10.0 + HISTORY_CAPACITY as f32)).abs() < 0.1);
    assert!((history[HISTORY_CAPACITY - 1].distance_cm() - 11.0).abs() < 0.1);
    assert_eq!(service.tick_count(), HISTORY_CAPACITY as u64 + 1);
}
