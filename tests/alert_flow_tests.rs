// tests/alert_flow_tests.rs
//
// End-to-end checks of the alert pipeline pieces that need no network:
// the edge-triggered state machine driven through realistic sample
// sequences, the control flag gating, and startup validation.

use chrono::{Duration, TimeZone, Utc};

use comed_monitor::alert_state::AlertStateMachine;
use comed_monitor::config::{Args, MonitorConfig, Provider};
use comed_monitor::control_server::ControlState;
use comed_monitor::errors::ConfigError;
use comed_monitor::types::{AlertKind, AlertSide, PriceSample, Thresholds};

fn samples(prices: &[f64]) -> Vec<PriceSample> {
    let start = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
    prices
        .iter()
        .enumerate()
        .map(|(i, price)| PriceSample {
            price: *price,
            observed_at: start + Duration::minutes(i as i64),
        })
        .collect()
}

#[test]
fn full_excursion_produces_exactly_high_then_low() {
    let thresholds = Thresholds::new(2.0, 10.0).unwrap();
    let mut machine = AlertStateMachine::new(thresholds);
    let control = ControlState::new();

    let events: Vec<_> = samples(&[5.0, 12.0, 12.0, 5.0, 1.0])
        .iter()
        .filter_map(|s| machine.evaluate(s, control.is_enabled()))
        .collect();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, AlertKind::High);
    assert_eq!(events[0].price, 12.0);
    assert_eq!(events[0].threshold, 10.0);
    assert_eq!(events[1].kind, AlertKind::Low);
    assert_eq!(events[1].price, 1.0);
    assert_eq!(events[1].threshold, 2.0);
}

#[test]
fn stop_endpoint_flag_suppresses_later_alerts_but_not_tracking() {
    let thresholds = Thresholds::new(2.0, 10.0).unwrap();
    let mut machine = AlertStateMachine::new(thresholds);
    let control = ControlState::new();

    let all = samples(&[5.0, 12.0, 5.0, 12.0]);

    // First excursion alerts normally.
    assert!(machine.evaluate(&all[0], control.is_enabled()).is_none());
    assert!(machine.evaluate(&all[1], control.is_enabled()).is_some());

    // Operator hits /stop between polls.
    control.disable();

    assert!(machine.evaluate(&all[2], control.is_enabled()).is_none());
    let suppressed = machine.evaluate(&all[3], control.is_enabled());
    assert!(suppressed.is_none());
    // The machine still followed the price into the high band.
    assert_eq!(machine.last_side(), AlertSide::AboveHigh);
}

#[test]
fn oscillation_around_high_only_fires_on_entries() {
    let thresholds = Thresholds::new(2.0, 10.0).unwrap();
    let mut machine = AlertStateMachine::new(thresholds);

    let events: Vec<_> = samples(&[10.1, 10.0, 10.1, 10.0, 10.1])
        .iter()
        .filter_map(|s| machine.evaluate(s, true))
        .collect();

    // 10.0 is exactly on the cutoff, so every 10.1 is a fresh entry.
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.kind == AlertKind::High));
}

#[test]
fn inverted_thresholds_fail_configuration() {
    let args = Args {
        upper: 5.0,
        lower: 10.0,
        email: "ops@example.com".to_string(),
        sender: Some("alerts@example.com".to_string()),
        password: Some("app-password".to_string()),
        provider: Provider::Gmail,
        smtp_server: None,
        smtp_port: 587,
        poll_interval_secs: 60,
        control_port: 8080,
    };

    match MonitorConfig::from_args(args) {
        Err(ConfigError::InvalidThresholds { low, high }) => {
            assert_eq!(low, 10.0);
            assert_eq!(high, 5.0);
        }
        other => panic!("expected InvalidThresholds, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn status_route_reflects_stop() {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    let state = ControlState::new();
    let app = comed_monitor::control_server::router(state.clone());

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/stop").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!state.is_enabled());

    let response = app
        .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["emails"], "disabled");
}
