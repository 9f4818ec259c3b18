// src/control_server.rs
// Local HTTP endpoint for stopping alerts without killing the monitor

use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

/// Shared alerts-enabled flag. One writer (the stop handler), one reader
/// (the polling loop); relaxed ordering is enough since a disable only has
/// to become visible before some later poll.
#[derive(Debug, Clone)]
pub struct ControlState {
    alerts_enabled: Arc<AtomicBool>,
    started_at: DateTime<Utc>,
}

impl ControlState {
    pub fn new() -> Self {
        Self {
            alerts_enabled: Arc::new(AtomicBool::new(true)),
            started_at: Utc::now(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.alerts_enabled.load(Ordering::Relaxed)
    }

    /// One-way: there is no re-enable short of restarting the process.
    pub fn disable(&self) {
        self.alerts_enabled.store(false, Ordering::Relaxed);
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}

const STOP_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Alerts Stopped</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            display: flex;
            justify-content: center;
            align-items: center;
            height: 100vh;
            margin: 0;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
        }
        .container {
            background: white;
            padding: 40px;
            border-radius: 10px;
            box-shadow: 0 10px 30px rgba(0,0,0,0.3);
            text-align: center;
        }
        h1 { color: #28a745; }
        p { color: #666; font-size: 18px; }
    </style>
</head>
<body>
    <div class="container">
        <h1>✓ Email Alerts Stopped</h1>
        <p>You will no longer receive price alert emails.</p>
        <p>To resume alerts, restart the monitoring program.</p>
    </div>
</body>
</html>
"#;

async fn stop_alerts(State(state): State<ControlState>) -> Html<&'static str> {
    state.disable();
    info!("🔕 Email alerts disabled via /stop");
    Html(STOP_PAGE)
}

async fn status(State(state): State<ControlState>) -> Json<serde_json::Value> {
    let status = if state.is_enabled() { "enabled" } else { "disabled" };
    Json(serde_json::json!({ "emails": status }))
}

async fn health_check(State(state): State<ControlState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "alerts_enabled": state.is_enabled(),
        "started_at": state.started_at,
        "timestamp": Utc::now(),
    }))
}

pub fn router(state: ControlState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/stop", get(stop_alerts))
        .route("/status", get(status))
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(state)
}

/// Bind the control server and serve it on a background task. Tries the
/// preferred port, then the next one up (the preferred port is often taken
/// by another dev server). Returns the bound port, or None if the server
/// could not start - the monitor still runs, just without a stop URL.
pub async fn spawn(state: ControlState, preferred_port: u16) -> Option<u16> {
    for port in [preferred_port, preferred_port.wrapping_add(1)] {
        match tokio::net::TcpListener::bind(("0.0.0.0", port)).await {
            Ok(listener) => {
                let app = router(state.clone());
                tokio::spawn(async move {
                    if let Err(e) = axum::serve(listener, app).await {
                        error!("🛑 Control server error: {}", e);
                    }
                });
                info!("🛑 Stop alert server started on port {}", port);
                return Some(port);
            }
            Err(e) => {
                warn!("Could not bind control server on port {}: {}", port, e);
            }
        }
    }

    warn!("⚠️ Control server unavailable; alerts can only be stopped by killing the process");
    None
}

/// Best-effort local IP for the stop link, via the UDP-connect trick
/// (no packet is actually sent).
pub fn local_ip() -> Option<IpAddr> {
    let socket = std::net::UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}

pub fn stop_url(port: u16) -> String {
    match local_ip() {
        Some(ip) => format!("http://{}:{}/stop", ip, port),
        None => format!("http://localhost:{}/stop", port),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_enabled() {
        let state = ControlState::new();
        assert!(state.is_enabled());
    }

    #[test]
    fn disable_is_one_way_and_idempotent() {
        let state = ControlState::new();
        state.disable();
        assert!(!state.is_enabled());
        state.disable();
        assert!(!state.is_enabled());
    }

    #[test]
    fn clones_share_the_flag() {
        let state = ControlState::new();
        let listener_handle = state.clone();
        listener_handle.disable();
        assert!(!state.is_enabled());
    }

    #[test]
    fn stop_url_always_points_at_stop_route() {
        let url = stop_url(8080);
        assert!(url.starts_with("http://"));
        assert!(url.ends_with(":8080/stop"));
    }
}
