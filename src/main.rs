// src/main.rs
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use comed_monitor::alert_state::AlertStateMachine;
use comed_monitor::config::{Args, MonitorConfig};
use comed_monitor::control_server::{self, ControlState};
use comed_monitor::email_notifier::EmailNotifier;
use comed_monitor::monitor::PriceMonitor;
use comed_monitor::price_feed::PriceFeed;

// Console plus a daily rolling file under logs/
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all("logs")?;
    let file_appender = tracing_appender::rolling::daily("logs", "comed_monitor");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_target(true)
                .with_level(true)
                .with_ansi(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Warning: Could not load .env file: {}", e);
    }

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        tracing_subscriber::fmt()
            .with_target(false)
            .with_level(true)
            .init();
    }

    let args = Args::parse();
    let config = match MonitorConfig::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("⚙️ Configuration:");
    info!("   High alert threshold: ¢{:.2}", config.thresholds.high);
    info!("   Low alert threshold: ¢{:.2}", config.thresholds.low);
    info!("   Recipient(s): {}", config.recipients.join(", "));
    info!(
        "   SMTP: {}:{} as {}",
        config.smtp.server, config.smtp.port, config.smtp.sender
    );
    info!("   Poll interval: {}s", config.poll_interval.as_secs());

    let notifier = match EmailNotifier::new(&config.smtp, &config.recipients) {
        Ok(notifier) => notifier,
        Err(e) => {
            error!("❌ Invalid email configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("📮 Testing email connection...");
    if let Err(e) = notifier.test_connection().await {
        error!("❌ Email connection test failed: {}", e);
        error!("   Gmail and Yahoo require an app password, not your account password");
        std::process::exit(1);
    }
    info!("✅ Email connection successful");

    let control = ControlState::new();
    let bound_port = control_server::spawn(control.clone(), config.control_port).await;
    let stop_url = bound_port.map(control_server::stop_url);
    if let Some(url) = &stop_url {
        info!("🛑 Stop alert URL: {}", url);
    }
    let notifier = notifier.with_stop_url(stop_url);

    info!("🚀 Monitoring started, press Ctrl+C to stop");

    let mut monitor = PriceMonitor::new(
        PriceFeed::new(),
        notifier,
        AlertStateMachine::new(config.thresholds),
        control,
        config.poll_interval,
    );

    tokio::select! {
        _ = monitor.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("👋 Monitoring stopped by user");
        }
    }
}
