// src/monitor.rs
// Polling loop: fetch -> evaluate -> notify

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::alert_state::AlertStateMachine;
use crate::control_server::ControlState;
use crate::email_notifier::EmailNotifier;
use crate::price_feed::PriceFeed;

pub struct PriceMonitor {
    feed: PriceFeed,
    notifier: EmailNotifier,
    state_machine: AlertStateMachine,
    control: ControlState,
    poll_interval: Duration,
}

impl PriceMonitor {
    pub fn new(
        feed: PriceFeed,
        notifier: EmailNotifier,
        state_machine: AlertStateMachine,
        control: ControlState,
        poll_interval: Duration,
    ) -> Self {
        Self {
            feed,
            notifier,
            state_machine,
            control,
            poll_interval,
        }
    }

    /// Runs until the surrounding task is cancelled (ctrl-c in main).
    /// Transient fetch and send failures are logged and never end the loop.
    pub async fn run(&mut self) {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.poll_once().await;
        }
    }

    pub async fn poll_once(&mut self) {
        let sample = match self.feed.fetch_current().await {
            Ok(sample) => sample,
            Err(e) => {
                error!("❌ Price fetch failed: {}", e);
                return;
            }
        };

        info!(
            "[{}] Current price: ¢{:.2}",
            sample.observed_at.format("%Y-%m-%d %H:%M:%S"),
            sample.price
        );

        let alerts_enabled = self.control.is_enabled();

        if let Some(event) = self.state_machine.evaluate(&sample, alerts_enabled) {
            let thresholds = self.state_machine.thresholds();
            warn!(
                "⚠️ {} ALERT: price ¢{:.2} crossed threshold ¢{:.2} (band ¢{:.2}-¢{:.2})",
                event.kind.as_str(),
                event.price,
                event.threshold,
                thresholds.low,
                thresholds.high
            );

            // A failed send is not retried; the side transition is already
            // recorded, so the next attempt comes on the next edge.
            if let Err(e) = self.notifier.send_alert(&event).await {
                error!("✉️ Failed to send alert email: {}", e);
            }
        }

        if !alerts_enabled {
            info!("🔕 Email alerts are disabled via the stop endpoint; restart to re-enable");
        }
    }
}
