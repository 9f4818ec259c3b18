// src/alert_state.rs
// Edge-triggered threshold alert state machine

use crate::types::{AlertEvent, AlertKind, AlertSide, PriceSample, Thresholds};

/// Tracks which threshold band the last sample landed in and decides when a
/// new sample should raise an alert.
///
/// An alert fires only on the transition into the above-high or below-low
/// band: first entry fires, consecutive samples inside the same band stay
/// quiet, and leaving the band re-arms it. Crossing straight from one band
/// to the other fires the destination band's alert immediately.
#[derive(Debug)]
pub struct AlertStateMachine {
    thresholds: Thresholds,
    last_side: AlertSide,
    previous_price: Option<f64>,
}

impl AlertStateMachine {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            last_side: AlertSide::Normal,
            previous_price: None,
        }
    }

    /// Strict inequalities: a price exactly on a cutoff is in the normal band.
    pub fn classify(price: f64, thresholds: &Thresholds) -> AlertSide {
        if price > thresholds.high {
            AlertSide::AboveHigh
        } else if price < thresholds.low {
            AlertSide::BelowLow
        } else {
            AlertSide::Normal
        }
    }

    pub fn last_side(&self) -> AlertSide {
        self.last_side
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Feed one sample through the machine. The side transition is always
    /// recorded, even when `alerts_enabled` is false; the flag only gates
    /// whether the event is returned. No I/O happens here.
    pub fn evaluate(&mut self, sample: &PriceSample, alerts_enabled: bool) -> Option<AlertEvent> {
        let side = Self::classify(sample.price, &self.thresholds);
        let crossed = side != AlertSide::Normal && side != self.last_side;

        let previous_price = self.previous_price;
        self.last_side = side;
        self.previous_price = Some(sample.price);

        if !crossed || !alerts_enabled {
            return None;
        }

        let (kind, threshold) = match side {
            AlertSide::AboveHigh => (AlertKind::High, self.thresholds.high),
            AlertSide::BelowLow => (AlertKind::Low, self.thresholds.low),
            AlertSide::Normal => return None,
        };

        Some(AlertEvent {
            kind,
            price: sample.price,
            threshold,
            previous_price,
            observed_at: sample.observed_at,
        })
    }
}
