// src/types.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::ConfigError;

/// One observation from the pricing API. Prices are in cents per kWh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceSample {
    pub price: f64,
    pub observed_at: DateTime<Utc>,
}

/// The low/high cutoff pair. Fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub low: f64,
    pub high: f64,
}

impl Thresholds {
    pub fn new(low: f64, high: f64) -> Result<Self, ConfigError> {
        if low >= high {
            return Err(ConfigError::InvalidThresholds { low, high });
        }
        Ok(Self { low, high })
    }
}

/// Which threshold band the most recent sample occupies. Band membership
/// uses strict inequalities, so a price exactly on a cutoff is Normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertSide {
    Normal,
    AboveHigh,
    BelowLow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertKind {
    High,
    Low,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::High => "HIGH",
            AlertKind::Low => "LOW",
        }
    }
}

/// Emitted when a sample crosses into an alert band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    pub kind: AlertKind,
    pub price: f64,
    pub threshold: f64,
    pub previous_price: Option<f64>,
    pub observed_at: DateTime<Utc>,
}
