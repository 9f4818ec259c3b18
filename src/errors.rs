// src/errors.rs
use thiserror::Error;

/// Fatal at startup. The process exits with code 1 before the first poll.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Lower threshold (¢{low}) must be less than upper threshold (¢{high})")]
    InvalidThresholds { low: f64, high: f64 },

    #[error("--smtp-server is required when provider is 'custom'")]
    MissingSmtpServer,

    #[error("No recipient email addresses supplied")]
    NoRecipients,

    #[error("Sender address missing (pass --sender or set SMTP_SENDER)")]
    MissingSender,

    #[error("Sender password missing (pass --password or set SMTP_PASSWORD)")]
    MissingPassword,
}

/// Transient. A failed fetch skips the sample; the loop keeps running.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("API returned an empty array")]
    EmptyPayload,

    #[error("Malformed '{field}' field in API response: {value:?}")]
    MalformedField { field: &'static str, value: String },
}

/// Transient at runtime (logged, alert considered undelivered), fatal only
/// when raised by the startup connection preflight.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build email message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("SMTP server refused the connection test")]
    ConnectionRefused,
}
