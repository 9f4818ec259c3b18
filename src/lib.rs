// src/lib.rs
pub mod alert_state;
pub mod config;
pub mod control_server;
pub mod email_notifier;
pub mod errors;
pub mod monitor;
pub mod price_feed;
pub mod types;
