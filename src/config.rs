// src/config.rs
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::errors::ConfigError;
use crate::types::Thresholds;

#[derive(Parser, Debug)]
#[command(name = "comed-monitor")]
#[command(about = "Monitor ComEd hourly electricity prices and send email alerts")]
pub struct Args {
    /// Upper price threshold in cents (alert when price goes ABOVE this)
    #[arg(short = 'u', long)]
    pub upper: f64,

    /// Lower price threshold in cents (alert when price goes BELOW this)
    #[arg(short = 'l', long)]
    pub lower: f64,

    /// Email address(es) to receive alerts (comma-separated for multiple)
    #[arg(short = 'e', long)]
    pub email: String,

    /// Sender email address (falls back to SMTP_SENDER)
    #[arg(short = 's', long)]
    pub sender: Option<String>,

    /// Sender email password or app password (falls back to SMTP_PASSWORD)
    #[arg(short = 'p', long)]
    pub password: Option<String>,

    /// Email provider
    #[arg(long, value_enum, default_value_t = Provider::Gmail)]
    pub provider: Provider,

    /// Custom SMTP server (required when provider is 'custom')
    #[arg(long)]
    pub smtp_server: Option<String>,

    /// SMTP port
    #[arg(long, default_value_t = 587)]
    pub smtp_port: u16,

    /// Seconds between price polls
    #[arg(long, default_value_t = 60)]
    pub poll_interval_secs: u64,

    /// Port for the local stop/status control server
    #[arg(long, default_value_t = 8080)]
    pub control_port: u16,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gmail,
    Outlook,
    Yahoo,
    Custom,
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub sender: String,
    pub password: String,
}

/// Everything the monitor needs, validated once at startup. How the values
/// arrived (flag vs environment) is not visible past this point.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub thresholds: Thresholds,
    pub recipients: Vec<String>,
    pub smtp: SmtpSettings,
    pub poll_interval: Duration,
    pub control_port: u16,
}

impl MonitorConfig {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let thresholds = Thresholds::new(args.lower, args.upper)?;

        let recipients: Vec<String> = args
            .email
            .split(',')
            .map(|addr| addr.trim().to_string())
            .filter(|addr| !addr.is_empty())
            .collect();
        if recipients.is_empty() {
            return Err(ConfigError::NoRecipients);
        }

        let sender = args
            .sender
            .or_else(|| std::env::var("SMTP_SENDER").ok())
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingSender)?;

        let password = args
            .password
            .or_else(|| std::env::var("SMTP_PASSWORD").ok())
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::MissingPassword)?;

        let (server, port) = match args.provider {
            Provider::Gmail => ("smtp.gmail.com".to_string(), 587),
            Provider::Outlook => ("smtp-mail.outlook.com".to_string(), 587),
            Provider::Yahoo => ("smtp.mail.yahoo.com".to_string(), 587),
            Provider::Custom => {
                let server = args.smtp_server.ok_or(ConfigError::MissingSmtpServer)?;
                (server, args.smtp_port)
            }
        };

        Ok(Self {
            thresholds,
            recipients,
            smtp: SmtpSettings {
                server,
                port,
                sender,
                password,
            },
            poll_interval: Duration::from_secs(args.poll_interval_secs),
            control_port: args.control_port,
        })
    }
}
