// src/email_notifier.rs
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::SmtpSettings;
use crate::errors::SendError;
use crate::types::{AlertEvent, AlertKind};

pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipients: Vec<Mailbox>,
    stop_url: Option<String>,
}

impl EmailNotifier {
    pub fn new(smtp: &SmtpSettings, recipients: &[String]) -> Result<Self, SendError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.server)?
            .port(smtp.port)
            .credentials(Credentials::new(
                smtp.sender.clone(),
                smtp.password.clone(),
            ))
            .build();

        let sender: Mailbox = smtp.sender.parse()?;
        let recipients = recipients
            .iter()
            .map(|addr| addr.parse())
            .collect::<Result<Vec<Mailbox>, _>>()?;

        Ok(Self {
            transport,
            sender,
            recipients,
            stop_url: None,
        })
    }

    /// Attach the stop-alerts link once the control server has a bound port.
    pub fn with_stop_url(mut self, stop_url: Option<String>) -> Self {
        self.stop_url = stop_url;
        self
    }

    /// Startup preflight: connect and authenticate against the SMTP server
    /// without sending anything. A failure here is fatal for the process.
    pub async fn test_connection(&self) -> Result<(), SendError> {
        if self.transport.test_connection().await? {
            Ok(())
        } else {
            Err(SendError::ConnectionRefused)
        }
    }

    pub async fn send_alert(&self, event: &AlertEvent) -> Result<(), SendError> {
        let subject = format!("⚠️ {} PRICE ALERT - ¢{:.2}", event.kind.as_str(), event.price);
        let body = render_alert_html(event, self.stop_url.as_deref());

        let mut builder = Message::builder()
            .from(self.sender.clone())
            .subject(subject)
            .header(ContentType::TEXT_HTML);
        for recipient in &self.recipients {
            builder = builder.to(recipient.clone());
        }
        let message = builder.body(body)?;

        self.transport.send(message).await?;
        info!(
            "✉️ {} alert email sent to {} recipient(s)",
            event.kind.as_str(),
            self.recipients.len()
        );
        Ok(())
    }
}

fn render_alert_html(event: &AlertEvent, stop_url: Option<&str>) -> String {
    let (title, box_style, explanation) = match event.kind {
        AlertKind::High => (
            "HIGH PRICE ALERT",
            "background-color: #fff3cd; border-left: 4px solid #ffc107;",
            format!(
                "The electricity price has exceeded your high threshold of <strong>¢{:.2}</strong>.",
                event.threshold
            ),
        ),
        AlertKind::Low => (
            "LOW PRICE ALERT",
            "background-color: #d1ecf1; border-left: 4px solid #17a2b8;",
            format!(
                "The electricity price has dropped below your low threshold of <strong>¢{:.2}</strong>.",
                event.threshold
            ),
        ),
    };

    let previous_row = match event.previous_price {
        Some(previous) => format!(
            "<p><strong>Previous Price:</strong> ¢{:.2}</p>",
            previous
        ),
        None => String::new(),
    };

    let stop_block = match stop_url {
        Some(url) => format!(
            r#"<a href="{}" style="display: inline-block; padding: 12px 30px; background-color: #dc3545; color: white; text-decoration: none; border-radius: 5px; font-weight: bold;">🛑 STOP EMAIL ALERTS</a>"#,
            url
        ),
        None => r#"<p style="color: #666; font-size: 12px;">Stop alert functionality not available.</p>"#
            .to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .alert-box {{ {box_style} padding: 15px; margin: 20px 0; }}
        .price-info {{ background-color: #f8f9fa; padding: 15px; border-radius: 5px; margin: 15px 0; }}
    </style>
</head>
<body>
    <div class="container">
        <h2>⚠️ {title}</h2>
        <div class="alert-box"><strong>ALERT TYPE: {title}</strong></div>
        <div class="price-info">
            <p><strong>Current Price:</strong> ¢{price:.2}</p>
            <p><strong>Threshold:</strong> ¢{threshold:.2}</p>
            {previous_row}
        </div>
        <p>{explanation}</p>
        <p><strong>Time:</strong> {time}</p>
        <div style="text-align: center; margin: 30px 0;">{stop_block}</div>
    </div>
</body>
</html>
"#,
        box_style = box_style,
        title = title,
        price = event.price,
        threshold = event.threshold,
        previous_row = previous_row,
        explanation = explanation,
        time = event.observed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        stop_block = stop_block,
    )
}
