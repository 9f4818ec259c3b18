// src/price_feed.rs - ComEd hourly pricing API client

use std::time::Duration;

use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::errors::FetchError;
use crate::types::PriceSample;

pub const COMED_API_URL: &str = "https://hourlypricing.comed.com/api?type=currenthouraverage";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The API returns an array of rows with string-encoded numbers, e.g.
/// `[{"millisUTC":"1547146800000","price":"2.6"}]`. Newest row first.
#[derive(Debug, Deserialize)]
struct PriceRow {
    price: String,
    #[serde(rename = "millisUTC")]
    millis_utc: String,
}

pub struct PriceFeed {
    client: Client,
    url: String,
}

impl PriceFeed {
    pub fn new() -> Self {
        Self::with_url(COMED_API_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            url: url.into(),
        }
    }

    /// One round trip to the pricing endpoint. Returns the current-hour
    /// average as a sample, or a FetchError the caller is expected to log
    /// and skip.
    pub async fn fetch_current(&self) -> Result<PriceSample, FetchError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let rows: Vec<PriceRow> = response.json().await?;
        debug!("📊 Price API returned {} row(s)", rows.len());

        sample_from_rows(rows)
    }
}

impl Default for PriceFeed {
    fn default() -> Self {
        Self::new()
    }
}

fn sample_from_rows(rows: Vec<PriceRow>) -> Result<PriceSample, FetchError> {
    let row = rows.into_iter().next().ok_or(FetchError::EmptyPayload)?;

    let price: f64 = row
        .price
        .trim()
        .parse()
        .map_err(|_| FetchError::MalformedField {
            field: "price",
            value: row.price.clone(),
        })?;

    let millis: i64 = row
        .millis_utc
        .trim()
        .parse()
        .map_err(|_| FetchError::MalformedField {
            field: "millisUTC",
            value: row.millis_utc.clone(),
        })?;

    let observed_at = Utc
        .timestamp_millis_opt(millis)
        .single()
        .ok_or(FetchError::MalformedField {
            field: "millisUTC",
            value: row.millis_utc,
        })?;

    Ok(PriceSample { price, observed_at })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn rows_from(json: &str) -> Vec<PriceRow> {
        serde_json::from_str(json).expect("test payload should deserialize")
    }

    #[test]
    fn parses_current_hour_payload() {
        let rows = rows_from(r#"[{"millisUTC":"1547146800000","price":"2.6"}]"#);
        let sample = sample_from_rows(rows).unwrap();
        assert_eq!(sample.price, 2.6);
        assert_eq!(sample.observed_at.year(), 2019);
    }

    #[test]
    fn uses_first_row_when_multiple() {
        let rows = rows_from(
            r#"[{"millisUTC":"1547146800000","price":"4.1"},
                {"millisUTC":"1547143200000","price":"9.9"}]"#,
        );
        let sample = sample_from_rows(rows).unwrap();
        assert_eq!(sample.price, 4.1);
    }

    #[test]
    fn empty_array_is_an_error() {
        let err = sample_from_rows(Vec::new()).unwrap_err();
        assert!(matches!(err, FetchError::EmptyPayload));
    }

    #[test]
    fn malformed_price_is_an_error() {
        let rows = rows_from(r#"[{"millisUTC":"1547146800000","price":"n/a"}]"#);
        let err = sample_from_rows(rows).unwrap_err();
        assert!(matches!(err, FetchError::MalformedField { field: "price", .. }));
    }

    #[test]
    fn malformed_timestamp_is_an_error() {
        let rows = rows_from(r#"[{"millisUTC":"soon","price":"2.6"}]"#);
        let err = sample_from_rows(rows).unwrap_err();
        assert!(matches!(
            err,
            FetchError::MalformedField {
                field: "millisUTC",
                ..
            }
        ));
    }
}
