use std::collections::HashMap;
use std::str::FromStr;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::RateRequest;
use crate::error::BudgetError;
use crate::models::CurrencyCode;

/// Source of `base → target` exchange rates.
pub(crate) trait RateProvider: Send + Sync {
    fn fetch_rate(&self, base: &CurrencyCode, target: &CurrencyCode) -> Result<Decimal, BudgetError>;
}

/// Result of a background lookup, tagged with the ticket it answers.
#[derive(Debug)]
pub(crate) struct RateResponse {
    pub(crate) ticket: u64,
    pub(crate) result: Result<Decimal, BudgetError>,
}

/// Run a lookup on a worker thread and post the answer to `tx`. The caller
/// keeps working while the request is in flight.
pub(crate) fn spawn_lookup(
    provider: Arc<dyn RateProvider>,
    request: RateRequest,
    tx: Sender<RateResponse>,
) {
    std::thread::spawn(move || {
        let result = provider.fetch_rate(&request.base, &request.target);
        // Receiver gone means the app is shutting down.
        let _ = tx.send(RateResponse {
            ticket: request.ticket,
            result,
        });
    });
}

/// Client for the Frankfurter API (`GET /latest?from=INR&to=USD`).
pub(crate) struct FrankfurterClient {
    client: Client,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    rates: HashMap<String, serde_json::Number>,
}

impl FrankfurterClient {
    pub(crate) fn new(api_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

impl RateProvider for FrankfurterClient {
    fn fetch_rate(&self, base: &CurrencyCode, target: &CurrencyCode) -> Result<Decimal, BudgetError> {
        let url = format!("{}/latest", self.api_url);
        tracing::debug!(%url, %base, %target, "requesting exchange rate");

        let response = self
            .client
            .get(&url)
            .query(&[("from", base.as_str()), ("to", target.as_str())])
            .send()
            .map_err(BudgetError::rate)?;

        if !response.status().is_success() {
            return Err(BudgetError::rate(format!(
                "rate request failed: {}",
                response.status()
            )));
        }

        let body = response.text().map_err(BudgetError::rate)?;
        parse_latest(&body, target)
    }
}

/// Pull the target rate out of a `/latest` body and insist it is a positive
/// number.
pub(crate) fn parse_latest(body: &str, target: &CurrencyCode) -> Result<Decimal, BudgetError> {
    let parsed: LatestResponse = serde_json::from_str(body)
        .map_err(|e| BudgetError::rate(format!("malformed rate response: {e}")))?;
    let raw = parsed
        .rates
        .get(target.as_str())
        .ok_or_else(|| BudgetError::rate(format!("no rate for {target} in response")))?;

    let text = raw.to_string();
    let rate = if text.contains(['e', 'E']) {
        Decimal::from_scientific(&text)
    } else {
        Decimal::from_str(&text)
    }
    .map_err(|e| BudgetError::rate(format!("unreadable rate {text}: {e}")))?;

    if rate <= Decimal::ZERO {
        return Err(BudgetError::rate(format!("non-positive rate {rate} for {target}")));
    }
    Ok(rate)
}
