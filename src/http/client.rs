//! Low-level HTTP client — `PricingHttp`.
//!
//! One method per API endpoint, returning wire types. Failures map to typed
//! errors; callers treat any error as "no data" and keep their last-good
//! state. No automatic retry — the caller relies on the user's next edit or
//! the throttle's next tick.

use crate::domain::quote::wire::{CalcRequest, CalcResponse};
use crate::error::HttpError;
use crate::network::REQUEST_TIMEOUT_SECS;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Low-level HTTP client for the pricing REST API.
#[derive(Clone)]
pub struct PricingHttp {
    base_url: String,
    client: Client,
}

impl PricingHttp {
    pub fn new(base_url: &str, serial: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Serial",
            HeaderValue::from_str(serial).expect("invalid serial header value"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Price one side of a pair.
    pub async fn pair_calc(&self, request: &CalcRequest) -> Result<CalcResponse, HttpError> {
        let url = format!("{}/b2api/change/user/pair/calc", self.base_url);
        self.post(&url, request).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, HttpError> {
        let resp = self.client.post(url).json(body).send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Reqwest(e)
            }
        })?;

        let status = resp.status();
        if status.is_success() {
            let parsed = resp.json::<T>().await?;
            return Ok(parsed);
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();
        tracing::debug!(status = status_code, url, "pricing request failed");

        match status_code {
            401 => Err(HttpError::Unauthorized),
            404 => Err(HttpError::NotFound(body_text)),
            429 => Err(HttpError::RateLimited {
                retry_after_ms: None,
            }),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}
