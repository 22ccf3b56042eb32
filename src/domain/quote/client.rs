//! Pricing gateway — the seam between the calculator and the remote service.
//!
//! The coordinator depends only on [`PricingGateway`], so tests inject a fake
//! and production injects [`HttpGateway`].

use super::wire::CalcRequest;
use super::Quote;
use crate::error::HttpError;
use async_trait::async_trait;

/// Abstract request/response contract of the remote pricing service.
#[async_trait]
pub trait PricingGateway: Send + Sync {
    /// Price one side of the pair; the service solves for the side the
    /// request leaves `null`.
    async fn pair_calc(&self, request: CalcRequest) -> Result<Quote, HttpError>;
}

/// Production gateway backed by [`crate::http::PricingHttp`].
#[cfg(feature = "http")]
pub struct HttpGateway {
    http: crate::http::PricingHttp,
}

#[cfg(feature = "http")]
impl HttpGateway {
    pub fn new(http: crate::http::PricingHttp) -> Self {
        Self { http }
    }

    /// Gateway against `base_url` with the given serial header.
    pub fn connect(base_url: &str, serial: &str) -> Self {
        Self::new(crate::http::PricingHttp::new(base_url, serial))
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl PricingGateway for HttpGateway {
    async fn pair_calc(&self, request: CalcRequest) -> Result<Quote, HttpError> {
        Ok(self.http.pair_calc(&request).await?.into())
    }
}
