//! HTTP client for the hosted payment API.
//!
//! This module provides the `PaymentClient` struct implementing
//! `PaymentGateway` against the Nkwa collect/disburse endpoints.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::Config;

use super::{ApiError, PaymentGateway, PaymentOutcome, SendMoneyRequest, TopUpRequest};

/// Base URL for the payment API staging environment.
pub const DEFAULT_API_BASE_URL: &str = "https://api.pay.staging.mynkwa.com";

/// HTTP request timeout in seconds.
/// 30s allows for slow provider responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fallback shown when a top-up fails without a provider reason.
const TOP_UP_FAILED: &str = "Top-up failed";

/// Fallback shown when a transfer fails without a provider reason.
const SEND_FAILED: &str = "Transfer failed";

/// Reply body from the payment API. Every field is optional so a terse
/// reply still parses; `Message` is the name some endpoints use for the
/// error text on rejection bodies.
#[derive(Debug, Deserialize)]
struct WireOutcome {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, alias = "Message")]
    error: Option<String>,
    #[serde(default)]
    fee: Option<i64>,
    #[serde(default, rename = "transactionId")]
    transaction_ref: Option<String>,
}

/// Client for the payment API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct PaymentClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl PaymentClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api_base_url.clone(), config.api_key.clone())
    }

    async fn post_payment(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<PaymentOutcome, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "Sending payment request");

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_status(status, &text));
        }

        Self::parse_outcome(&text)
    }

    /// Map a 2xx reply body onto a `PaymentOutcome`. An accepted request
    /// with no explicit `success` field counts as successful.
    fn parse_outcome(text: &str) -> Result<PaymentOutcome, ApiError> {
        let wire: WireOutcome = serde_json::from_str(text)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        Ok(PaymentOutcome {
            success: wire.success.unwrap_or(true),
            message: wire
                .message
                .unwrap_or_else(|| "Payment accepted".to_string()),
            fee: wire.fee,
            transaction_ref: wire.transaction_ref,
            error: wire.error,
        })
    }
}

#[async_trait]
impl PaymentGateway for PaymentClient {
    fn name(&self) -> &str {
        "nkwa"
    }

    async fn top_up(&self, request: &TopUpRequest) -> PaymentOutcome {
        // The PIN stays local; the provider confirms on the handset.
        let body = json!({
            "amount": request.amount,
            "phone": request.phone,
        });

        match self.post_payment("/collect", body).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Top-up request failed");
                PaymentOutcome::declined(TOP_UP_FAILED, e.to_string())
            }
        }
    }

    async fn send_money(&self, request: &SendMoneyRequest) -> PaymentOutcome {
        let body = json!({
            "amount": request.amount,
            "phone": request.recipient,
        });

        match self.post_payment("/disburse", body).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Transfer request failed");
                PaymentOutcome::declined(SEND_FAILED, e.to_string())
            }
        }
    }
}
