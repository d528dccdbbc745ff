use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request to pull money from a mobile-money number into the wallet.
///
/// The PIN is carried for providers that confirm it themselves; the HTTP
/// gateway never puts it on the wire.
#[derive(Debug, Clone)]
pub struct TopUpRequest {
    pub amount: i64,
    pub phone: String,
    pub pin: String,
}

/// Request to push money from the wallet to a recipient.
#[derive(Debug, Clone)]
pub struct SendMoneyRequest {
    pub amount: i64,
    pub recipient: String,
    pub pin: String,
}

/// Uniform result of a payment attempt.
///
/// Failures are part of the outcome rather than an `Err`: a declined or
/// unreachable provider is an expected answer, and the flow decides what
/// to do with it. `success == false` always comes with `error` set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<i64>,
    #[serde(rename = "transactionId", skip_serializing_if = "Option::is_none")]
    pub transaction_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PaymentOutcome {
    pub fn accepted(message: impl Into<String>) -> Self {
        PaymentOutcome {
            success: true,
            message: message.into(),
            fee: None,
            transaction_ref: None,
            error: None,
        }
    }

    pub fn declined(message: impl Into<String>, error: impl Into<String>) -> Self {
        PaymentOutcome {
            success: false,
            message: message.into(),
            fee: None,
            transaction_ref: None,
            error: Some(error.into()),
        }
    }

    /// Error text for display, falling back to the message when the
    /// provider sent no separate error field.
    pub fn failure_reason(&self) -> &str {
        self.error.as_deref().unwrap_or(&self.message)
    }
}

/// A payment provider the wallet can move money through.
///
/// Implementations never return `Err`: transport problems, declines, and
/// malformed replies all fold into a `PaymentOutcome` with `success` false.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    async fn top_up(&self, request: &TopUpRequest) -> PaymentOutcome;

    async fn send_money(&self, request: &SendMoneyRequest) -> PaymentOutcome;
}

/// Published transfer fee: 1% of the amount, rounded half up to a whole
/// franc. The authoritative figure still arrives in the payment outcome;
/// this is for previews before the request is sent.
pub fn standard_transfer_fee(amount: i64) -> i64 {
    (amount + 50) / 100
}
