//! In-process payment provider for demo mode and tests.
//!
//! Mirrors how the hosted provider answers, including its own PIN check:
//! the provider keeps its own idea of the correct PIN, so a wallet whose
//! local PIN matches can still be declined here and vice versa.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::models::transaction::new_reference;

use super::{standard_transfer_fee, PaymentGateway, PaymentOutcome, SendMoneyRequest, TopUpRequest};

/// PIN the simulated provider accepts by default.
const MOCK_PIN: &str = "1234";

pub struct MockGateway {
    pin: String,
    latency: Option<Duration>,
    fail_network: AtomicBool,
    calls: AtomicUsize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            pin: MOCK_PIN.to_string(),
            latency: None,
            fail_network: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider-side PIN, for exercising declines against a wallet whose
    /// local PIN differs.
    pub fn with_pin(pin: &str) -> Self {
        Self {
            pin: pin.to_string(),
            ..Self::new()
        }
    }

    /// Add a fixed delay before every reply.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every subsequent request fail as if the network were down.
    pub fn set_fail_network(&self, fail: bool) {
        self.fail_network.store(fail, Ordering::Relaxed);
    }

    /// Number of requests received, across both operations.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    async fn simulate_conditions(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn check_pin(&self, candidate: &str) -> Option<PaymentOutcome> {
        if candidate != self.pin {
            Some(PaymentOutcome::declined(
                "Invalid PIN",
                "The PIN you entered is incorrect",
            ))
        } else {
            None
        }
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &str {
        "mock"
    }

    async fn top_up(&self, request: &TopUpRequest) -> PaymentOutcome {
        self.simulate_conditions().await;

        if self.fail_network.load(Ordering::Relaxed) {
            return PaymentOutcome::declined(
                "Network error",
                "Failed to connect to payment provider",
            );
        }
        if let Some(declined) = self.check_pin(&request.pin) {
            return declined;
        }

        PaymentOutcome {
            success: true,
            message: format!("Successfully topped up {}", request.amount),
            fee: None,
            transaction_ref: Some(new_reference("top")),
            error: None,
        }
    }

    async fn send_money(&self, request: &SendMoneyRequest) -> PaymentOutcome {
        self.simulate_conditions().await;

        if self.fail_network.load(Ordering::Relaxed) {
            return PaymentOutcome::declined("Network error", "Failed to complete transaction");
        }
        if let Some(declined) = self.check_pin(&request.pin) {
            return declined;
        }

        PaymentOutcome {
            success: true,
            message: format!(
                "Successfully sent {} to {}",
                request.amount, request.recipient
            ),
            fee: Some(standard_transfer_fee(request.amount)),
            transaction_ref: Some(new_reference("send")),
            error: None,
        }
    }
}
