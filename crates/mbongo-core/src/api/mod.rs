//! Payment provider integration.
//!
//! This module defines the `PaymentGateway` trait the wallet moves money
//! through, the `PaymentClient` implementation against the hosted
//! collect/disburse API, and a `MockGateway` for demo mode and tests.
//!
//! The hosted API uses bearer token authentication with a key issued by
//! the provider's dashboard.

pub mod client;
pub mod error;
pub mod gateway;
pub mod mock;

pub use client::{PaymentClient, DEFAULT_API_BASE_URL};
pub use error::ApiError;
pub use gateway::{
    standard_transfer_fee, PaymentGateway, PaymentOutcome, SendMoneyRequest, TopUpRequest,
};
pub use mock::MockGateway;
