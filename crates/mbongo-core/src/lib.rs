//! Core library for the mbongo mobile-money wallet.
//!
//! Everything the wallet needs away from the screen lives here:
//!
//! - `cache`: offline request cache with install/activate lifecycle and
//!   per-URL strategies (network-first for API calls, cache-first for
//!   the application shell)
//! - `auth`: the single demo session and its ledger
//! - `api`: payment gateway trait, HTTP client, and mock provider
//! - `wallet`: top-up and send-money flows tying session and gateway
//!   together
//! - `storage`: file-backed key/value persistence for account state and
//!   preferences
//!
//! The wallet runs entirely on the client. There is no server-side user
//! store; authentication is demo-only and the payment provider is the
//! sole remote collaborator.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod utils;
pub mod wallet;

pub use config::Config;
pub use error::WalletError;
pub use wallet::{TransferReceipt, Wallet};
