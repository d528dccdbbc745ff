//! Data models for wallet entities.
//!
//! This module contains the data structures the wallet persists and
//! shows on screen:
//!
//! - `Account`: the authenticated holder, their balance and ledger
//! - `Transaction`, `TransactionDraft`: ledger entries and how they are recorded
//! - `Language`: interface language preference

pub mod account;
pub mod language;
pub mod transaction;

pub use account::{
    Account, DEMO_ACCOUNT_EMAIL, DEMO_ACCOUNT_ID, DEMO_ACCOUNT_NAME, DEMO_ACCOUNT_PIN,
    DEMO_OPENING_BALANCE,
};
pub use language::Language;
pub use transaction::{Transaction, TransactionDraft, TransactionKind, TransactionStatus};
