//! Money-movement flows.
//!
//! `Wallet` owns the session and a payment gateway and runs the two
//! flows that move money: top-up and send. Both validate locally, gate
//! on the PIN, call the provider, and only touch the ledger after the
//! provider declares success. A declined or failed provider call leaves
//! balance and history exactly as they were.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::api::{PaymentClient, PaymentGateway, SendMoneyRequest, TopUpRequest};
use crate::auth::Session;
use crate::config::Config;
use crate::error::WalletError;
use crate::models::{Account, Language, Transaction, TransactionDraft};
use crate::storage::KvStore;

/// What a completed flow hands back to the caller.
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    /// Provider's human-readable confirmation.
    pub message: String,
    /// The ledger entry that was recorded.
    pub transaction: Transaction,
    /// Balance after the mutation.
    pub balance: i64,
}

pub struct Wallet {
    session: Session,
    prefs: KvStore,
    gateway: Arc<dyn PaymentGateway>,
}

impl Wallet {
    /// Build a wallet over the given store and gateway, resuming any
    /// persisted session.
    pub fn new(store: KvStore, gateway: Arc<dyn PaymentGateway>) -> Self {
        let prefs = store.clone();
        let mut session = Session::new(store);
        session.restore();
        Self {
            session,
            prefs,
            gateway,
        }
    }

    /// Production wiring: account state in the platform data directory,
    /// payments through the configured HTTP gateway.
    pub fn open(config: &Config) -> Result<Self> {
        let store = KvStore::new(config.data_dir()?)?;
        let gateway: Arc<dyn PaymentGateway> = Arc::new(PaymentClient::from_config(config)?);
        Ok(Self::new(store, gateway))
    }

    // ===== Session passthroughs =====

    pub fn login(&mut self) -> Result<&Account, WalletError> {
        self.session.login()
    }

    pub fn signup(&mut self) -> Result<&Account, WalletError> {
        self.session.signup()
    }

    pub fn logout(&mut self) -> Result<(), WalletError> {
        self.session.logout()
    }

    pub fn account(&self) -> Option<&Account> {
        self.session.account()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn balance(&self) -> Option<i64> {
        self.session.balance()
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.session.transactions()
    }

    pub fn verify_pin(&self, candidate: &str) -> bool {
        self.session.verify_pin(candidate)
    }

    // ===== Preferences =====

    pub fn language(&self) -> Language {
        self.prefs.load_language()
    }

    pub fn set_language(&self, language: Language) -> Result<(), WalletError> {
        self.prefs
            .save_language(language)
            .map_err(WalletError::storage)
    }

    // ===== Flows =====

    /// Pull money from a mobile-money number into the wallet.
    ///
    /// Validation happens before the provider is contacted; the ledger is
    /// only touched once the provider has accepted the request.
    pub async fn top_up(
        &mut self,
        amount: i64,
        phone: &str,
        pin: &str,
    ) -> Result<TransferReceipt, WalletError> {
        if !self.session.is_authenticated() {
            return Err(WalletError::NoActiveSession);
        }
        if amount <= 0 {
            return Err(WalletError::InvalidAmount);
        }
        if !is_valid_msisdn(phone) {
            return Err(WalletError::InvalidPhone);
        }
        if !self.session.verify_pin(pin) {
            return Err(WalletError::IncorrectPin);
        }

        let request = TopUpRequest {
            amount,
            phone: phone.to_string(),
            pin: pin.to_string(),
        };
        let outcome = self.gateway.top_up(&request).await;
        if !outcome.success {
            warn!(
                provider = %self.gateway.name(),
                reason = %outcome.failure_reason(),
                "Top-up declined"
            );
            return Err(WalletError::PaymentDeclined(
                outcome.failure_reason().to_string(),
            ));
        }

        // The provider has already moved the money; a persist failure here
        // leaves the wallet behind the provider's books.
        let balance = self.session.update_balance(amount).map_err(|e| {
            error!(amount, error = %e, "Top-up accepted but recording it failed");
            e
        })?;
        let transaction = self
            .session
            .add_transaction(TransactionDraft::top_up(amount))?
            .clone();

        info!(amount, balance, "Top-up completed");
        Ok(TransferReceipt {
            message: outcome.message,
            transaction,
            balance,
        })
    }

    /// Send money to a recipient identified by phone number, QR scan, or
    /// NFC tag. The fee comes back from the provider and is debited along
    /// with the amount.
    ///
    /// The balance check covers the amount only, matching what the sender
    /// was shown before confirming; the fee can push the balance below
    /// zero by at most 1% of it.
    pub async fn send_money(
        &mut self,
        amount: i64,
        recipient: &str,
        pin: &str,
    ) -> Result<TransferReceipt, WalletError> {
        if !self.session.is_authenticated() {
            return Err(WalletError::NoActiveSession);
        }
        if amount <= 0 {
            return Err(WalletError::InvalidAmount);
        }
        let recipient = recipient.trim();
        if recipient.is_empty() {
            return Err(WalletError::InvalidRecipient);
        }
        let balance = self.session.balance().unwrap_or(0);
        if amount > balance {
            return Err(WalletError::InsufficientFunds { amount, balance });
        }
        if !self.session.verify_pin(pin) {
            return Err(WalletError::IncorrectPin);
        }

        let request = SendMoneyRequest {
            amount,
            recipient: recipient.to_string(),
            pin: pin.to_string(),
        };
        let outcome = self.gateway.send_money(&request).await;
        if !outcome.success {
            warn!(
                provider = %self.gateway.name(),
                reason = %outcome.failure_reason(),
                "Transfer declined"
            );
            return Err(WalletError::PaymentDeclined(
                outcome.failure_reason().to_string(),
            ));
        }

        let fee = outcome.fee.unwrap_or(0);
        // Same as top-up: the transfer already happened remotely.
        let balance = self.session.update_balance(-(amount + fee)).map_err(|e| {
            error!(amount, fee, error = %e, "Transfer accepted but recording it failed");
            e
        })?;
        let transaction = self
            .session
            .add_transaction(TransactionDraft::send(amount, fee, recipient))?
            .clone();

        info!(amount, fee, balance, recipient, "Transfer completed");
        Ok(TransferReceipt {
            message: outcome.message,
            transaction,
            balance,
        })
    }
}

/// Cameroon mobile number in international format: 2376 followed by
/// eight more digits.
fn is_valid_msisdn(phone: &str) -> bool {
    phone.len() == 12 && phone.starts_with("2376") && phone.chars().all(|c| c.is_ascii_digit())
}
