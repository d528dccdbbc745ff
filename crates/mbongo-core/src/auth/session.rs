use tracing::{debug, info};

use crate::error::WalletError;
use crate::models::{Account, Transaction, TransactionDraft};
use crate::storage::KvStore;

/// The active account and its ledger.
///
/// At most one account is signed in at a time. Every mutation writes the
/// updated account to storage first and only replaces the in-memory copy
/// once the write succeeds, so a failed write leaves the session on the
/// last durable state.
pub struct Session {
    store: KvStore,
    account: Option<Account>,
}

impl Session {
    pub fn new(store: KvStore) -> Self {
        Self {
            store,
            account: None,
        }
    }

    /// Restore a previously persisted account. Returns true when a session
    /// was resumed. A missing or unreadable record means signed out.
    pub fn restore(&mut self) -> bool {
        match self.store.load_account() {
            Some(account) => {
                debug!(account_id = %account.id, "Restored persisted session");
                self.account = Some(account);
                true
            }
            None => false,
        }
    }

    /// Sign in as the demo account. Credentials are not checked in demo
    /// mode; any caller gets the fixed demo identity with its opening
    /// balance and an empty ledger.
    pub fn login(&mut self) -> Result<&Account, WalletError> {
        let account = Account::demo();
        self.store
            .save_account(&account)
            .map_err(WalletError::storage)?;
        info!(account_id = %account.id, "Session started");
        Ok(self.account.insert(account))
    }

    /// Demo signup is identical to login: the submitted details are
    /// discarded and the fixed demo account is installed.
    pub fn signup(&mut self) -> Result<&Account, WalletError> {
        self.login()
    }

    /// End the session and erase the persisted account. The in-memory
    /// account is dropped even when the stored record fails to delete.
    pub fn logout(&mut self) -> Result<(), WalletError> {
        self.account = None;
        self.store.clear_account().map_err(WalletError::storage)?;
        info!("Session ended");
        Ok(())
    }

    /// Apply a signed delta to the balance and return the new balance.
    /// Negative results are allowed here; flows that care check first.
    pub fn update_balance(&mut self, delta: i64) -> Result<i64, WalletError> {
        let account = self.account.as_ref().ok_or(WalletError::NoActiveSession)?;

        let mut updated = account.clone();
        updated.balance += delta;
        self.store
            .save_account(&updated)
            .map_err(WalletError::storage)?;

        let balance = updated.balance;
        self.account = Some(updated);
        Ok(balance)
    }

    /// Record a ledger entry at the head of the history and return it.
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<&Transaction, WalletError> {
        let account = self.account.as_ref().ok_or(WalletError::NoActiveSession)?;

        if draft.amount <= 0 {
            return Err(WalletError::InvalidTransaction(
                "amount must be greater than zero".to_string(),
            ));
        }
        if draft.fee < 0 {
            return Err(WalletError::InvalidTransaction(
                "fee cannot be negative".to_string(),
            ));
        }

        let transaction = Transaction::from_draft(draft);

        let mut updated = account.clone();
        updated.transactions.insert(0, transaction);
        self.store
            .save_account(&updated)
            .map_err(WalletError::storage)?;

        let account = self.account.insert(updated);
        Ok(&account.transactions[0])
    }

    /// Compare a candidate against the account PIN. False when signed out;
    /// the comparison is exact, so a padded or truncated entry fails.
    pub fn verify_pin(&self, candidate: &str) -> bool {
        self.account
            .as_ref()
            .map(|a| a.pin == candidate)
            .unwrap_or(false)
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.account.is_some()
    }

    pub fn balance(&self) -> Option<i64> {
        self.account.as_ref().map(|a| a.balance)
    }

    /// Ledger entries, most recent first. Empty when signed out.
    pub fn transactions(&self) -> &[Transaction] {
        self.account
            .as_ref()
            .map(|a| a.transactions.as_slice())
            .unwrap_or(&[])
    }
}
