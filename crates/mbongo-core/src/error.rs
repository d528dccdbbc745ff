use thiserror::Error;

/// Errors surfaced by wallet operations.
///
/// Every variant maps to a message shown to the account holder; none of
/// them should abort the application.
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("No active session - log in first")]
    NoActiveSession,

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Phone number must be a Cameroon mobile number (2376XXXXXXXX)")]
    InvalidPhone,

    #[error("Recipient is required")]
    InvalidRecipient,

    #[error("Insufficient balance: sending {amount} FCFA but only {balance} FCFA available")]
    InsufficientFunds { amount: i64, balance: i64 },

    #[error("Incorrect PIN")]
    IncorrectPin,

    #[error("Payment declined: {0}")]
    PaymentDeclined(String),

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl WalletError {
    /// Wrap a persistence failure, keeping only its display form.
    pub fn storage(err: anyhow::Error) -> Self {
        WalletError::Storage(format!("{:#}", err))
    }

    /// True for errors caused by what the caller typed, as opposed to
    /// session state, persistence, or the payment provider.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WalletError::InvalidAmount
                | WalletError::InvalidPhone
                | WalletError::InvalidRecipient
                | WalletError::InsufficientFunds { .. }
                | WalletError::IncorrectPin
                | WalletError::InvalidTransaction(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_funds_message() {
        let err = WalletError::InsufficientFunds {
            amount: 5000,
            balance: 1200,
        };
        let msg = err.to_string();
        assert!(msg.contains("5000"));
        assert!(msg.contains("1200"));
    }

    #[test]
    fn test_is_validation() {
        assert!(WalletError::InvalidAmount.is_validation());
        assert!(WalletError::IncorrectPin.is_validation());
        assert!(!WalletError::NoActiveSession.is_validation());
        assert!(!WalletError::PaymentDeclined("declined".to_string()).is_validation());
        assert!(!WalletError::Storage("disk full".to_string()).is_validation());
    }
}
