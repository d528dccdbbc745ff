use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// Fixed demo identity. Login and signup both install this account; there
/// is no server-side user store in demo mode.
pub const DEMO_ACCOUNT_ID: &str = "demo123";
pub const DEMO_ACCOUNT_NAME: &str = "Demo User";
pub const DEMO_ACCOUNT_EMAIL: &str = "demo@example.com";
pub const DEMO_ACCOUNT_PIN: &str = "1234";

/// Opening balance for a fresh demo account, in whole XAF francs.
pub const DEMO_OPENING_BALANCE: i64 = 10_000;

/// The authenticated wallet holder and their ledger.
///
/// `transactions` is ordered most-recent-first; new entries are prepended.
/// The PIN is stored in the clear. Demo accounts carry no real credentials,
/// so there is nothing worth protecting at rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub balance: i64,
    pub pin: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build the demo account with its opening balance and empty ledger.
    pub fn demo() -> Self {
        Account {
            id: DEMO_ACCOUNT_ID.to_string(),
            name: DEMO_ACCOUNT_NAME.to_string(),
            email: DEMO_ACCOUNT_EMAIL.to_string(),
            balance: DEMO_OPENING_BALANCE,
            pin: DEMO_ACCOUNT_PIN.to_string(),
            transactions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Most recent ledger entry, if any.
    pub fn latest_transaction(&self) -> Option<&Transaction> {
        self.transactions.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_account() {
        let account = Account::demo();
        assert_eq!(account.id, "demo123");
        assert_eq!(account.name, "Demo User");
        assert_eq!(account.email, "demo@example.com");
        assert_eq!(account.balance, 10_000);
        assert_eq!(account.pin, "1234");
        assert!(account.transactions.is_empty());
    }

    #[test]
    fn test_account_json_round_trip() {
        let account = Account::demo();
        let json = serde_json::to_string(&account).expect("serialize");
        assert!(json.contains("\"createdAt\"")); // camelCase on the wire
        let parsed: Account = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed.id, account.id);
        assert_eq!(parsed.balance, account.balance);
    }

    #[test]
    fn test_deserialize_without_transactions() {
        let json = r#"{
            "id": "demo123",
            "name": "Demo User",
            "email": "demo@example.com",
            "balance": 10000,
            "pin": "1234",
            "createdAt": "2024-04-29T16:00:00Z"
        }"#;
        let account: Account = serde_json::from_str(json).expect("parse");
        assert!(account.transactions.is_empty());
        assert!(account.latest_transaction().is_none());
    }
}
