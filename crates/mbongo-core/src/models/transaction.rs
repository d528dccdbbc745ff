use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of the random suffix appended to transaction references.
const REFERENCE_SUFFIX_LEN: usize = 7;

/// Base-36 alphabet used for reference suffixes.
const REFERENCE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    #[serde(rename = "send")]
    Send,
    #[serde(rename = "receive")]
    Receive,
    #[serde(rename = "top-up")]
    TopUp,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Send => write!(f, "Send"),
            TransactionKind::Receive => write!(f, "Receive"),
            TransactionKind::TopUp => write!(f, "Top-up"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "failed")]
    Failed,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Completed => write!(f, "Completed"),
            TransactionStatus::Pending => write!(f, "Pending"),
            TransactionStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// A single ledger entry as stored on the account.
///
/// Amounts are whole XAF francs; the currency has no minor unit. `fee` is
/// recorded separately from `amount` so history screens can show both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: i64,
    #[serde(default)]
    pub fee: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
}

impl Transaction {
    /// Materialize a draft into a full entry, assigning it a fresh
    /// reference and the current time.
    pub fn from_draft(draft: TransactionDraft) -> Self {
        Transaction {
            id: new_reference("tx"),
            kind: draft.kind,
            amount: draft.amount,
            fee: draft.fee,
            sender: draft.sender,
            receiver: draft.receiver,
            timestamp: Utc::now(),
            status: draft.status,
        }
    }

    /// Signed effect of this entry on the account balance.
    pub fn balance_delta(&self) -> i64 {
        match self.kind {
            TransactionKind::Send => -(self.amount + self.fee),
            TransactionKind::Receive => self.amount,
            TransactionKind::TopUp => self.amount,
        }
    }

    pub fn counterparty(&self) -> Option<&str> {
        match self.kind {
            TransactionKind::Send => self.receiver.as_deref(),
            TransactionKind::Receive => self.sender.as_deref(),
            TransactionKind::TopUp => None,
        }
    }
}

/// What a caller supplies when recording a transaction. The ledger fills
/// in the id and timestamp itself.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub amount: i64,
    pub fee: i64,
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub status: TransactionStatus,
}

impl TransactionDraft {
    pub fn top_up(amount: i64) -> Self {
        TransactionDraft {
            kind: TransactionKind::TopUp,
            amount,
            fee: 0,
            sender: None,
            receiver: None,
            status: TransactionStatus::Completed,
        }
    }

    pub fn send(amount: i64, fee: i64, receiver: &str) -> Self {
        TransactionDraft {
            kind: TransactionKind::Send,
            amount,
            fee,
            sender: None,
            receiver: Some(receiver.to_string()),
            status: TransactionStatus::Completed,
        }
    }

    pub fn receive(amount: i64, sender: &str) -> Self {
        TransactionDraft {
            kind: TransactionKind::Receive,
            amount,
            fee: 0,
            sender: Some(sender.to_string()),
            receiver: None,
            status: TransactionStatus::Completed,
        }
    }
}

/// Build a reference like `tx-1714406400123-k3xp91a`: a prefix, the current
/// unix time in milliseconds, and a short random base-36 suffix.
pub fn new_reference(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..REFERENCE_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..REFERENCE_ALPHABET.len());
            REFERENCE_ALPHABET[idx] as char
        })
        .collect();
    format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), suffix)
}
