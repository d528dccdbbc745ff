//! PIN helpers.
//!
//! The obfuscation here is a stand-in, not encryption: it hides the PIN
//! from a casual glance at a log line and nothing more. Demo accounts
//! carry no real credentials, so nothing stronger is warranted.

use chrono::Utc;

/// Tag marking a value produced by `obfuscate_pin`.
const OBFUSCATION_TAG: &str = "demo";

/// True when the candidate has the required shape: exactly four ASCII
/// digits, nothing else.
pub fn is_valid_pin(pin: &str) -> bool {
    pin.len() == 4 && pin.chars().all(|c| c.is_ascii_digit())
}

/// Obfuscate a PIN for display or logging: each digit is rotated by five
/// and the result is tagged and timestamped, e.g. `demo-6789-1714406400123`.
pub fn obfuscate_pin(pin: &str) -> String {
    let rotated: String = pin.chars().map(rotate_digit).collect();
    format!(
        "{}-{}-{}",
        OBFUSCATION_TAG,
        rotated,
        Utc::now().timestamp_millis()
    )
}

/// Reverse `obfuscate_pin`. Returns None for values that were not
/// produced by it.
pub fn recover_pin(obfuscated: &str) -> Option<String> {
    let mut parts = obfuscated.splitn(3, '-');
    if parts.next() != Some(OBFUSCATION_TAG) {
        return None;
    }
    let rotated = parts.next()?;
    let timestamp = parts.next()?;
    if timestamp.is_empty() || !timestamp.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if !rotated.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(rotated.chars().map(rotate_digit).collect())
}

/// Digit rotation by five is its own inverse.
fn rotate_digit(c: char) -> char {
    match c.to_digit(10) {
        Some(d) => char::from_digit((d + 5) % 10, 10).unwrap_or(c),
        None => c,
    }
}
