//! Utility functions for display formatting and PIN handling.

pub mod format;
pub mod pin;

// Re-export commonly used functions at module level
pub use format::{format_currency, format_phone, format_timestamp, truncate_string};
pub use pin::{is_valid_pin, obfuscate_pin, recover_pin};
