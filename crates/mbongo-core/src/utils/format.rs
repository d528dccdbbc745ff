use chrono::{DateTime, Utc};

/// Format an amount of whole XAF francs for display: "12 500 FCFA".
/// The currency has no minor unit, so there is never a decimal part.
pub fn format_currency(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let digits = amount.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }

    format!("{}{} FCFA", sign, grouped)
}

/// Format a Cameroon mobile number for display: 2376XXXXXXXX becomes
/// "237 6XX XX XX XX". Anything else is returned as typed.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 12 && digits.starts_with("2376") {
        format!(
            "{} {} {} {} {}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..8],
            &digits[8..10],
            &digits[10..12]
        )
    } else {
        phone.to_string() // Return original if can't format
    }
}

/// Format a timestamp for transaction history rows
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%b %d, %Y %H:%M").to_string()
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0), "0 FCFA");
        assert_eq!(format_currency(500), "500 FCFA");
        assert_eq!(format_currency(7500), "7 500 FCFA");
        assert_eq!(format_currency(10_000), "10 000 FCFA");
        assert_eq!(format_currency(1_234_567), "1 234 567 FCFA");
        assert_eq!(format_currency(-2525), "-2 525 FCFA");
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("237650123456"), "237 650 12 34 56");
        assert_eq!(format_phone("237 650 123 456"), "237 650 12 34 56");
        assert_eq!(format_phone("650123456"), "650123456"); // no country code, as-is
        assert_eq!(format_phone("not a number"), "not a number");
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 4, 29, 16, 5, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "Apr 29, 2024 16:05");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }
}
