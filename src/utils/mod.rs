pub mod errors;
pub mod ratelimit;
pub mod table;

pub use errors::{extract_server_message, user_message};
pub use ratelimit::{configure_bank_rate_limit, throttle_bank_api};
pub use table::Table;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Format a money amount with two decimals and the currency code, e.g. `1,250.50 USD`
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded);
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}.{} {}", sign, grouped, fraction, currency)
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Decimal::new(125050, 2), "USD"), "1,250.50 USD");
        assert_eq!(format_money(Decimal::new(45, 0), "USD"), "45.00 USD");
        assert_eq!(format_money(Decimal::new(-1234567, 1), "EUR"), "-123,456.70 EUR");
        assert_eq!(format_money(Decimal::new(5, 3), "USD"), "0.01 USD");
    }

    #[test]
    fn test_format_timestamp() {
        let at = DateTime::parse_from_rfc3339("2026-03-01T09:30:12Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        assert_eq!(format_timestamp(&at), "2026-03-01 09:30 UTC");
    }
}
