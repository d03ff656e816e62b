use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Treat blanks and a literal `null` as SQL NULL.
pub fn is_null(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null")
}

/// Parse a date trying each chrono layout in order.
pub fn parse_date(value: &str, formats: &[String]) -> Result<NaiveDate, String> {
    let trimmed = value.trim();
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| format!("invalid date '{}'", trimmed))
}

pub fn parse_decimal(value: &str) -> Result<Decimal, String> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| format!("invalid numeric '{}'", trimmed))
}

/// Parse an integer, accepting integral decimals such as `3.0`.
pub fn parse_int(value: &str) -> Result<i64, String> {
    let trimmed = value.trim();
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Ok(parsed);
    }

    let decimal = Decimal::from_str(trimmed).map_err(|_| format!("invalid integer '{}'", trimmed))?;
    if decimal.fract().is_zero() {
        i64::try_from(decimal).map_err(|_| format!("integer out of range '{}'", trimmed))
    } else {
        Err(format!("invalid integer '{}'", trimmed))
    }
}
