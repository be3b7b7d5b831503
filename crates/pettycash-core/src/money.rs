use rust_decimal::Decimal;

use crate::error::{PettyCashError, Result};

/// Two amounts closer than this are treated as equal.
pub fn tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

/// Ceiling for any single float, request, bill or reimbursement amount.
pub fn max_amount() -> Decimal {
    Decimal::new(1_000_000_000_000, 0)
}

pub fn within_limit(amount: Decimal) -> bool {
    amount <= max_amount()
}

pub fn amounts_match(expected: Decimal, actual: Decimal) -> bool {
    (expected - actual).abs() <= tolerance()
}

pub fn ensure_matches(context: &'static str, expected: Decimal, actual: Decimal) -> Result<()> {
    if amounts_match(expected, actual) {
        Ok(())
    } else {
        Err(PettyCashError::AmountMismatch {
            context,
            expected,
            actual,
        })
    }
}

/// Renders `1234567.5` as `1,234,567.50`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (position, digit) in whole.chars().enumerate() {
        if position > 0 && (whole.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}
