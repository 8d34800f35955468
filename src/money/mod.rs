use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::BudgetError;
use crate::models::CurrencyCode;

/// Parse user-typed money. Accepts plain decimals with optional thousands
/// separators (`1,250.50`); rejects empty input, `NaN`, `inf` and anything
/// else that is not a finite number.
pub(crate) fn parse_amount(input: &str) -> Result<Decimal, BudgetError> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Err(BudgetError::invalid("amount is empty"));
    }
    Decimal::from_str(&cleaned)
        .map_err(|_| BudgetError::invalid(format!("'{}' is not a number", input.trim())))
}

/// Upper bound, in base currency, for the salary, a single expense and the
/// sum of all expenses: 10^15. Sums and currency projections of amounts this
/// size stay far inside what `Decimal` can hold.
pub(crate) const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

pub(crate) fn validate_salary(value: Decimal) -> Result<Decimal, BudgetError> {
    if value <= Decimal::ZERO {
        return Err(BudgetError::invalid("salary must be greater than zero"));
    }
    check_bound("salary", value)
}

/// Returns the trimmed name on success.
pub(crate) fn validate_expense(name: &str, amount: Decimal) -> Result<(String, Decimal), BudgetError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BudgetError::invalid("expense name cannot be empty"));
    }
    if amount <= Decimal::ZERO {
        return Err(BudgetError::invalid("expense amount must be greater than zero"));
    }
    let amount = check_bound("expense amount", amount)?;
    Ok((name.to_string(), amount))
}

/// `total + amount`, provided the result stays within [`MAX_AMOUNT`].
pub(crate) fn checked_total(total: Decimal, amount: Decimal) -> Result<Decimal, BudgetError> {
    total
        .checked_add(amount)
        .filter(|sum| *sum <= MAX_AMOUNT)
        .ok_or_else(|| {
            BudgetError::invalid(format!(
                "expenses would total more than {}",
                format_plain(MAX_AMOUNT)
            ))
        })
}

fn check_bound(what: &str, value: Decimal) -> Result<Decimal, BudgetError> {
    if value > MAX_AMOUNT {
        return Err(BudgetError::invalid(format!(
            "{what} cannot exceed {}",
            format_plain(MAX_AMOUNT)
        )));
    }
    Ok(value)
}

/// Round to cents for display. Internal arithmetic never calls this.
pub(crate) fn round_for_display(val: Decimal) -> Decimal {
    val.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.891` → `"1,234,567.89"`
pub(crate) fn format_plain(val: Decimal) -> String {
    let rounded = round_for_display(val);
    let formatted = format!("{:.2}", rounded.abs());
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if rounded < Decimal::ZERO {
        format!("-{with_commas}.{dec_part}")
    } else {
        format!("{with_commas}.{dec_part}")
    }
}

/// Format with the currency's symbol, e.g. `-₹1,200.00` or `CHF 15.00`.
pub(crate) fn format_amount(val: Decimal, currency: &CurrencyCode) -> String {
    let plain = format_plain(val);
    let (sign, digits) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    if currency.has_symbol() {
        format!("{sign}{}{digits}", currency.symbol())
    } else {
        format!("{sign}{currency} {digits}")
    }
}
