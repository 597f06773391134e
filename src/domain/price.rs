//! Exact decimal prices kept as fixed two-decimal strings.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::error::ValidationError;

const PRICE_SCALE: u32 = 2;

/// Largest amount a `NUMERIC(12, 2)` column holds.
pub fn max_price() -> Decimal {
    Decimal::new(999_999_999_999, PRICE_SCALE)
}

/// Parse a user-supplied amount and normalise it to two decimal places.
pub fn parse_price(raw: &str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    let value = Decimal::from_str(trimmed).map_err(|_| ValidationError::InvalidPriceFormat {
        value: trimmed.to_string(),
    })?;

    let value = normalize(value);
    if value <= Decimal::ZERO {
        return Err(ValidationError::PriceMustBePositive);
    }
    let max = max_price();
    if value > max {
        return Err(ValidationError::PriceTooLarge {
            max: max.to_string(),
        });
    }
    Ok(value)
}

/// Render an amount as a fixed two-decimal string (`19.9` becomes `"19.90"`).
pub fn format_price(value: Decimal) -> String {
    normalize(value).to_string()
}

/// Parse and format in one step, returning the canonical stored representation.
pub fn canonical_price(raw: &str) -> Result<String, ValidationError> {
    parse_price(raw).map(format_price)
}

/// Read back a stored amount; `None` when the stored text is not a decimal.
pub fn parse_stored_price(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

fn normalize(value: Decimal) -> Decimal {
    let mut value =
        value.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(PRICE_SCALE);
    value
}
