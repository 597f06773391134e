//! Sale-specific rules: sale dates and currency codes.

use time::{
    Date, OffsetDateTime, Time, format_description::FormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

use crate::domain::error::ValidationError;

const SALE_DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A sale may be recorded up to, but not after, the validation instant.
pub fn ensure_not_in_future(
    sale_date: OffsetDateTime,
    now: OffsetDateTime,
) -> Result<(), ValidationError> {
    if sale_date > now {
        return Err(ValidationError::SaleDateInFuture);
    }
    Ok(())
}

/// Accept either an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_sale_date(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
    let trimmed = raw.trim();
    match OffsetDateTime::parse(trimmed, &Rfc3339) {
        Ok(value) => Ok(value),
        Err(rfc_err) => Date::parse(trimmed, SALE_DATE_FORMAT)
            .map(|date| date.with_time(Time::MIDNIGHT).assume_utc())
            .map_err(|_| rfc_err),
    }
}

/// The zero instant stands in for "no date supplied" in partial payloads.
pub fn is_unset_date(value: OffsetDateTime) -> bool {
    value == OffsetDateTime::UNIX_EPOCH
}

pub fn format_sale_day(value: OffsetDateTime) -> String {
    value
        .date()
        .format(SALE_DATE_FORMAT)
        .unwrap_or_else(|_| value.date().to_string())
}

pub fn normalize_currency(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
