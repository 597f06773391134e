use thiserror::Error;

/// Field-level rule violations detected before a record reaches persistence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("email `{email}` is not a valid address")]
    InvalidEmailFormat { email: String },
    #[error("price `{value}` is not a decimal amount")]
    InvalidPriceFormat { value: String },
    #[error("price must be greater than zero")]
    PriceMustBePositive,
    #[error("price must not exceed {max}")]
    PriceTooLarge { max: String },
    #[error("sale date cannot be in the future")]
    SaleDateInFuture,
    #[error("year {year} is outside the allowed range {min}..={max}")]
    InvalidYear { year: i32, min: i32, max: i32 },
    #[error("month {month} is outside the range 1..=12")]
    InvalidMonth { month: u8 },
    #[error("quarter {quarter} is outside the range 1..=4")]
    InvalidQuarter { quarter: u8 },
    #[error("report period in year {year} cannot be represented")]
    PeriodOutOfRange { year: i32 },
}

impl ValidationError {
    /// Stable machine-readable reason, used for API error hints and metrics labels.
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::InvalidEmailFormat { .. } => "invalid_email_format",
            ValidationError::InvalidPriceFormat { .. } => "invalid_price_format",
            ValidationError::PriceMustBePositive => "price_must_be_positive",
            ValidationError::PriceTooLarge { .. } => "price_too_large",
            ValidationError::SaleDateInFuture => "sale_date_in_future",
            ValidationError::InvalidYear { .. } => "invalid_year",
            ValidationError::InvalidMonth { .. } => "invalid_month",
            ValidationError::InvalidQuarter { .. } => "invalid_quarter",
            ValidationError::PeriodOutOfRange { .. } => "period_out_of_range",
        }
    }
}
