//! Report periods and sales aggregation.

use rust_decimal::Decimal;
use time::{
    Date, Duration, Month, OffsetDateTime, format_description::FormatItem,
    macros::format_description,
};

use crate::domain::entities::SaleRecord;
use crate::domain::error::ValidationError;
use crate::domain::price::parse_stored_price;

const MONTH_LABEL_FORMAT: &[FormatItem<'static>] = format_description!("[month repr:long] [year]");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Monthly,
    Quarterly,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Monthly => "monthly",
            ReportKind::Quarterly => "quarterly",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Monthly => "Monthly Sales Report",
            ReportKind::Quarterly => "Quarterly Sales Report",
        }
    }
}

/// Inclusive instant range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl DateRange {
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeriodUnit {
    Month(Month),
    Quarter(u8),
}

/// A calendar month or quarter, resolved to its UTC instant range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    year: i32,
    unit: PeriodUnit,
    range: DateRange,
}

impl ReportPeriod {
    pub fn month(year: i32, month: u8) -> Result<Self, ValidationError> {
        let month = Month::try_from(month).map_err(|_| ValidationError::InvalidMonth { month })?;
        let range = month_span(year, month, 1)?;
        Ok(Self {
            year,
            unit: PeriodUnit::Month(month),
            range,
        })
    }

    pub fn quarter(year: i32, quarter: u8) -> Result<Self, ValidationError> {
        if !(1..=4).contains(&quarter) {
            return Err(ValidationError::InvalidQuarter { quarter });
        }
        let first = Month::try_from((quarter - 1) * 3 + 1)
            .map_err(|_| ValidationError::InvalidQuarter { quarter })?;
        let range = month_span(year, first, 3)?;
        Ok(Self {
            year,
            unit: PeriodUnit::Quarter(quarter),
            range,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn kind(&self) -> ReportKind {
        match self.unit {
            PeriodUnit::Month(_) => ReportKind::Monthly,
            PeriodUnit::Quarter(_) => ReportKind::Quarterly,
        }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Human label such as `February 2024` or `Q1 2024`.
    pub fn label(&self) -> String {
        match self.unit {
            PeriodUnit::Month(month) => self
                .range
                .start
                .format(MONTH_LABEL_FORMAT)
                .unwrap_or_else(|_| format!("{month} {}", self.year)),
            PeriodUnit::Quarter(quarter) => format!("Q{quarter} {}", self.year),
        }
    }

    /// Compact label for file names, e.g. `2024-02` or `2024-q1`.
    pub fn slug(&self) -> String {
        match self.unit {
            PeriodUnit::Month(month) => format!("{}-{:02}", self.year, u8::from(month)),
            PeriodUnit::Quarter(quarter) => format!("{}-q{quarter}", self.year),
        }
    }
}

/// Reject years outside `[min, max]`.
pub fn ensure_year_within(year: i32, min: i32, max: i32) -> Result<(), ValidationError> {
    if year < min || year > max {
        return Err(ValidationError::InvalidYear { year, min, max });
    }
    Ok(())
}

fn month_span(year: i32, first: Month, months: u8) -> Result<DateRange, ValidationError> {
    let unrepresentable = || ValidationError::PeriodOutOfRange { year };

    let start = Date::from_calendar_date(year, first, 1).map_err(|_| unrepresentable())?;

    let mut next_year = year;
    let mut next_month = first;
    for _ in 0..months {
        if next_month == Month::December {
            next_year += 1;
        }
        next_month = next_month.next();
    }
    let next_start = Date::from_calendar_date(next_year, next_month, 1).map_err(|_| unrepresentable())?;

    let start = start.midnight().assume_utc();
    let end = next_start.midnight().assume_utc() - Duration::seconds(1);
    Ok(DateRange { start, end })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesSummary {
    pub sale_count: usize,
    pub revenue: Decimal,
}

/// Sales belonging to one employee within a period, with their totals.
#[derive(Debug, Clone)]
pub struct SalesAggregate {
    pub sales: Vec<SaleRecord>,
    pub summary: SalesSummary,
    /// Ids of sales whose stored price could not be parsed; they count as zero revenue.
    pub unparseable_prices: Vec<i64>,
}

/// Keep sales of `employee_id` inside `range`, then count them and sum their prices.
pub fn aggregate_sales(sales: Vec<SaleRecord>, employee_id: i64, range: DateRange) -> SalesAggregate {
    let mut matching: Vec<SaleRecord> = sales
        .into_iter()
        .filter(|sale| sale.employee_id == employee_id && range.contains(sale.sale_date))
        .collect();
    matching.sort_by(|a, b| a.sale_date.cmp(&b.sale_date).then(a.id.cmp(&b.id)));

    let mut revenue = Decimal::ZERO;
    let mut unparseable_prices = Vec::new();
    for sale in &matching {
        match parse_stored_price(&sale.price) {
            Some(amount) => revenue += amount,
            None => unparseable_prices.push(sale.id),
        }
    }

    SalesAggregate {
        summary: SalesSummary {
            sale_count: matching.len(),
            revenue,
        },
        sales: matching,
        unparseable_prices,
    }
}
