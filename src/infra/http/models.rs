use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::application::reconcile::SaleInput;
use crate::domain::entities::{EmployeeRecord, SaleRecord};

#[derive(Debug, Default, Deserialize)]
pub struct EmployeePayload {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
}

/// Prices may arrive as JSON strings or numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Text(String),
    Number(serde_json::Number),
}

impl PriceValue {
    pub fn into_text(self) -> String {
        match self {
            PriceValue::Text(text) => text,
            PriceValue::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SalePayload {
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub currency: Option<String>,
    pub price: Option<PriceValue>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    pub sale_date: Option<String>,
    pub employee_id: Option<i64>,
}

impl From<SalePayload> for SaleInput {
    fn from(payload: SalePayload) -> Self {
        Self {
            product_name: payload.product_name,
            category: payload.category,
            currency: payload.currency,
            price: payload.price.map(PriceValue::into_text),
            sale_date: payload.sale_date,
            employee_id: payload.employee_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub created_at: String,
}

impl From<EmployeeRecord> for EmployeeResponse {
    fn from(record: EmployeeRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            surname: record.surname,
            email: record.email,
            created_at: format_timestamp(record.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SaleResponse {
    pub id: i64,
    pub product_name: String,
    pub category: String,
    pub currency: String,
    pub price: String,
    pub sale_date: String,
    pub employee_id: i64,
}

impl From<SaleRecord> for SaleResponse {
    fn from(record: SaleRecord) -> Self {
        Self {
            id: record.id,
            product_name: record.product_name,
            category: record.category,
            currency: record.currency,
            price: record.price,
            sale_date: format_timestamp(record.sale_date),
            employee_id: record.employee_id,
        }
    }
}

fn format_timestamp(value: OffsetDateTime) -> String {
    value
        .format(&Rfc3339)
        .unwrap_or_else(|_| value.to_string())
}
