//! Domain entities mirrored from persistent storage.

use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub created_at: OffsetDateTime,
}

impl EmployeeRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleRecord {
    pub id: i64,
    pub product_name: String,
    pub category: String,
    pub currency: String,
    /// Fixed two-decimal amount, e.g. `"19.90"`.
    pub price: String,
    pub sale_date: OffsetDateTime,
    pub employee_id: i64,
}
