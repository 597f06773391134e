//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::entities::{EmployeeRecord, SaleRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreateEmployeeParams {
    pub name: String,
    pub surname: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEmployeeParams {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct CreateSaleParams {
    pub product_name: String,
    pub category: String,
    pub currency: String,
    pub price: String,
    pub sale_date: OffsetDateTime,
    pub employee_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSaleParams {
    pub id: i64,
    pub product_name: String,
    pub category: String,
    pub currency: String,
    pub price: String,
    pub sale_date: OffsetDateTime,
    pub employee_id: i64,
}

#[async_trait]
pub trait EmployeesRepo: Send + Sync {
    async fn list_employees(&self) -> Result<Vec<EmployeeRecord>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<EmployeeRecord>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<EmployeeRecord>, RepoError>;
}

#[async_trait]
pub trait EmployeesWriteRepo: Send + Sync {
    async fn create_employee(
        &self,
        params: CreateEmployeeParams,
    ) -> Result<EmployeeRecord, RepoError>;

    async fn update_employee(
        &self,
        params: UpdateEmployeeParams,
    ) -> Result<EmployeeRecord, RepoError>;

    async fn delete_employee(&self, id: i64) -> Result<(), RepoError>;
}

#[async_trait]
pub trait SalesRepo: Send + Sync {
    async fn list_sales(&self) -> Result<Vec<SaleRecord>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<SaleRecord>, RepoError>;

    /// Sales whose `sale_date` lies in `[start, end]`, for every employee.
    async fn list_sales_between(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<SaleRecord>, RepoError>;
}

#[async_trait]
pub trait SalesWriteRepo: Send + Sync {
    async fn create_sale(&self, params: CreateSaleParams) -> Result<SaleRecord, RepoError>;

    async fn update_sale(&self, params: UpdateSaleParams) -> Result<SaleRecord, RepoError>;

    async fn delete_sale(&self, id: i64) -> Result<(), RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
