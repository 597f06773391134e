#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use time::OffsetDateTime;

use workrest::application::employees::EmployeeService;
use workrest::application::report_render::DocumentSink;
use workrest::application::reports::ReportService;
use workrest::application::repos::{
    CreateEmployeeParams, CreateSaleParams, EmployeesRepo, EmployeesWriteRepo, HealthRepo,
    RepoError, SalesRepo, SalesWriteRepo, UpdateEmployeeParams, UpdateSaleParams,
};
use workrest::application::sales::SaleService;
use workrest::domain::entities::{EmployeeRecord, SaleRecord};
use workrest::infra::http::{ApiState, build_router};
use workrest::infra::pdf::PdfSink;

#[derive(Default)]
struct Tables {
    employees: Vec<EmployeeRecord>,
    sales: Vec<SaleRecord>,
    next_employee: i64,
    next_sale: i64,
}

/// Both tables behind one lock, mirroring the unique email and foreign key constraints.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn seed_employee(&self, name: &str, surname: &str, email: &str) -> EmployeeRecord {
        let mut tables = self.tables.lock().expect("store lock");
        tables.next_employee += 1;
        let record = EmployeeRecord {
            id: tables.next_employee,
            name: name.to_string(),
            surname: surname.to_string(),
            email: email.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        tables.employees.push(record.clone());
        record
    }

    /// Inserts a sale verbatim, skipping every service check.
    pub fn seed_sale(&self, employee_id: i64, price: &str, sale_date: OffsetDateTime) -> SaleRecord {
        let mut tables = self.tables.lock().expect("store lock");
        tables.next_sale += 1;
        let record = SaleRecord {
            id: tables.next_sale,
            product_name: format!("Product {}", tables.next_sale),
            category: "Hardware".to_string(),
            currency: "EUR".to_string(),
            price: price.to_string(),
            sale_date,
            employee_id,
        };
        tables.sales.push(record.clone());
        record
    }

    pub fn sale_count(&self) -> usize {
        self.tables.lock().expect("store lock").sales.len()
    }
}

#[async_trait]
impl EmployeesRepo for MemoryStore {
    async fn list_employees(&self) -> Result<Vec<EmployeeRecord>, RepoError> {
        Ok(self.tables.lock().expect("store lock").employees.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<EmployeeRecord>, RepoError> {
        let tables = self.tables.lock().expect("store lock");
        Ok(tables.employees.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<EmployeeRecord>, RepoError> {
        let tables = self.tables.lock().expect("store lock");
        Ok(tables.employees.iter().find(|e| e.email == email).cloned())
    }
}

#[async_trait]
impl EmployeesWriteRepo for MemoryStore {
    async fn create_employee(
        &self,
        params: CreateEmployeeParams,
    ) -> Result<EmployeeRecord, RepoError> {
        {
            let tables = self.tables.lock().expect("store lock");
            if tables.employees.iter().any(|e| e.email == params.email) {
                return Err(RepoError::Duplicate {
                    constraint: "employees_email_key".into(),
                });
            }
        }
        Ok(self.seed_employee(&params.name, &params.surname, &params.email))
    }

    async fn update_employee(
        &self,
        params: UpdateEmployeeParams,
    ) -> Result<EmployeeRecord, RepoError> {
        let mut tables = self.tables.lock().expect("store lock");
        if tables
            .employees
            .iter()
            .any(|e| e.email == params.email && e.id != params.id)
        {
            return Err(RepoError::Duplicate {
                constraint: "employees_email_key".into(),
            });
        }
        let record = tables
            .employees
            .iter_mut()
            .find(|e| e.id == params.id)
            .ok_or(RepoError::NotFound)?;
        record.name = params.name;
        record.surname = params.surname;
        record.email = params.email;
        Ok(record.clone())
    }

    async fn delete_employee(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.lock().expect("store lock");
        if tables.sales.iter().any(|s| s.employee_id == id) {
            return Err(RepoError::Integrity {
                message: "sales_employee_id_fkey".into(),
            });
        }
        let before = tables.employees.len();
        tables.employees.retain(|e| e.id != id);
        if tables.employees.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl SalesRepo for MemoryStore {
    async fn list_sales(&self) -> Result<Vec<SaleRecord>, RepoError> {
        Ok(self.tables.lock().expect("store lock").sales.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SaleRecord>, RepoError> {
        let tables = self.tables.lock().expect("store lock");
        Ok(tables.sales.iter().find(|s| s.id == id).cloned())
    }

    async fn list_sales_between(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<SaleRecord>, RepoError> {
        let tables = self.tables.lock().expect("store lock");
        Ok(tables
            .sales
            .iter()
            .filter(|s| s.sale_date >= start && s.sale_date <= end)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SalesWriteRepo for MemoryStore {
    async fn create_sale(&self, params: CreateSaleParams) -> Result<SaleRecord, RepoError> {
        let mut tables = self.tables.lock().expect("store lock");
        tables.next_sale += 1;
        let record = SaleRecord {
            id: tables.next_sale,
            product_name: params.product_name,
            category: params.category,
            currency: params.currency,
            price: params.price,
            sale_date: params.sale_date,
            employee_id: params.employee_id,
        };
        tables.sales.push(record.clone());
        Ok(record)
    }

    async fn update_sale(&self, params: UpdateSaleParams) -> Result<SaleRecord, RepoError> {
        let mut tables = self.tables.lock().expect("store lock");
        let record = tables
            .sales
            .iter_mut()
            .find(|s| s.id == params.id)
            .ok_or(RepoError::NotFound)?;
        record.product_name = params.product_name;
        record.category = params.category;
        record.currency = params.currency;
        record.price = params.price;
        record.sale_date = params.sale_date;
        record.employee_id = params.employee_id;
        Ok(record.clone())
    }

    async fn delete_sale(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.lock().expect("store lock");
        let before = tables.sales.len();
        tables.sales.retain(|s| s.id != id);
        if tables.sales.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl HealthRepo for MemoryStore {
    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

pub fn build_app(store: Arc<MemoryStore>) -> Router {
    let employees: Arc<dyn EmployeesRepo> = store.clone();
    let employees_write: Arc<dyn EmployeesWriteRepo> = store.clone();
    let sales: Arc<dyn SalesRepo> = store.clone();
    let sales_write: Arc<dyn SalesWriteRepo> = store.clone();
    let sink: Arc<dyn DocumentSink> = Arc::new(PdfSink);

    build_router(ApiState {
        employees: Arc::new(EmployeeService::new(employees.clone(), employees_write)),
        sales: Arc::new(SaleService::new(
            sales.clone(),
            sales_write,
            employees.clone(),
            "EUR",
        )),
        reports: Arc::new(ReportService::new(employees, sales, sink, "EUR")),
        health: store,
    })
}
