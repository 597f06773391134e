use std::sync::Arc;

use time::OffsetDateTime;

use crate::application::error::ServiceError;
use crate::application::reconcile::SaleFields;
use crate::application::repos::{
    CreateSaleParams, EmployeesRepo, RepoError, SalesRepo, SalesWriteRepo,
};
use crate::domain::entities::SaleRecord;
use crate::domain::sales::{ensure_not_in_future, normalize_currency};

const ENTITY: &str = "sale";

#[derive(Clone)]
pub struct SaleService {
    reader: Arc<dyn SalesRepo>,
    writer: Arc<dyn SalesWriteRepo>,
    employees: Arc<dyn EmployeesRepo>,
    default_currency: String,
}

impl SaleService {
    pub fn new(
        reader: Arc<dyn SalesRepo>,
        writer: Arc<dyn SalesWriteRepo>,
        employees: Arc<dyn EmployeesRepo>,
        default_currency: impl Into<String>,
    ) -> Self {
        Self {
            reader,
            writer,
            employees,
            default_currency: normalize_currency(&default_currency.into()),
        }
    }

    pub async fn list(&self) -> Result<Vec<SaleRecord>, ServiceError> {
        self.reader.list_sales().await.map_err(ServiceError::from)
    }

    pub async fn get(&self, id: i64) -> Result<SaleRecord, ServiceError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY))
    }

    /// Create a sale from already-merged fields. Every rule is checked before the
    /// gateway sees the record.
    pub async fn create(&self, fields: SaleFields) -> Result<SaleRecord, ServiceError> {
        let SaleFields {
            product_name,
            category,
            currency,
            price,
            sale_date,
            employee_id,
        } = fields;

        let product_name = product_name.ok_or(ServiceError::MissingRequiredField("product_name"))?;
        let category = category.ok_or(ServiceError::MissingRequiredField("category"))?;
        let price = price.ok_or(ServiceError::MissingRequiredField("price"))?;
        let employee_id = employee_id.ok_or(ServiceError::MissingRequiredField("employee_id"))?;

        let now = OffsetDateTime::now_utc();
        let sale_date = sale_date.unwrap_or(now);
        ensure_not_in_future(sale_date, now)?;
        self.ensure_employee_exists(employee_id).await?;

        let params = CreateSaleParams {
            product_name,
            category,
            currency: currency.unwrap_or_else(|| self.default_currency.clone()),
            price,
            sale_date,
            employee_id,
        };

        let sale = self
            .writer
            .create_sale(params)
            .await
            .map_err(map_write_error)?;

        tracing::info!(
            target = "workrest::sales",
            sale_id = sale.id,
            employee_id = sale.employee_id,
            price = %sale.price,
            "Recorded sale"
        );
        Ok(sale)
    }

    /// Apply merged partial fields to the stored sale `id`, re-checking changed fields.
    pub async fn update(&self, id: i64, fields: SaleFields) -> Result<SaleRecord, ServiceError> {
        let stored = self.get(id).await?;
        let reconciled = fields.reconcile(&stored)?;

        if reconciled.is_changed("sale_date") {
            ensure_not_in_future(reconciled.params.sale_date, OffsetDateTime::now_utc())?;
        }
        if reconciled.is_changed("employee_id") {
            self.ensure_employee_exists(reconciled.params.employee_id)
                .await?;
        }

        let sale = self
            .writer
            .update_sale(reconciled.params)
            .await
            .map_err(map_write_error)?;

        tracing::info!(
            target = "workrest::sales",
            sale_id = sale.id,
            changed = ?reconciled.changed,
            "Updated sale"
        );
        Ok(sale)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.writer.delete_sale(id).await.map_err(map_write_error)?;

        tracing::info!(target = "workrest::sales", sale_id = id, "Deleted sale");
        Ok(())
    }

    async fn ensure_employee_exists(&self, employee_id: i64) -> Result<(), ServiceError> {
        match self.employees.find_by_id(employee_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("employee")),
        }
    }
}

fn map_write_error(err: RepoError) -> ServiceError {
    match err {
        RepoError::NotFound => ServiceError::not_found(ENTITY),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use time::{Duration, macros::datetime};

    use crate::application::reconcile::SaleInput;
    use crate::application::repos::UpdateSaleParams;
    use crate::domain::entities::EmployeeRecord;
    use crate::domain::error::ValidationError;

    struct KnownEmployees(Vec<i64>);

    #[async_trait]
    impl EmployeesRepo for KnownEmployees {
        async fn list_employees(&self) -> Result<Vec<EmployeeRecord>, RepoError> {
            Ok(Vec::new())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<EmployeeRecord>, RepoError> {
            Ok(self.0.contains(&id).then(|| EmployeeRecord {
                id,
                name: "Katherine".into(),
                surname: "Johnson".into(),
                email: format!("kj{id}@example.com"),
                created_at: datetime!(2020-01-01 0:00 UTC),
            }))
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<EmployeeRecord>, RepoError> {
            Ok(None)
        }
    }

    #[derive(Default)]
    struct MemorySales {
        records: Mutex<Vec<SaleRecord>>,
        writes: Mutex<usize>,
    }

    #[async_trait]
    impl SalesRepo for MemorySales {
        async fn list_sales(&self) -> Result<Vec<SaleRecord>, RepoError> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<SaleRecord>, RepoError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|sale| sale.id == id)
                .cloned())
        }

        async fn list_sales_between(
            &self,
            start: OffsetDateTime,
            end: OffsetDateTime,
        ) -> Result<Vec<SaleRecord>, RepoError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|sale| start <= sale.sale_date && sale.sale_date <= end)
                .cloned()
                .collect())
        }
    }

    #[async_trait]
    impl SalesWriteRepo for MemorySales {
        async fn create_sale(&self, params: CreateSaleParams) -> Result<SaleRecord, RepoError> {
            *self.writes.lock().unwrap() += 1;
            let mut records = self.records.lock().unwrap();
            let sale = SaleRecord {
                id: records.len() as i64 + 1,
                product_name: params.product_name,
                category: params.category,
                currency: params.currency,
                price: params.price,
                sale_date: params.sale_date,
                employee_id: params.employee_id,
            };
            records.push(sale.clone());
            Ok(sale)
        }

        async fn update_sale(&self, params: UpdateSaleParams) -> Result<SaleRecord, RepoError> {
            *self.writes.lock().unwrap() += 1;
            let mut records = self.records.lock().unwrap();
            let sale = records
                .iter_mut()
                .find(|sale| sale.id == params.id)
                .ok_or(RepoError::NotFound)?;
            *sale = SaleRecord {
                id: params.id,
                product_name: params.product_name,
                category: params.category,
                currency: params.currency,
                price: params.price,
                sale_date: params.sale_date,
                employee_id: params.employee_id,
            };
            Ok(sale.clone())
        }

        async fn delete_sale(&self, id: i64) -> Result<(), RepoError> {
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|sale| sale.id != id);
            if records.len() == before {
                return Err(RepoError::NotFound);
            }
            Ok(())
        }
    }

    fn service(sales: Arc<MemorySales>) -> SaleService {
        SaleService::new(
            sales.clone(),
            sales,
            Arc::new(KnownEmployees(vec![1, 2])),
            "eur",
        )
    }

    fn input(price: &str) -> SaleInput {
        SaleInput {
            product_name: Some("Monitor".into()),
            category: Some("hardware".into()),
            price: Some(price.into()),
            sale_date: Some("2024-02-01T09:00:00Z".into()),
            employee_id: Some(1),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_stores_two_decimal_price_and_default_currency() {
        let sales = Arc::new(MemorySales::default());
        let service = service(sales.clone());

        let sale = service
            .create(SaleFields::parse(input("19.9")).unwrap())
            .await
            .expect("create succeeds");

        assert_eq!(sale.price, "19.90");
        assert_eq!(sale.currency, "EUR");
        assert_eq!(service.get(sale.id).await.unwrap().price, "19.90");
    }

    #[tokio::test]
    async fn non_positive_price_never_reaches_gateway() {
        let sales = Arc::new(MemorySales::default());

        for price in ["0", "-4.50"] {
            let err = SaleFields::parse(input(price)).unwrap_err();
            assert!(matches!(
                err,
                ServiceError::Validation(ValidationError::PriceMustBePositive)
            ));
        }
        assert_eq!(*sales.writes.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn future_sale_date_is_rejected_before_write() {
        let sales = Arc::new(MemorySales::default());
        let service = service(sales.clone());
        let mut fields = SaleFields::parse(input("5")).unwrap();
        fields.sale_date = Some(OffsetDateTime::now_utc() + Duration::days(2));

        let err = service.create(fields).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::SaleDateInFuture)
        ));
        assert_eq!(*sales.writes.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn create_requires_existing_employee() {
        let sales = Arc::new(MemorySales::default());
        let service = service(sales.clone());
        let mut fields = SaleFields::parse(input("5")).unwrap();
        fields.employee_id = Some(99);

        let err = service.create(fields).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "employee" }));
        assert_eq!(*sales.writes.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn create_reports_first_missing_field() {
        let service = service(Arc::new(MemorySales::default()));
        let fields = SaleFields::parse(SaleInput {
            product_name: Some("Monitor".into()),
            price: Some("5".into()),
            ..Default::default()
        })
        .unwrap();

        let err = service.create(fields).await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingRequiredField("category")));
    }

    #[tokio::test]
    async fn update_rechecks_changed_employee() {
        let sales = Arc::new(MemorySales::default());
        let service = service(sales.clone());
        let sale = service
            .create(SaleFields::parse(input("10")).unwrap())
            .await
            .unwrap();

        let missing = SaleFields {
            employee_id: Some(42),
            ..Default::default()
        };
        let err = service.update(sale.id, missing).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "employee" }));

        let moved = SaleFields {
            employee_id: Some(2),
            ..Default::default()
        };
        let updated = service.update(sale.id, moved).await.unwrap();
        assert_eq!(
            updated,
            SaleRecord {
                employee_id: 2,
                ..sale
            }
        );
    }

    #[tokio::test]
    async fn update_with_same_values_is_a_no_op_error() {
        let sales = Arc::new(MemorySales::default());
        let service = service(sales.clone());
        let sale = service
            .create(SaleFields::parse(input("10")).unwrap())
            .await
            .unwrap();

        let err = service
            .update(sale.id, SaleFields::parse(input("10.00")).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NoFieldsToUpdate));
        assert_eq!(*sales.writes.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_missing_sale_is_not_found() {
        let service = service(Arc::new(MemorySales::default()));
        let err = service.delete(3).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "sale" }));
    }
}
