use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    application::repos::{
        CreateSaleParams, RepoError, SalesRepo, SalesWriteRepo, UpdateSaleParams,
    },
    domain::entities::SaleRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

// `price` is NUMERIC(12,2); reading it as text keeps the two-decimal form.
const SALE_COLUMNS: &str =
    "id, product_name, category, currency, price::text AS price, sale_date, employee_id";

#[derive(sqlx::FromRow)]
struct SaleRow {
    id: i64,
    product_name: String,
    category: String,
    currency: String,
    price: String,
    sale_date: OffsetDateTime,
    employee_id: i64,
}

impl From<SaleRow> for SaleRecord {
    fn from(row: SaleRow) -> Self {
        Self {
            id: row.id,
            product_name: row.product_name,
            category: row.category,
            currency: row.currency,
            price: row.price,
            sale_date: row.sale_date,
            employee_id: row.employee_id,
        }
    }
}

#[async_trait]
impl SalesRepo for PostgresRepositories {
    async fn list_sales(&self) -> Result<Vec<SaleRecord>, RepoError> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales ORDER BY sale_date, id");
        let rows = sqlx::query_as::<_, SaleRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(SaleRecord::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SaleRecord>, RepoError> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = $1");
        let row = sqlx::query_as::<_, SaleRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(SaleRecord::from))
    }

    async fn list_sales_between(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<SaleRecord>, RepoError> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales \
             WHERE sale_date >= $1 AND sale_date <= $2 \
             ORDER BY sale_date, id"
        );
        let rows = sqlx::query_as::<_, SaleRow>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(SaleRecord::from).collect())
    }
}

#[async_trait]
impl SalesWriteRepo for PostgresRepositories {
    async fn create_sale(&self, params: CreateSaleParams) -> Result<SaleRecord, RepoError> {
        let sql = format!(
            "INSERT INTO sales (product_name, category, currency, price, sale_date, employee_id) \
             VALUES ($1, $2, $3, $4::numeric, $5, $6) \
             RETURNING {SALE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SaleRow>(&sql)
            .bind(params.product_name)
            .bind(params.category)
            .bind(params.currency)
            .bind(params.price)
            .bind(params.sale_date)
            .bind(params.employee_id)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_sale(&self, params: UpdateSaleParams) -> Result<SaleRecord, RepoError> {
        let sql = format!(
            "UPDATE sales \
             SET product_name = $2, category = $3, currency = $4, price = $5::numeric, \
                 sale_date = $6, employee_id = $7 \
             WHERE id = $1 \
             RETURNING {SALE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SaleRow>(&sql)
            .bind(params.id)
            .bind(params.product_name)
            .bind(params.category)
            .bind(params.currency)
            .bind(params.price)
            .bind(params.sale_date)
            .bind(params.employee_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(SaleRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_sale(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
