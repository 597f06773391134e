use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    application::repos::{
        CreateEmployeeParams, EmployeesRepo, EmployeesWriteRepo, RepoError,
        UpdateEmployeeParams,
    },
    domain::entities::EmployeeRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    id: i64,
    name: String,
    surname: String,
    email: String,
    created_at: OffsetDateTime,
}

impl From<EmployeeRow> for EmployeeRecord {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            surname: row.surname,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl EmployeesRepo for PostgresRepositories {
    async fn list_employees(&self) -> Result<Vec<EmployeeRecord>, RepoError> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, name, surname, email, created_at
            FROM employees
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(EmployeeRecord::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<EmployeeRecord>, RepoError> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, name, surname, email, created_at
            FROM employees
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(EmployeeRecord::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<EmployeeRecord>, RepoError> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, name, surname, email, created_at
            FROM employees
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(EmployeeRecord::from))
    }
}

#[async_trait]
impl EmployeesWriteRepo for PostgresRepositories {
    async fn create_employee(
        &self,
        params: CreateEmployeeParams,
    ) -> Result<EmployeeRecord, RepoError> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            INSERT INTO employees (name, surname, email)
            VALUES ($1, $2, $3)
            RETURNING id, name, surname, email, created_at
            "#,
        )
        .bind(params.name)
        .bind(params.surname)
        .bind(params.email)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_employee(
        &self,
        params: UpdateEmployeeParams,
    ) -> Result<EmployeeRecord, RepoError> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            UPDATE employees
            SET name = $2, surname = $3, email = $4
            WHERE id = $1
            RETURNING id, name, surname, email, created_at
            "#,
        )
        .bind(params.id)
        .bind(params.name)
        .bind(params.surname)
        .bind(params.email)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(EmployeeRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_employee(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
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
