use std::sync::Arc;

use crate::application::error::ServiceError;
use crate::application::reconcile::EmployeeFields;
use crate::application::repos::{
    CreateEmployeeParams, EmployeesRepo, EmployeesWriteRepo, RepoError,
};
use crate::domain::entities::EmployeeRecord;

const ENTITY: &str = "employee";

#[derive(Clone)]
pub struct EmployeeService {
    reader: Arc<dyn EmployeesRepo>,
    writer: Arc<dyn EmployeesWriteRepo>,
}

impl EmployeeService {
    pub fn new(reader: Arc<dyn EmployeesRepo>, writer: Arc<dyn EmployeesWriteRepo>) -> Self {
        Self { reader, writer }
    }

    pub async fn list(&self) -> Result<Vec<EmployeeRecord>, ServiceError> {
        self.reader
            .list_employees()
            .await
            .map_err(ServiceError::from)
    }

    pub async fn get(&self, id: i64) -> Result<EmployeeRecord, ServiceError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY))
    }

    /// Create an employee from already-merged fields.
    pub async fn create(&self, fields: EmployeeFields) -> Result<EmployeeRecord, ServiceError> {
        let params = self.prepare_create(fields).await?;

        let email = params.email.clone();
        let employee = self
            .writer
            .create_employee(params)
            .await
            .map_err(|err| map_write_error(err, &email))?;

        tracing::info!(
            target = "workrest::employees",
            employee_id = employee.id,
            "Created employee"
        );
        Ok(employee)
    }

    /// Apply merged partial fields to the stored employee `id`.
    pub async fn update(
        &self,
        id: i64,
        fields: EmployeeFields,
    ) -> Result<EmployeeRecord, ServiceError> {
        let stored = self.get(id).await?;
        let reconciled = fields.reconcile(&stored)?;

        if reconciled.is_changed("email") {
            self.ensure_email_available(&reconciled.params.email, Some(id))
                .await?;
        }

        let email = reconciled.params.email.clone();
        let employee = self
            .writer
            .update_employee(reconciled.params)
            .await
            .map_err(|err| map_write_error(err, &email))?;

        tracing::info!(
            target = "workrest::employees",
            employee_id = employee.id,
            changed = ?reconciled.changed,
            "Updated employee"
        );
        Ok(employee)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        match self.writer.delete_employee(id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Err(ServiceError::not_found(ENTITY)),
            Err(err) => return Err(err.into()),
        }

        tracing::info!(
            target = "workrest::employees",
            employee_id = id,
            "Deleted employee"
        );
        Ok(())
    }

    async fn prepare_create(
        &self,
        fields: EmployeeFields,
    ) -> Result<CreateEmployeeParams, ServiceError> {
        let EmployeeFields {
            name,
            surname,
            email,
        } = fields;

        let name = name.ok_or(ServiceError::MissingRequiredField("name"))?;
        let surname = surname.ok_or(ServiceError::MissingRequiredField("surname"))?;
        let email = email.ok_or(ServiceError::MissingRequiredField("email"))?;

        self.ensure_email_available(&email, None).await?;

        Ok(CreateEmployeeParams {
            name,
            surname,
            email,
        })
    }

    async fn ensure_email_available(
        &self,
        email: &str,
        owner: Option<i64>,
    ) -> Result<(), ServiceError> {
        match self.reader.find_by_email(email).await? {
            Some(existing) if Some(existing.id) != owner => {
                Err(ServiceError::EmailAlreadyExists {
                    email: email.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// A unique-index hit that slipped past the lookup is still a duplicate email.
fn map_write_error(err: RepoError, email: &str) -> ServiceError {
    match err {
        RepoError::Duplicate { .. } => ServiceError::EmailAlreadyExists {
            email: email.to_string(),
        },
        RepoError::NotFound => ServiceError::not_found(ENTITY),
        other => other.into(),
    }
}
