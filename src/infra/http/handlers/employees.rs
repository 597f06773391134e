//! Employee handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::reconcile::{EmployeeFields, resolve_layers};
use crate::infra::http::error::ApiError;
use crate::infra::http::models::{EmployeePayload, EmployeeResponse};
use crate::infra::http::request::RequestFields;
use crate::infra::http::state::ApiState;

use super::{parse_id, service_to_api};

pub async fn list_employees(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let employees = state.employees.list().await.map_err(service_to_api)?;
    let body: Vec<EmployeeResponse> = employees.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

pub async fn get_employee(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let employee = state.employees.get(id).await.map_err(service_to_api)?;
    Ok(Json(EmployeeResponse::from(employee)))
}

pub async fn create_employee(
    State(state): State<ApiState>,
    fields: RequestFields<EmployeePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let merged = employee_layers(fields)?;
    let employee = state
        .employees
        .create(merged)
        .await
        .map_err(service_to_api)?;
    Ok((StatusCode::CREATED, Json(EmployeeResponse::from(employee))))
}

pub async fn update_employee(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    fields: RequestFields<EmployeePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let merged = employee_layers(fields)?;
    let employee = state
        .employees
        .update(id, merged)
        .await
        .map_err(service_to_api)?;
    Ok(Json(EmployeeResponse::from(employee)))
}

pub async fn delete_employee(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    state.employees.delete(id).await.map_err(service_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Body first, then query; each layer is validated before the merge.
fn employee_layers(fields: RequestFields<EmployeePayload>) -> Result<EmployeeFields, ApiError> {
    let body = fields.body.unwrap_or_default();
    let body = EmployeeFields::parse(body.name, body.surname, body.email).map_err(service_to_api)?;
    let query = EmployeeFields::from_named(&fields.query).map_err(service_to_api)?;
    Ok(resolve_layers([body, query]))
}
