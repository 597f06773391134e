//! Sale handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::reconcile::{SaleFields, resolve_layers};
use crate::infra::http::error::ApiError;
use crate::infra::http::models::{SalePayload, SaleResponse};
use crate::infra::http::request::RequestFields;
use crate::infra::http::state::ApiState;

use super::{parse_id, service_to_api};

pub async fn list_sales(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let sales = state.sales.list().await.map_err(service_to_api)?;
    let body: Vec<SaleResponse> = sales.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

pub async fn get_sale(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let sale = state.sales.get(id).await.map_err(service_to_api)?;
    Ok(Json(SaleResponse::from(sale)))
}

pub async fn create_sale(
    State(state): State<ApiState>,
    fields: RequestFields<SalePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let merged = sale_layers(fields)?;
    let sale = state.sales.create(merged).await.map_err(service_to_api)?;
    Ok((StatusCode::CREATED, Json(SaleResponse::from(sale))))
}

pub async fn update_sale(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    fields: RequestFields<SalePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let merged = sale_layers(fields)?;
    let sale = state
        .sales
        .update(id, merged)
        .await
        .map_err(service_to_api)?;
    Ok(Json(SaleResponse::from(sale)))
}

pub async fn delete_sale(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    state.sales.delete(id).await.map_err(service_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}

fn sale_layers(fields: RequestFields<SalePayload>) -> Result<SaleFields, ApiError> {
    let body = SaleFields::parse(fields.body.unwrap_or_default().into()).map_err(service_to_api)?;
    let query = SaleFields::from_named(&fields.query).map_err(service_to_api)?;
    Ok(resolve_layers([body, query]))
}
