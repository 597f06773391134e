//! Report download handlers

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::{
    HeaderValue, StatusCode, Uri,
    header::{CONTENT_DISPOSITION, CONTENT_TYPE},
};
use axum::response::{IntoResponse, Response};

use crate::application::error::ServiceError;
use crate::application::reports::ReportDocument;
use crate::infra::http::error::ApiError;
use crate::infra::http::request::query_map;
use crate::infra::http::state::ApiState;

use super::{parse_id, service_to_api};

pub async fn monthly_report(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let query = query_map(&uri)?;
    let year = required::<i32>(query.get("year"), "year")?;
    let month = required::<u8>(query.get("month"), "month")?;

    let report = state
        .reports
        .monthly(id, year, month)
        .await
        .map_err(service_to_api)?;
    Ok(pdf_response(report))
}

pub async fn quarterly_report(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let query = query_map(&uri)?;
    let year = required::<i32>(query.get("year"), "year")?;
    let quarter = required::<u8>(query.get("quarter"), "quarter")?;

    let report = state
        .reports
        .quarterly(id, year, quarter)
        .await
        .map_err(service_to_api)?;
    Ok(pdf_response(report))
}

fn required<T>(raw: Option<&String>, field: &'static str) -> Result<T, ApiError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = raw
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| service_to_api(ServiceError::MissingRequiredField(field)))?;
    raw.parse::<T>()
        .map_err(|err| service_to_api(ServiceError::malformed(field, err)))
}

fn pdf_response(report: ReportDocument) -> Response {
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        report.filename
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (CONTENT_DISPOSITION, disposition),
        ],
        report.bytes,
    )
        .into_response()
}
