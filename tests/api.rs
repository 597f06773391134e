mod support;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{
        Method, Request, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use time::{Duration, OffsetDateTime, macros::datetime};
use tower::ServiceExt;

use support::{MemoryStore, build_app};

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .expect("request should build");
    app.clone()
        .oneshot(request)
        .await
        .expect("router should respond")
}

async fn body_bytes(response: Response) -> bytes::Bytes {
    response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes()
}

async fn json_body(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be json")
}

async fn error_code(response: Response) -> String {
    json_body(response).await["error"]["code"]
        .as_str()
        .expect("error code")
        .to_string()
}

fn fresh() -> (Arc<MemoryStore>, Router) {
    let store = Arc::new(MemoryStore::default());
    let app = build_app(store.clone());
    (store, app)
}

#[tokio::test]
async fn health_reports_service_name() {
    let (_, app) = fresh();

    let response = send(&app, Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = json_body(response).await;
    assert_eq!(body, json!({ "status": "healthy", "service": "workrest" }));

    let response = send(&app, Method::GET, "/health/db", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let (_, app) = fresh();
    let response = send(&app, Method::GET, "/nowhere", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(response).await, "not_found");
}

#[tokio::test]
async fn employee_lifecycle() {
    let (_, app) = fresh();

    let response = send(
        &app,
        Method::POST,
        "/employee",
        Some(json!({ "name": "Ada", "surname": "Lovelace", "email": "ada@example.com" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    let id = created["id"].as_i64().expect("id");
    assert_eq!(created["email"], "ada@example.com");

    let response = send(&app, Method::GET, &format!("/employee/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["surname"], "Lovelace");

    let response = send(
        &app,
        Method::PUT,
        &format!("/employee/{id}"),
        Some(json!({ "surname": "King" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = json_body(response).await;
    assert_eq!(updated["name"], "Ada");
    assert_eq!(updated["surname"], "King");

    let response = send(&app, Method::GET, "/employee", None).await;
    assert_eq!(json_body(response).await.as_array().map(Vec::len), Some(1));

    let response = send(&app, Method::DELETE, &format!("/employee/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, Method::GET, &format!("/employee/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn query_parameters_fill_and_override_the_body() {
    let (_, app) = fresh();

    let response = send(
        &app,
        Method::POST,
        "/employee?email=grace@example.com",
        Some(json!({ "name": "Grace", "surname": "Hopper", "email": "old@example.com" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await["email"], "grace@example.com");

    let response = send(
        &app,
        Method::POST,
        "/employee?name=Alan&surname=Turing&email=alan@example.com",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let (store, app) = fresh();
    store.seed_employee("Ada", "Lovelace", "ada@example.com");

    let response = send(
        &app,
        Method::POST,
        "/employee",
        Some(json!({ "name": "Other", "surname": "Person", "email": "ada@example.com" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(response).await, "email_already_exists");
}

#[tokio::test]
async fn employee_requests_are_validated() {
    let (store, app) = fresh();
    let ada = store.seed_employee("Ada", "Lovelace", "ada@example.com");

    let response = send(
        &app,
        Method::POST,
        "/employee",
        Some(json!({ "name": "Ada", "surname": "Lovelace" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "missing_required_field");

    let response = send(
        &app,
        Method::POST,
        "/employee",
        Some(json!({ "name": "Ada", "surname": "Lovelace", "email": "not-an-email" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "invalid_email_format");

    let response = send(
        &app,
        Method::PUT,
        &format!("/employee/{}", ada.id),
        Some(json!({ "name": "Ada", "email": "ada@example.com" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "no_fields_to_update");

    let response = send(&app, Method::GET, "/employee/abc", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "malformed_input");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/employee")
        .body(Body::from("{not json"))
        .expect("request should build");
    let response = app.clone().oneshot(request).await.expect("router should respond");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "malformed_input");
}

#[tokio::test]
async fn employees_with_sales_cannot_be_deleted() {
    let (store, app) = fresh();
    let ada = store.seed_employee("Ada", "Lovelace", "ada@example.com");
    store.seed_sale(ada.id, "10.00", datetime!(2024-03-01 10:00 UTC));

    let response = send(&app, Method::DELETE, &format!("/employee/{}", ada.id), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(response).await, "integrity_error");
}

#[tokio::test]
async fn sales_store_canonical_prices() {
    let (store, app) = fresh();
    let ada = store.seed_employee("Ada", "Lovelace", "ada@example.com");

    let response = send(
        &app,
        Method::POST,
        "/sales",
        Some(json!({
            "product_name": "Keyboard",
            "category": "Hardware",
            "price": 19.9,
            "sale_date": "2024-03-15",
            "employee_id": ada.id,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let sale = json_body(response).await;
    assert_eq!(sale["price"], "19.90");
    assert_eq!(sale["currency"], "EUR");
    assert_eq!(sale["sale_date"], "2024-03-15T00:00:00Z");

    let id = sale["id"].as_i64().expect("id");
    let response = send(
        &app,
        Method::PUT,
        &format!("/sales/{id}"),
        Some(json!({ "price": "19.9" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "no_fields_to_update");

    let response = send(
        &app,
        Method::PUT,
        &format!("/sales/{id}?currency=usd"),
        Some(json!({ "price": "25" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let sale = json_body(response).await;
    assert_eq!(sale["price"], "25.00");
    assert_eq!(sale["currency"], "USD");
}

#[tokio::test]
async fn sales_are_validated() {
    let (store, app) = fresh();
    let ada = store.seed_employee("Ada", "Lovelace", "ada@example.com");
    let tomorrow = (OffsetDateTime::now_utc() + Duration::days(2)).date().to_string();

    let response = send(
        &app,
        Method::POST,
        "/sales",
        Some(json!({
            "product_name": "Keyboard",
            "category": "Hardware",
            "price": "10",
            "sale_date": tomorrow,
            "employee_id": ada.id,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "sale_date_in_future");

    let response = send(
        &app,
        Method::POST,
        "/sales",
        Some(json!({
            "product_name": "Keyboard",
            "category": "Hardware",
            "price": "-3",
            "employee_id": ada.id,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "price_must_be_positive");

    let response = send(
        &app,
        Method::POST,
        "/sales",
        Some(json!({
            "product_name": "Yacht",
            "category": "Marine",
            "price": "123456789012345",
            "employee_id": ada.id,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "price_too_large");

    let response = send(
        &app,
        Method::POST,
        "/sales",
        Some(json!({
            "product_name": "Keyboard",
            "category": "Hardware",
            "price": "10",
            "employee_id": 999,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        Method::POST,
        "/sales",
        Some(json!({ "product_name": "Keyboard", "price": "10", "employee_id": ada.id })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "missing_required_field");

    assert_eq!(store.sale_count(), 0);
}

#[tokio::test]
async fn monthly_report_downloads_a_pdf() {
    let (store, app) = fresh();
    let ada = store.seed_employee("Ada", "Lovelace", "ada@example.com");
    store.seed_sale(ada.id, "10.00", datetime!(2024-03-01 00:00 UTC));
    store.seed_sale(ada.id, "5.50", datetime!(2024-03-31 23:59:59 UTC));
    store.seed_sale(ada.id, "99.00", datetime!(2024-04-01 00:00 UTC));

    let response = send(
        &app,
        Method::GET,
        &format!("/employee/{}/reports/monthly?year=2024&month=3", ada.id),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("application/pdf")
    );
    let disposition = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .expect("content disposition")
        .to_string();
    assert_eq!(
        disposition,
        format!(
            "attachment; filename=\"monthly-sales-report-{}-2024-03.pdf\"",
            ada.id
        )
    );

    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"%PDF-"));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("Sales: 2, Revenue: 15.50 EUR"));
}

#[tokio::test]
async fn report_parameters_are_checked() {
    let (store, app) = fresh();
    let ada = store.seed_employee("Ada", "Lovelace", "ada@example.com");

    let response = send(
        &app,
        Method::GET,
        &format!("/employee/{}/reports/monthly?year=2024", ada.id),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "missing_required_field");

    let response = send(
        &app,
        Method::GET,
        &format!("/employee/{}/reports/monthly?year=2024&month=13", ada.id),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "invalid_month");

    let response = send(
        &app,
        Method::GET,
        &format!("/employee/{}/reports/monthly?year=2024&month=3&month=4", ada.id),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "malformed_input");
    assert!(
        body["error"]["hint"]
            .as_str()
            .is_some_and(|hint| hint.contains("month"))
    );

    let response = send(
        &app,
        Method::GET,
        &format!("/employee/{}/reports/quarterly?year=2000&quarter=1", ada.id),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "invalid_year");

    let year = OffsetDateTime::now_utc().year();
    let response = send(
        &app,
        Method::GET,
        &format!("/employee/{}/reports/quarterly?year={year}&quarter=5", ada.id),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "invalid_quarter");

    let response = send(
        &app,
        Method::GET,
        "/employee/404/reports/monthly?year=2024&month=1",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
