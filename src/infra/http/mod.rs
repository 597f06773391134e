pub mod error;
pub mod handlers;
mod middleware;
pub mod models;
pub mod request;
pub mod state;

pub use middleware::RequestContext;
pub use state::ApiState;

use axum::{Router, middleware as axum_middleware, routing::get};

use self::error::ApiError;
use self::middleware::{log_responses, set_request_context};

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/health/db", get(handlers::db_health))
        .route(
            "/employee",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/employee/{id}",
            get(handlers::get_employee)
                .put(handlers::update_employee)
                .delete(handlers::delete_employee),
        )
        .route(
            "/employee/{id}/reports/monthly",
            get(handlers::monthly_report),
        )
        .route(
            "/employee/{id}/reports/quarterly",
            get(handlers::quarterly_report),
        )
        .route("/sales", get(handlers::list_sales).post(handlers::create_sale))
        .route(
            "/sales/{id}",
            get(handlers::get_sale)
                .put(handlers::update_sale)
                .delete(handlers::delete_sale),
        )
        .fallback(route_not_found)
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("route not found")
}
