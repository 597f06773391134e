use std::{process, sync::Arc};

use sqlx::PgPool;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;
use workrest::{
    application::{
        employees::EmployeeService,
        error::AppError,
        report_render::DocumentSink,
        reports::ReportService,
        repos::{EmployeesRepo, EmployeesWriteRepo, HealthRepo, SalesRepo, SalesWriteRepo},
        sales::SaleService,
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState},
        pdf::PdfSink,
        telemetry,
    },
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let pool = open_database(&settings.database).await?;
    apply_migrations(&pool).await?;

    let repositories = Arc::new(PostgresRepositories::new(pool));
    let state = build_api_state(repositories, &settings);

    serve_http(&settings, state).await
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let pool = open_database(&settings.database).await?;
    apply_migrations(&pool).await?;
    pool.close().await;
    Ok(())
}

async fn open_database(database: &config::DatabaseSettings) -> Result<PgPool, AppError> {
    let url = database
        .url
        .as_deref()
        .ok_or_else(|| AppError::from(InfraError::MissingDatabaseUrl))?;

    let pool = PostgresRepositories::connect(
        url,
        database.max_connections.get(),
        database.schema.as_deref(),
    )
    .await
    .map_err(|err| AppError::from(InfraError::Connect(err)))?;

    info!(
        target = "workrest::db",
        schema = database.schema.as_deref().unwrap_or("public"),
        max_connections = database.max_connections.get(),
        "database pool ready"
    );
    Ok(pool)
}

async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    PostgresRepositories::run_migrations(pool)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(target = "workrest::db", "migrations applied");
    Ok(())
}

fn build_api_state(repositories: Arc<PostgresRepositories>, settings: &config::Settings) -> ApiState {
    let employees_read: Arc<dyn EmployeesRepo> = repositories.clone();
    let employees_write: Arc<dyn EmployeesWriteRepo> = repositories.clone();
    let sales_read: Arc<dyn SalesRepo> = repositories.clone();
    let sales_write: Arc<dyn SalesWriteRepo> = repositories.clone();
    let health: Arc<dyn HealthRepo> = repositories;
    let sink: Arc<dyn DocumentSink> = Arc::new(PdfSink);

    ApiState {
        employees: Arc::new(EmployeeService::new(
            employees_read.clone(),
            employees_write,
        )),
        sales: Arc::new(SaleService::new(
            sales_read.clone(),
            sales_write,
            employees_read.clone(),
            settings.sales.default_currency.clone(),
        )),
        reports: Arc::new(ReportService::new(
            employees_read,
            sales_read,
            sink,
            settings.reports.currency.clone(),
        )),
        health,
    }
}

async fn serve_http(settings: &config::Settings, state: ApiState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        target = "workrest::server",
        addr = %settings.server.addr,
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!(target = "workrest::server", "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(
            target = "workrest::server",
            error = %err,
            "failed to listen for shutdown signal"
        );
        std::future::pending::<()>().await;
    }
    info!(target = "workrest::server", "shutdown requested");
}
