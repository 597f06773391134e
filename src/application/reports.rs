use std::sync::Arc;

use metrics::counter;
use time::OffsetDateTime;

use crate::application::error::ServiceError;
use crate::application::report_render::{DocumentSink, ReportView, render_report};
use crate::application::repos::{EmployeesRepo, SalesRepo};
use crate::domain::entities::EmployeeRecord;
use crate::domain::reports::{
    ReportPeriod, SalesAggregate, SalesSummary, aggregate_sales, ensure_year_within,
};

/// A rendered report ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub summary: SalesSummary,
}

#[derive(Clone)]
pub struct ReportService {
    employees: Arc<dyn EmployeesRepo>,
    sales: Arc<dyn SalesRepo>,
    sink: Arc<dyn DocumentSink>,
    currency: String,
}

impl ReportService {
    pub fn new(
        employees: Arc<dyn EmployeesRepo>,
        sales: Arc<dyn SalesRepo>,
        sink: Arc<dyn DocumentSink>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            employees,
            sales,
            sink,
            currency: currency.into(),
        }
    }

    /// Calendar-month report. Any representable year is accepted.
    pub async fn monthly(
        &self,
        employee_id: i64,
        year: i32,
        month: u8,
    ) -> Result<ReportDocument, ServiceError> {
        let employee = self.employee(employee_id).await?;
        let period = ReportPeriod::month(year, month)?;
        self.build(&employee, period).await
    }

    /// Quarter report; `year` must lie between the employee's start year and now.
    pub async fn quarterly(
        &self,
        employee_id: i64,
        year: i32,
        quarter: u8,
    ) -> Result<ReportDocument, ServiceError> {
        let employee = self.employee(employee_id).await?;
        ensure_year_within(
            year,
            employee.created_at.year(),
            OffsetDateTime::now_utc().year(),
        )?;
        let period = ReportPeriod::quarter(year, quarter)?;
        self.build(&employee, period).await
    }

    /// Sales of one employee within `period`, with count and revenue.
    pub async fn aggregate(
        &self,
        employee_id: i64,
        period: &ReportPeriod,
    ) -> Result<SalesAggregate, ServiceError> {
        let range = period.range();
        let sales = self.sales.list_sales_between(range.start, range.end).await?;
        let aggregate = aggregate_sales(sales, employee_id, range);

        if !aggregate.unparseable_prices.is_empty() {
            counter!("workrest_report_price_parse_failures_total")
                .increment(aggregate.unparseable_prices.len() as u64);
            tracing::warn!(
                target = "workrest::reports",
                employee_id,
                sale_ids = ?aggregate.unparseable_prices,
                "Stored prices could not be parsed; counted as zero revenue"
            );
        }
        Ok(aggregate)
    }

    async fn employee(&self, id: i64) -> Result<EmployeeRecord, ServiceError> {
        self.employees
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("employee"))
    }

    async fn build(
        &self,
        employee: &EmployeeRecord,
        period: ReportPeriod,
    ) -> Result<ReportDocument, ServiceError> {
        let aggregate = self.aggregate(employee.id, &period).await?;
        let kind = period.kind();

        let bytes = render_report(
            self.sink.as_ref(),
            &ReportView {
                employee,
                period: &period,
                summary: &aggregate.summary,
                sales: &aggregate.sales,
                currency: &self.currency,
            },
        );
        if bytes.is_empty() {
            return Err(ServiceError::Render("document writer produced no output".into()));
        }

        counter!("workrest_reports_rendered_total", "kind" => kind.as_str()).increment(1);
        tracing::info!(
            target = "workrest::reports",
            employee_id = employee.id,
            kind = kind.as_str(),
            period = %period.label(),
            sale_count = aggregate.summary.sale_count,
            "Rendered sales report"
        );

        Ok(ReportDocument {
            filename: format!(
                "{}-sales-report-{}-{}.pdf",
                kind.as_str(),
                employee.id,
                period.slug()
            ),
            bytes,
            summary: aggregate.summary,
        })
    }
}
