//! Turns an aggregated sales report into document draw commands.

use crate::domain::entities::{EmployeeRecord, SaleRecord};
use crate::domain::price::format_price;
use crate::domain::reports::{ReportPeriod, SalesSummary};
use crate::domain::sales::format_sale_day;

pub const TABLE_COLUMNS: [&str; 4] = ["Date", "Product", "Category", "Price"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Subtitle,
    Body,
}

/// Produces fresh documents; one per rendered report.
pub trait DocumentSink: Send + Sync {
    fn new_document(&self) -> Box<dyn DocumentWriter>;
}

/// Append-only drawing surface. Pagination is the writer's concern.
pub trait DocumentWriter: Send {
    fn write_line(&mut self, text: &str, style: LineStyle);

    /// Start a table; the header row is repeated on every page the table spans.
    fn start_table(&mut self, columns: &[&str]);

    fn write_row(&mut self, cells: &[String]);

    fn finish(self: Box<Self>) -> Vec<u8>;
}

/// Everything a report document shows.
pub struct ReportView<'a> {
    pub employee: &'a EmployeeRecord,
    pub period: &'a ReportPeriod,
    pub summary: &'a SalesSummary,
    pub sales: &'a [SaleRecord],
    /// Suffix appended to the revenue total.
    pub currency: &'a str,
}

pub fn render_report(sink: &dyn DocumentSink, view: &ReportView<'_>) -> Vec<u8> {
    let mut doc = sink.new_document();

    doc.write_line(
        &format!(
            "{} for {}",
            view.period.kind().title(),
            view.employee.full_name()
        ),
        LineStyle::Title,
    );
    doc.write_line(&format!("Period: {}", view.period.label()), LineStyle::Subtitle);
    doc.write_line(&summary_line(view.summary, view.currency), LineStyle::Body);

    if !view.sales.is_empty() {
        doc.start_table(&TABLE_COLUMNS);
        for sale in view.sales {
            doc.write_row(&[
                format_sale_day(sale.sale_date),
                sale.product_name.clone(),
                sale.category.clone(),
                format!("{} {}", sale.price, sale.currency),
            ]);
        }
    }

    doc.finish()
}

pub fn summary_line(summary: &SalesSummary, currency: &str) -> String {
    format!(
        "Sales: {}, Revenue: {} {}",
        summary.sale_count,
        format_price(summary.revenue),
        currency
    )
}
