//! Application services: record mutations, reconciliation and reports.

pub mod employees;
pub mod error;
pub mod reconcile;
pub mod report_render;
pub mod reports;
pub mod repos;
pub mod sales;
