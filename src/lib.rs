//! Employee and sales records service with period-based PDF sales reports.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
