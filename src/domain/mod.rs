//! Domain layer types and invariants.

pub mod email;
pub mod entities;
pub mod error;
pub mod price;
pub mod reports;
pub mod sales;
