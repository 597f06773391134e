//! Layered partial-field resolution for record mutations.
//!
//! A request may carry fields in a JSON body and in the query string. Each source
//! is parsed into a layer on its own, layers are folded in order (later wins),
//! and the result is laid over the stored record to produce the final payload.

use std::collections::HashMap;

use time::OffsetDateTime;

use crate::application::error::ServiceError;
use crate::application::repos::{UpdateEmployeeParams, UpdateSaleParams};
use crate::domain::email::validate_email;
use crate::domain::entities::{EmployeeRecord, SaleRecord};
use crate::domain::price::canonical_price;
use crate::domain::sales::{is_unset_date, normalize_currency, parse_sale_date};

/// A partial set of record fields where `None` means "not supplied".
pub trait FieldLayer: Default {
    /// Lay `other` over `self`; fields present in `other` win.
    fn overlay(self, other: Self) -> Self;
}

/// Fold layers in order so that later layers take precedence.
pub fn resolve_layers<L: FieldLayer>(layers: impl IntoIterator<Item = L>) -> L {
    layers.into_iter().fold(L::default(), L::overlay)
}

/// Final payload plus the names of fields that differ from the stored record.
#[derive(Debug, Clone)]
pub struct Reconciled<P> {
    pub params: P,
    pub changed: Vec<&'static str>,
}

impl<P> Reconciled<P> {
    pub fn is_changed(&self, field: &str) -> bool {
        self.changed.contains(&field)
    }

    fn require_changes(self) -> Result<Self, ServiceError> {
        if self.changed.is_empty() {
            return Err(ServiceError::NoFieldsToUpdate);
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFields {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
}

impl EmployeeFields {
    /// Build a layer from raw values, dropping blanks and checking email syntax.
    pub fn parse(
        name: Option<String>,
        surname: Option<String>,
        email: Option<String>,
    ) -> Result<Self, ServiceError> {
        let email = present(email)
            .map(|value| validate_email(&value))
            .transpose()?;
        Ok(Self {
            name: present(name),
            surname: present(surname),
            email,
        })
    }

    pub fn from_named(values: &HashMap<String, String>) -> Result<Self, ServiceError> {
        Self::parse(
            values.get("name").cloned(),
            values.get("surname").cloned(),
            values.get("email").cloned(),
        )
    }

    /// Lay these fields over `stored`, failing when nothing would change.
    pub fn reconcile(
        self,
        stored: &EmployeeRecord,
    ) -> Result<Reconciled<UpdateEmployeeParams>, ServiceError> {
        let mut changed = Vec::new();
        let name = pick("name", self.name, &stored.name, &mut changed);
        let surname = pick("surname", self.surname, &stored.surname, &mut changed);
        let email = pick("email", self.email, &stored.email, &mut changed);

        Reconciled {
            params: UpdateEmployeeParams {
                id: stored.id,
                name,
                surname,
                email,
            },
            changed,
        }
        .require_changes()
    }
}

impl FieldLayer for EmployeeFields {
    fn overlay(self, other: Self) -> Self {
        Self {
            name: other.name.or(self.name),
            surname: other.surname.or(self.surname),
            email: other.email.or(self.email),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleFields {
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub currency: Option<String>,
    /// Canonical two-decimal amount.
    pub price: Option<String>,
    pub sale_date: Option<OffsetDateTime>,
    pub employee_id: Option<i64>,
}

/// Raw sale values as they arrive from a structured body.
#[derive(Debug, Clone, Default)]
pub struct SaleInput {
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub currency: Option<String>,
    pub price: Option<String>,
    pub sale_date: Option<String>,
    pub employee_id: Option<i64>,
}

impl SaleFields {
    /// Build a layer from raw values, dropping blanks, zero ids and epoch dates.
    pub fn parse(input: SaleInput) -> Result<Self, ServiceError> {
        let price = present(input.price)
            .map(|raw| canonical_price(&raw))
            .transpose()?;
        let sale_date = present(input.sale_date)
            .map(|raw| parse_sale_date(&raw).map_err(|err| ServiceError::malformed("sale_date", err)))
            .transpose()?
            .filter(|value| !is_unset_date(*value));

        Ok(Self {
            product_name: present(input.product_name),
            category: present(input.category),
            currency: present(input.currency).map(|value| normalize_currency(&value)),
            price,
            sale_date,
            employee_id: input.employee_id.filter(|id| *id != 0),
        })
    }

    pub fn from_named(values: &HashMap<String, String>) -> Result<Self, ServiceError> {
        let employee_id = present(values.get("employee_id").cloned())
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|err| ServiceError::malformed("employee_id", err))
            })
            .transpose()?;

        Self::parse(SaleInput {
            product_name: values.get("product_name").cloned(),
            category: values.get("category").cloned(),
            currency: values.get("currency").cloned(),
            price: values.get("price").cloned(),
            sale_date: values.get("sale_date").cloned(),
            employee_id,
        })
    }

    /// Lay these fields over `stored`, failing when nothing would change.
    pub fn reconcile(self, stored: &SaleRecord) -> Result<Reconciled<UpdateSaleParams>, ServiceError> {
        let mut changed = Vec::new();
        let product_name = pick("product_name", self.product_name, &stored.product_name, &mut changed);
        let category = pick("category", self.category, &stored.category, &mut changed);
        let currency = pick("currency", self.currency, &stored.currency, &mut changed);
        let price = pick("price", self.price, &stored.price, &mut changed);
        let sale_date = pick("sale_date", self.sale_date, &stored.sale_date, &mut changed);
        let employee_id = pick("employee_id", self.employee_id, &stored.employee_id, &mut changed);

        Reconciled {
            params: UpdateSaleParams {
                id: stored.id,
                product_name,
                category,
                currency,
                price,
                sale_date,
                employee_id,
            },
            changed,
        }
        .require_changes()
    }
}

impl FieldLayer for SaleFields {
    fn overlay(self, other: Self) -> Self {
        Self {
            product_name: other.product_name.or(self.product_name),
            category: other.category.or(self.category),
            currency: other.currency.or(self.currency),
            price: other.price.or(self.price),
            sale_date: other.sale_date.or(self.sale_date),
            employee_id: other.employee_id.or(self.employee_id),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn pick<T: Clone + PartialEq>(
    field: &'static str,
    candidate: Option<T>,
    stored: &T,
    changed: &mut Vec<&'static str>,
) -> T {
    match candidate {
        Some(value) if &value != stored => {
            changed.push(field);
            value
        }
        _ => stored.clone(),
    }
}
