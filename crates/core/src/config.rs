//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the session.
//! Core code never reads environment variables itself; the `*_from_env_value` helpers take
//! the raw value so the caller decides where it came from.

use crate::constants::DEFAULT_SEED_ORDERS;
use crate::pricing::{Pricing, Tariffs};
use crate::{OrderError, OrderResult};
use dental_catalog::Catalog;
use std::path::PathBuf;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    catalog: Catalog,
    tariffs: Tariffs,
    seed_orders: bool,
}

impl CoreConfig {
    pub fn new(catalog: Catalog, tariffs: Tariffs, seed_orders: bool) -> Self {
        Self {
            catalog,
            tariffs,
            seed_orders,
        }
    }

    /// Built-in catalog, default tariffs, seeded store.
    pub fn builtin() -> OrderResult<Self> {
        Ok(Self::new(
            Catalog::builtin()?,
            Tariffs::default(),
            DEFAULT_SEED_ORDERS,
        ))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tariffs(&self) -> &Tariffs {
        &self.tariffs
    }

    /// Whether a new session starts with the fixture orders.
    pub fn seed_orders(&self) -> bool {
        self.seed_orders
    }

    pub fn pricing(&self) -> Pricing<'_> {
        Pricing {
            catalog: &self.catalog,
            tariffs: &self.tariffs,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Load the catalog from the file named by `value`, or the built-in catalog when unset.
pub fn catalog_from_env_value(value: Option<String>) -> OrderResult<Catalog> {
    match non_blank(value) {
        Some(path) => Ok(Catalog::load(&PathBuf::from(path))?),
        None => Ok(Catalog::builtin()?),
    }
}

/// Load tariffs from the file named by `value`, or the defaults when unset.
pub fn tariffs_from_env_value(value: Option<String>) -> OrderResult<Tariffs> {
    match non_blank(value) {
        Some(path) => Tariffs::load(&PathBuf::from(path)),
        None => Ok(Tariffs::default()),
    }
}

/// Parse the seed switch. Unset or blank means the default (seeded).
pub fn seed_orders_from_env_value(value: Option<String>) -> OrderResult<bool> {
    let Some(value) = non_blank(value) else {
        return Ok(DEFAULT_SEED_ORDERS);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(OrderError::InvalidInput(format!(
            "seed orders switch must be true or false, got '{value}'"
        ))),
    }
}
