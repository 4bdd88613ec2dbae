//! # Dental Core
//!
//! Order-entry logic for a dental clinic.
//!
//! This crate contains the pure domain operations:
//! - Procedure forms with per-procedure fields and required-field checks
//! - Net price and doctor share calculation
//! - Sequential order codes per procedure prefix
//! - An in-memory, append-only order store for one session
//! - The filtered summary projection
//!
//! **No presentation concerns**: argument parsing, output formatting and environment lookup
//! belong in the `dental` binary. Configuration arrives as a resolved [`CoreConfig`].

pub mod code;
pub mod config;
pub mod constants;
pub mod error;
pub mod form;
pub mod order;
pub mod pricing;
pub mod procedure;
pub mod seed;
pub mod session;
pub mod store;
pub mod summary;

pub use code::{next_code, prefix_for};
pub use config::CoreConfig;
pub use error::{OrderError, OrderResult};
pub use form::{
    Editing, FieldValue, FieldValueRef, FormField, ProcedureForm, SubmitBlocked, Submitted,
};
pub use order::{
    BoneGraftDetails, GumSurgeryDetails, Order, OrderCode, OrderDetails, OrderId, OrderStatus,
    ProcedureDetails, RootCanalDetails,
};
pub use pricing::{PriceCalculator, Pricing, Tariff, Tariffs};
pub use procedure::Procedure;
pub use seed::seed_orders;
pub use session::OrderSession;
pub use store::OrderStore;
pub use summary::{Filter, ProviderFilter, StatusFilter, SummaryView};
