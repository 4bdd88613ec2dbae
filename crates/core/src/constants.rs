//! Constants used throughout the dental core crate.
//!
//! Pricing constants here are the built-in tariff defaults; a tariff file loaded at
//! startup may override them.

/// Order-code prefix for procedure names that have no dedicated prefix.
pub const FALLBACK_PREFIX: &str = "OR";

/// Minimum number of digits in an order-code number. Larger numbers widen the field.
pub const CODE_NUMBER_WIDTH: usize = 3;

/// Doctor share as a percentage of the net price. System-wide, not per procedure.
pub const DOCTOR_SHARE_PERCENT: u64 = 10;

/// Quantity recorded on every order.
pub const ORDER_QUANTITY: u32 = 1;

/// Flat surcharge added when anesthetic is used, for every procedure.
pub const ANESTHETIC_SURCHARGE: u64 = 500;

pub const BONE_GRAFT_BASE_PRICE: u64 = 2500;
pub const BONE_GRAFT_PER_FIXING_SCREW: u64 = 300;
pub const BONE_GRAFT_CARE_PROVIDER: &str = "Dr. Smith";

pub const GUM_SURGERY_BASE_PRICE: u64 = 3000;
pub const GUM_SURGERY_PER_FIXING_SCREW: u64 = 400;
pub const GUM_SURGERY_CARE_PROVIDER: &str = "Dr. Lee";

/// Root canal pricing is the sum of catalog prices; there is no base amount.
pub const ROOT_CANAL_BASE_PRICE: u64 = 0;
pub const ROOT_CANAL_CARE_PROVIDER: &str = "Dr. Johnson";

/// Whether a new session starts with the built-in fixture orders.
pub const DEFAULT_SEED_ORDERS: bool = true;
