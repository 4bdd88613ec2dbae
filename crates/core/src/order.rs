//! Finalised procedure orders.
//!
//! An [`Order`] is immutable once built: its identifier, code, price and details are fixed
//! at creation and only exposed through accessors. The doctor share is derived from the
//! net price inside the constructor, so the stored value and
//! [`Order::derived_doctor_share`] always agree.

use crate::constants::{CODE_NUMBER_WIDTH, DOCTOR_SHARE_PERCENT, ORDER_QUANTITY};
use crate::procedure::Procedure;
use crate::{OrderError, OrderResult};
use chrono::{DateTime, Utc};
use dental_types::{Money, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque order identifier, rendered as 32 lowercase hex characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Allocates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl Serialize for OrderId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Human-facing order code: a procedure prefix followed by a sequence number, e.g. `BG001`.
///
/// Codes produced by the generator are always well formed. Codes that arrive from elsewhere
/// (fixtures, imports) are kept verbatim even when their number part does not parse; the
/// generator simply skips them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderCode(String);

impl OrderCode {
    /// Formats `prefix` and `number`, zero-padding the number to at least three digits.
    /// Numbers above 999 widen the field rather than truncate.
    pub fn assigned(prefix: &str, number: impl fmt::Display) -> Self {
        Self(format!("{prefix}{number:0>width$}", width = CODE_NUMBER_WIDTH))
    }

    /// Wraps an existing code verbatim.
    pub fn from_raw(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The digits after `prefix`, if this code carries `prefix` followed by nothing but
    /// ASCII digits.
    pub fn digits_after(&self, prefix: &str) -> Option<&str> {
        let digits = self.0.strip_prefix(prefix)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(digits)
    }
}

impl fmt::Display for OrderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Status
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    /// Case-insensitive.
    fn from_str(s: &str) -> OrderResult<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| OrderError::InvalidInput(format!("unknown order status: '{s}'")))
    }
}

// ============================================================================
// Details
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoneGraftDetails {
    pub bone_type: Option<NonEmptyText>,
    pub bone_material: Option<NonEmptyText>,
    pub membrane: Option<NonEmptyText>,
    pub tenting_screw: Option<NonEmptyText>,
    pub fixing_screw: Vec<NonEmptyText>,
    pub suture_material: Option<NonEmptyText>,
    pub anesthetic_used: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GumSurgeryDetails {
    pub bone_material: Option<NonEmptyText>,
    pub membrane: Option<NonEmptyText>,
    pub tenting_screw: Option<NonEmptyText>,
    pub fixing_screw: Vec<NonEmptyText>,
    pub periodontal_dressing: Option<NonEmptyText>,
    pub suture_material: Option<NonEmptyText>,
    pub anesthetic_used: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RootCanalDetails {
    pub filling: Option<NonEmptyText>,
    pub complex: Option<NonEmptyText>,
    pub filling_for_treatment: Option<NonEmptyText>,
    pub visit_charge: Vec<NonEmptyText>,
    pub anesthetic_used: bool,
}

/// Procedure-specific selections, one closed field set per procedure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "procedure", rename_all = "camelCase")]
pub enum ProcedureDetails {
    BoneGraft(BoneGraftDetails),
    GumSurgery(GumSurgeryDetails),
    RootCanal(RootCanalDetails),
}

impl ProcedureDetails {
    /// An empty draft for `procedure`.
    pub fn empty(procedure: Procedure) -> Self {
        match procedure {
            Procedure::BoneGraft => ProcedureDetails::BoneGraft(BoneGraftDetails::default()),
            Procedure::GumSurgery => ProcedureDetails::GumSurgery(GumSurgeryDetails::default()),
            Procedure::RootCanal => ProcedureDetails::RootCanal(RootCanalDetails::default()),
        }
    }

    pub fn procedure(&self) -> Procedure {
        match self {
            ProcedureDetails::BoneGraft(_) => Procedure::BoneGraft,
            ProcedureDetails::GumSurgery(_) => Procedure::GumSurgery,
            ProcedureDetails::RootCanal(_) => Procedure::RootCanal,
        }
    }

    pub fn anesthetic_used(&self) -> bool {
        match self {
            ProcedureDetails::BoneGraft(d) => d.anesthetic_used,
            ProcedureDetails::GumSurgery(d) => d.anesthetic_used,
            ProcedureDetails::RootCanal(d) => d.anesthetic_used,
        }
    }
}

/// Selection context recorded alongside the procedure fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrderDetails {
    /// Sub-category the order was picked from.
    pub sub_category: String,
    /// Procedure name as selected.
    pub order_name: String,
    #[serde(flatten)]
    pub procedure: ProcedureDetails,
}

// ============================================================================
// Order
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Order {
    id: OrderId,
    code: OrderCode,
    procedure: Procedure,
    procedure_name: &'static str,
    ordered_at: DateTime<Utc>,
    net_price: Money,
    status: OrderStatus,
    quantity: NonZeroU32,
    doctor_share: Money,
    care_provider: NonEmptyText,
    details: OrderDetails,
}

impl Order {
    /// Builds an order with a fresh identifier, stamped now.
    ///
    /// The procedure is taken from `details`, quantity is always one, and the doctor share
    /// is derived from `net_price`.
    pub fn new(
        code: OrderCode,
        net_price: Money,
        status: OrderStatus,
        care_provider: NonEmptyText,
        details: OrderDetails,
    ) -> Self {
        let procedure = details.procedure.procedure();
        Self {
            id: OrderId::new(),
            code,
            procedure,
            procedure_name: procedure.label(),
            ordered_at: Utc::now(),
            net_price,
            status,
            quantity: NonZeroU32::new(ORDER_QUANTITY).unwrap_or(NonZeroU32::MIN),
            doctor_share: doctor_share_of(net_price),
            care_provider,
            details,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn code(&self) -> &OrderCode {
        &self.code
    }

    pub fn procedure(&self) -> Procedure {
        self.procedure
    }

    /// Display name of the procedure.
    pub fn procedure_name(&self) -> &'static str {
        self.procedure_name
    }

    pub fn ordered_at(&self) -> DateTime<Utc> {
        self.ordered_at
    }

    pub fn net_price(&self) -> Money {
        self.net_price
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    /// Doctor share recorded at creation.
    pub fn doctor_share(&self) -> Money {
        self.doctor_share
    }

    /// Doctor share recomputed from the net price.
    pub fn derived_doctor_share(&self) -> Money {
        doctor_share_of(self.net_price)
    }

    pub fn care_provider(&self) -> &NonEmptyText {
        &self.care_provider
    }

    pub fn details(&self) -> &OrderDetails {
        &self.details
    }
}

/// 10% of `net_price`.
pub fn doctor_share_of(net_price: Money) -> Money {
    net_price.percent(DOCTOR_SHARE_PERCENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bone_graft_details() -> OrderDetails {
        OrderDetails {
            sub_category: "boneGraft".into(),
            order_name: "boneGraft".into(),
            procedure: ProcedureDetails::BoneGraft(BoneGraftDetails {
                fixing_screw: vec![NonEmptyText::new("fixingScrew1").unwrap()],
                anesthetic_used: true,
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_assigned_code_is_zero_padded() {
        assert_eq!(OrderCode::assigned("BG", 7).as_str(), "BG007");
        assert_eq!(OrderCode::assigned("RT", 42).as_str(), "RT042");
    }

    #[test]
    fn test_assigned_code_widens_past_999() {
        assert_eq!(OrderCode::assigned("GS", 1000).as_str(), "GS1000");
    }

    #[test]
    fn test_digits_after_requires_digits_only() {
        assert_eq!(OrderCode::from_raw("BG003").digits_after("BG"), Some("003"));
        assert_eq!(OrderCode::from_raw("BG00x").digits_after("BG"), None);
        assert_eq!(OrderCode::from_raw("BG").digits_after("BG"), None);
        assert_eq!(OrderCode::from_raw("BG+12").digits_after("BG"), None);
        assert_eq!(OrderCode::from_raw("GS003").digits_after("BG"), None);
    }

    #[test]
    fn test_new_order_derives_doctor_share_and_quantity() {
        let order = Order::new(
            OrderCode::assigned("BG", 1),
            Money::from_whole(3600),
            OrderStatus::Pending,
            NonEmptyText::new("Dr. Smith").unwrap(),
            bone_graft_details(),
        );

        assert_eq!(order.doctor_share(), Money::from_whole(360));
        assert_eq!(order.doctor_share(), order.derived_doctor_share());
        assert_eq!(order.quantity().get(), 1);
        assert_eq!(order.procedure(), Procedure::BoneGraft);
        assert_eq!(order.procedure_name(), "Bone graft");
    }

    #[test]
    fn test_order_ids_are_canonical_and_unique() {
        let a = OrderId::new();
        let b = OrderId::new();
        assert_ne!(a, b);
        let rendered = a.to_string();
        assert_eq!(rendered.len(), 32);
        assert!(rendered.bytes().all(|c| matches!(c, b'0'..=b'9' | b'a'..=b'f')));
    }

    #[test]
    fn test_status_parses_case_insensitively() {
        assert_eq!("processing".parse::<OrderStatus>().unwrap(), OrderStatus::Processing);
        assert_eq!("Cancelled".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_serialises_with_tagged_details() {
        let order = Order::new(
            OrderCode::assigned("BG", 1),
            Money::from_whole(3300),
            OrderStatus::Pending,
            NonEmptyText::new("Dr. Smith").unwrap(),
            bone_graft_details(),
        );
        let json = serde_json::to_value(&order).expect("order should serialise");

        assert_eq!(json["code"], "BG001");
        assert_eq!(json["status"], "Pending");
        assert_eq!(json["net_price"], 3300);
        assert_eq!(json["doctor_share"], 330);
        assert_eq!(json["details"]["procedure"], "boneGraft");
        assert_eq!(json["details"]["fixing_screw"][0], "fixingScrew1");
        assert_eq!(json["details"]["sub_category"], "boneGraft");
    }
}
