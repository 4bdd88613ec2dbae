//! Fixture orders a new session can start with.

use crate::error::parse_yaml;
use crate::order::{Order, OrderCode, OrderDetails, OrderStatus, ProcedureDetails};
use crate::OrderResult;
use dental_types::{Money, NonEmptyText};
use serde::Deserialize;

/// The fixture document shipped with the crate.
pub const SEED_ORDERS_YAML: &str = include_str!("../data/seed_orders.yaml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedOrderWire {
    code: String,
    status: OrderStatus,
    net_price: Money,
    care_provider: NonEmptyText,
    sub_category: String,
    order_name: String,
    details: ProcedureDetails,
}

/// The built-in fixture orders, in document order.
pub fn seed_orders() -> OrderResult<Vec<Order>> {
    parse_seed_orders(SEED_ORDERS_YAML)
}

/// Parse a list of fixture orders. Codes are kept verbatim.
pub fn parse_seed_orders(yaml_text: &str) -> OrderResult<Vec<Order>> {
    let wire: Vec<SeedOrderWire> = parse_yaml("seed order", yaml_text)?;
    Ok(wire
        .into_iter()
        .map(|w| {
            Order::new(
                OrderCode::from_raw(w.code),
                w.net_price,
                w.status,
                w.care_provider,
                OrderDetails {
                    sub_category: w.sub_category,
                    order_name: w.order_name,
                    procedure: w.details,
                },
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedure::Procedure;
    use crate::OrderError;

    #[test]
    fn test_builtin_seed_orders() {
        let orders = seed_orders().expect("built-in seed orders should parse");
        let codes: Vec<&str> = orders.iter().map(|o| o.code().as_str()).collect();
        assert_eq!(codes, vec!["BG001", "GS001", "BG002", "GS002"]);

        assert_eq!(orders[0].status(), OrderStatus::Processing);
        assert_eq!(orders[0].net_price(), Money::from_whole(5500));
        assert_eq!(orders[0].doctor_share(), Money::from_whole(550));
        assert_eq!(orders[1].procedure(), Procedure::GumSurgery);
        assert_eq!(orders[2].care_provider().as_str(), "Dr. Wilson");
        assert_eq!(orders[3].status(), OrderStatus::Cancelled);
        assert!(!orders[3].details().procedure.anesthetic_used());
    }

    #[test]
    fn test_seed_doctor_share_matches_derivation() {
        for order in seed_orders().unwrap() {
            assert_eq!(order.doctor_share(), order.derived_doctor_share());
        }
    }

    #[test]
    fn test_rejects_field_from_other_procedure() {
        let yaml = r#"
- code: RT001
  status: Pending
  net_price: 800
  care_provider: Dr. Johnson
  sub_category: rootCanal
  order_name: rootCanal
  details:
    procedure: rootCanal
    visit_charge: [firstVisit]
    bone_type: boneType1
"#;
        let err = parse_seed_orders(yaml).expect_err("bone_type is not a root canal field");
        assert!(matches!(err, OrderError::Schema { document: "seed order", .. }));
    }

    #[test]
    fn test_keeps_malformed_codes_verbatim() {
        let yaml = r#"
- code: BG00x
  status: Completed
  net_price: 2500
  care_provider: Dr. Smith
  sub_category: boneGraft
  order_name: boneGraft
  details:
    procedure: boneGraft
"#;
        let orders = parse_seed_orders(yaml).expect("should parse");
        assert_eq!(orders[0].code().as_str(), "BG00x");
    }
}
