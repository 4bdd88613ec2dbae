//! Sequential order-code assignment.
//!
//! Each procedure owns a two-letter prefix. The next code for a prefix is one past the
//! highest number already used with that prefix, so codes stay unique and strictly
//! increasing per prefix in creation order. Codes whose number part does not parse are
//! ignored rather than reported.
//!
//! Sequence numbers are compared and incremented as decimal digit strings, so there is no
//! largest number to overflow at.

use crate::constants::FALLBACK_PREFIX;
use crate::order::{Order, OrderCode};
use crate::procedure::Procedure;
use std::cmp::Ordering;
use std::fmt;

/// Prefix for a procedure key or display label; unknown names get the generic prefix.
pub fn prefix_for(procedure_name: &str) -> &'static str {
    Procedure::from_name(procedure_name)
        .map(Procedure::prefix)
        .unwrap_or(FALLBACK_PREFIX)
}

/// Next code for `procedure_name` given the orders already recorded.
///
/// Pure with respect to its inputs. Callers append the new order themselves.
pub fn next_code(procedure_name: &str, existing: &[Order]) -> OrderCode {
    let prefix = prefix_for(procedure_name);
    let highest = existing
        .iter()
        .filter_map(|order| order.code().digits_after(prefix))
        .map(SequenceNumber::from_digits)
        .max();

    let number = match &highest {
        Some(n) => n.successor(),
        None => SequenceNumber::first(),
    };

    let code = OrderCode::assigned(prefix, &number);
    tracing::debug!(
        "assigned order code {} for '{}' (previous highest: {:?})",
        code,
        procedure_name,
        highest
    );
    code
}

/// A non-negative decimal number of any length, held without leading zeros.
#[derive(Clone, Debug, PartialEq, Eq)]
struct SequenceNumber(String);

impl SequenceNumber {
    fn first() -> Self {
        Self("1".to_string())
    }

    /// `digits` must be non-empty ASCII digits.
    fn from_digits(digits: &str) -> Self {
        let significant = digits.trim_start_matches('0');
        if significant.is_empty() {
            Self("0".to_string())
        } else {
            Self(significant.to_string())
        }
    }

    fn successor(&self) -> Self {
        let mut digits = self.0.clone().into_bytes();
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
        Self(digits.into_iter().map(char::from).collect())
    }
}

impl Ord for SequenceNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for SequenceNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::order_with_code;

    #[test]
    fn test_empty_collection_starts_at_one() {
        assert_eq!(next_code("boneGraft", &[]).as_str(), "BG001");
        assert_eq!(next_code("rootCanal", &[]).as_str(), "RT001");
    }

    #[test]
    fn test_no_matching_prefix_starts_at_one() {
        let orders = vec![order_with_code("GS001"), order_with_code("GS002")];
        assert_eq!(next_code("boneGraft", &orders).as_str(), "BG001");
    }

    #[test]
    fn test_continues_after_highest_number_not_count() {
        let orders = vec![
            order_with_code("BG001"),
            order_with_code("GS004"),
            order_with_code("BG003"),
        ];
        assert_eq!(next_code("boneGraft", &orders).as_str(), "BG004");
        assert_eq!(next_code("gumSurgery", &orders).as_str(), "GS005");
    }

    #[test]
    fn test_unparseable_codes_are_ignored() {
        let orders = vec![
            order_with_code("BG001"),
            order_with_code("BG003"),
            order_with_code("BG00x"),
        ];
        assert_eq!(next_code("boneGraft", &orders).as_str(), "BG004");
    }

    #[test]
    fn test_only_malformed_codes_start_at_one() {
        let orders = vec![order_with_code("BGabc"), order_with_code("BG")];
        assert_eq!(next_code("boneGraft", &orders).as_str(), "BG001");
    }

    #[test]
    fn test_key_and_label_share_prefix() {
        let orders = vec![order_with_code("GS002")];
        assert_eq!(
            next_code("gumSurgery", &orders),
            next_code("ผ่าตัดเหงือก", &orders)
        );
        assert_eq!(next_code("Bone graft", &[]), next_code("boneGraft", &[]));
        assert_eq!(next_code("รักษารากฟัน", &[]).as_str(), "RT001");
    }

    #[test]
    fn test_unknown_procedure_uses_fallback_prefix() {
        assert_eq!(prefix_for("implant"), "OR");
        assert_eq!(prefix_for(" boneGraft "), "OR");
        let orders = vec![order_with_code("OR009")];
        assert_eq!(next_code("implant", &orders).as_str(), "OR010");
    }

    #[test]
    fn test_counter_past_999_widens() {
        let orders = vec![order_with_code("BG999")];
        assert_eq!(next_code("boneGraft", &orders).as_str(), "BG1000");

        let orders = vec![order_with_code("BG1000"), order_with_code("BG999")];
        assert_eq!(next_code("boneGraft", &orders).as_str(), "BG1001");
    }

    #[test]
    fn test_huge_numbers_still_advance() {
        let orders = vec![order_with_code("BG18446744073709551615")];
        assert_eq!(
            next_code("boneGraft", &orders).as_str(),
            "BG18446744073709551616"
        );

        let orders = vec![
            order_with_code("BG99999999999999999999999999999999999999999"),
            order_with_code("BG005"),
        ];
        assert_eq!(
            next_code("boneGraft", &orders).as_str(),
            "BG100000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_leading_zeros_do_not_change_the_number() {
        let orders = vec![order_with_code("BG0009"), order_with_code("BG8")];
        assert_eq!(next_code("boneGraft", &orders).as_str(), "BG010");

        let orders = vec![order_with_code("BG000")];
        assert_eq!(next_code("boneGraft", &orders).as_str(), "BG001");
    }
}
