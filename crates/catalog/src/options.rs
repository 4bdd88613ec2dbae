//! Option lists and their entries.

use dental_types::{Money, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The enumerated choice lists a procedure form can draw from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionListKind {
    BoneType,
    BoneMaterial,
    Membrane,
    TentingScrew,
    FixingScrew,
    SutureMaterial,
    PeriodontalDressing,
    Filling,
    Complex,
    FillingForTreatment,
    VisitCharge,
}

impl OptionListKind {
    /// Every list, in declaration order.
    pub const ALL: [OptionListKind; 11] = [
        OptionListKind::BoneType,
        OptionListKind::BoneMaterial,
        OptionListKind::Membrane,
        OptionListKind::TentingScrew,
        OptionListKind::FixingScrew,
        OptionListKind::SutureMaterial,
        OptionListKind::PeriodontalDressing,
        OptionListKind::Filling,
        OptionListKind::Complex,
        OptionListKind::FillingForTreatment,
        OptionListKind::VisitCharge,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OptionListKind::BoneType => "bone_type",
            OptionListKind::BoneMaterial => "bone_material",
            OptionListKind::Membrane => "membrane",
            OptionListKind::TentingScrew => "tenting_screw",
            OptionListKind::FixingScrew => "fixing_screw",
            OptionListKind::SutureMaterial => "suture_material",
            OptionListKind::PeriodontalDressing => "periodontal_dressing",
            OptionListKind::Filling => "filling",
            OptionListKind::Complex => "complex",
            OptionListKind::FillingForTreatment => "filling_for_treatment",
            OptionListKind::VisitCharge => "visit_charge",
        }
    }
}

impl fmt::Display for OptionListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionListKind {
    type Err = String;

    /// Accepts the snake_case name or its kebab-case spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().replace('-', "_");
        OptionListKind::ALL
            .into_iter()
            .find(|k| k.as_str() == normalised)
            .ok_or_else(|| format!("unknown option list: '{s}'"))
    }
}

/// One selectable entry: a stable key, display text and an optional price contribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogOption {
    pub value: NonEmptyText,
    pub label: NonEmptyText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
}

/// An ordered option list keyed by option `value`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OptionList {
    kind: OptionListKind,
    options: Vec<CatalogOption>,
}

impl OptionList {
    pub(crate) fn new(kind: OptionListKind, options: Vec<CatalogOption>) -> Self {
        Self { kind, options }
    }

    pub fn kind(&self) -> OptionListKind {
        self.kind
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogOption> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn find(&self, value: &str) -> Option<&CatalogOption> {
        self.options.iter().find(|o| o.value == value)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.find(value).is_some()
    }

    /// Price contribution of `value`: zero when the entry is absent or carries no price.
    pub fn price_of(&self, value: &str) -> Money {
        match self.find(value) {
            Some(CatalogOption {
                price: Some(price), ..
            }) => *price,
            Some(_) => Money::ZERO,
            None => {
                tracing::debug!("no `{}` option with value '{}'", self.kind, value);
                Money::ZERO
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(value: &str, price: Option<u64>) -> CatalogOption {
        CatalogOption {
            value: NonEmptyText::new(value).unwrap(),
            label: NonEmptyText::new(value.to_uppercase()).unwrap(),
            price: price.map(Money::from_whole),
        }
    }

    #[test]
    fn test_price_of_missing_entry_or_price_is_zero() {
        let list = OptionList::new(
            OptionListKind::Complex,
            vec![option("none", None), option("retreatment", Some(2500))],
        );
        assert_eq!(list.price_of("retreatment"), Money::from_whole(2500));
        assert_eq!(list.price_of("none"), Money::ZERO);
        assert_eq!(list.price_of("unknown"), Money::ZERO);
    }

    #[test]
    fn test_kind_parses_snake_and_kebab_case() {
        assert_eq!(
            "visit_charge".parse::<OptionListKind>().unwrap(),
            OptionListKind::VisitCharge
        );
        assert_eq!(
            "filling-for-treatment".parse::<OptionListKind>().unwrap(),
            OptionListKind::FillingForTreatment
        );
        assert!("crowns".parse::<OptionListKind>().is_err());
    }

    #[test]
    fn test_all_is_indexed_by_discriminant() {
        for (index, kind) in OptionListKind::ALL.into_iter().enumerate() {
            assert_eq!(kind as usize, index);
        }
    }
}
