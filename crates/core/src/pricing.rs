//! Price calculation and tariffs.
//!
//! Bone graft and gum surgery are priced from a base amount plus a per-unit charge for each
//! fixing screw. Root canal is priced from the catalog: every selected option contributes its
//! listed price. All procedures add a flat surcharge when anesthetic is used.
//!
//! Blank selections contribute nothing. Selections with no catalog entry, or whose entry has
//! no price, also contribute nothing.

use crate::constants::{
    ANESTHETIC_SURCHARGE, BONE_GRAFT_BASE_PRICE, BONE_GRAFT_CARE_PROVIDER,
    BONE_GRAFT_PER_FIXING_SCREW, GUM_SURGERY_BASE_PRICE, GUM_SURGERY_CARE_PROVIDER,
    GUM_SURGERY_PER_FIXING_SCREW, ROOT_CANAL_BASE_PRICE, ROOT_CANAL_CARE_PROVIDER,
};
use crate::error::parse_yaml;
use crate::order::{BoneGraftDetails, GumSurgeryDetails, ProcedureDetails, RootCanalDetails};
use crate::procedure::Procedure;
use crate::{OrderError, OrderResult};
use dental_catalog::{Catalog, OptionListKind};
use dental_types::{Money, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pricing constants and default care provider for one procedure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Tariff {
    pub base: Money,
    pub per_fixing_screw: Money,
    pub anesthetic_surcharge: Money,
    pub care_provider: NonEmptyText,
}

impl Tariff {
    fn builtin(base: u64, per_fixing_screw: u64, care_provider: &'static str) -> Self {
        Self {
            base: Money::from_whole(base),
            per_fixing_screw: Money::from_whole(per_fixing_screw),
            anesthetic_surcharge: Money::from_whole(ANESTHETIC_SURCHARGE),
            care_provider: NonEmptyText::from_static(care_provider),
        }
    }

    fn surcharge(&self, anesthetic_used: bool) -> Money {
        if anesthetic_used {
            self.anesthetic_surcharge
        } else {
            Money::ZERO
        }
    }
}

/// Tariffs for every procedure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Tariffs {
    pub bone_graft: Tariff,
    pub gum_surgery: Tariff,
    pub root_canal: Tariff,
}

impl Default for Tariffs {
    fn default() -> Self {
        Self {
            bone_graft: Tariff::builtin(
                BONE_GRAFT_BASE_PRICE,
                BONE_GRAFT_PER_FIXING_SCREW,
                BONE_GRAFT_CARE_PROVIDER,
            ),
            gum_surgery: Tariff::builtin(
                GUM_SURGERY_BASE_PRICE,
                GUM_SURGERY_PER_FIXING_SCREW,
                GUM_SURGERY_CARE_PROVIDER,
            ),
            root_canal: Tariff::builtin(ROOT_CANAL_BASE_PRICE, 0, ROOT_CANAL_CARE_PROVIDER),
        }
    }
}

impl Tariffs {
    pub fn for_procedure(&self, procedure: Procedure) -> &Tariff {
        match procedure {
            Procedure::BoneGraft => &self.bone_graft,
            Procedure::GumSurgery => &self.gum_surgery,
            Procedure::RootCanal => &self.root_canal,
        }
    }

    /// Parse a tariff override document.
    ///
    /// Every section and every field is optional; anything left out keeps its built-in
    /// default. Unknown keys are rejected.
    pub fn parse(yaml_text: &str) -> OrderResult<Self> {
        let wire: TariffsWire = parse_yaml("tariff", yaml_text)?;
        let mut tariffs = Tariffs::default();
        for (tariff, overrides) in [
            (&mut tariffs.bone_graft, wire.bone_graft),
            (&mut tariffs.gum_surgery, wire.gum_surgery),
            (&mut tariffs.root_canal, wire.root_canal),
        ] {
            if let Some(overrides) = overrides {
                overrides.apply(tariff);
            }
        }
        Ok(tariffs)
    }

    pub fn load(path: &Path) -> OrderResult<Self> {
        let text = std::fs::read_to_string(path).map_err(OrderError::FileRead)?;
        let tariffs = Self::parse(&text)?;
        tracing::info!("loaded tariffs from {}", path.display());
        Ok(tariffs)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TariffsWire {
    bone_graft: Option<TariffWire>,
    gum_surgery: Option<TariffWire>,
    root_canal: Option<TariffWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TariffWire {
    base: Option<Money>,
    per_fixing_screw: Option<Money>,
    anesthetic_surcharge: Option<Money>,
    care_provider: Option<NonEmptyText>,
}

impl TariffWire {
    fn apply(self, tariff: &mut Tariff) {
        if let Some(base) = self.base {
            tariff.base = base;
        }
        if let Some(per_fixing_screw) = self.per_fixing_screw {
            tariff.per_fixing_screw = per_fixing_screw;
        }
        if let Some(surcharge) = self.anesthetic_surcharge {
            tariff.anesthetic_surcharge = surcharge;
        }
        if let Some(provider) = self.care_provider {
            tariff.care_provider = provider;
        }
    }
}

// ============================================================================
// Calculators
// ============================================================================

/// Everything a price calculation may consult.
#[derive(Clone, Copy, Debug)]
pub struct Pricing<'a> {
    pub catalog: &'a Catalog,
    pub tariffs: &'a Tariffs,
}

/// Computes the net price of a filled-in procedure form.
pub trait PriceCalculator {
    fn compute_price(&self, pricing: &Pricing<'_>) -> Money;
}

/// Base amount, plus a charge per fixing screw, plus the anesthetic surcharge.
fn screw_priced(tariff: &Tariff, fixing_screws: usize, anesthetic_used: bool) -> Money {
    tariff.base + tariff.per_fixing_screw * fixing_screws as u64 + tariff.surcharge(anesthetic_used)
}

impl PriceCalculator for BoneGraftDetails {
    fn compute_price(&self, pricing: &Pricing<'_>) -> Money {
        screw_priced(
            &pricing.tariffs.bone_graft,
            self.fixing_screw.len(),
            self.anesthetic_used,
        )
    }
}

impl PriceCalculator for GumSurgeryDetails {
    fn compute_price(&self, pricing: &Pricing<'_>) -> Money {
        screw_priced(
            &pricing.tariffs.gum_surgery,
            self.fixing_screw.len(),
            self.anesthetic_used,
        )
    }
}

impl PriceCalculator for RootCanalDetails {
    fn compute_price(&self, pricing: &Pricing<'_>) -> Money {
        let catalog = pricing.catalog;
        let tariff = &pricing.tariffs.root_canal;

        let single: Money = [
            (OptionListKind::Filling, &self.filling),
            (OptionListKind::Complex, &self.complex),
            (OptionListKind::FillingForTreatment, &self.filling_for_treatment),
        ]
        .into_iter()
        .filter_map(|(kind, selected)| {
            selected
                .as_ref()
                .map(|value| catalog.list(kind).price_of(value.as_str()))
        })
        .sum();

        let visits: Money = self
            .visit_charge
            .iter()
            .map(|value| {
                catalog
                    .list(OptionListKind::VisitCharge)
                    .price_of(value.as_str())
            })
            .sum();

        tariff.base + single + visits + tariff.surcharge(self.anesthetic_used)
    }
}

impl PriceCalculator for ProcedureDetails {
    fn compute_price(&self, pricing: &Pricing<'_>) -> Money {
        match self {
            ProcedureDetails::BoneGraft(d) => d.compute_price(pricing),
            ProcedureDetails::GumSurgery(d) => d.compute_price(pricing),
            ProcedureDetails::RootCanal(d) => d.compute_price(pricing),
        }
    }
}
