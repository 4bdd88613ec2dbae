//! Static reference data for dental order entry.
//!
//! This crate owns the **option catalog**: every enumerated choice list a procedure form
//! can draw from (materials, screws, sutures, visit charges), plus the sub-category to
//! procedure selection table used to pick which form to open.
//!
//! The catalog is loaded once at startup, either from the built-in YAML document embedded
//! in this crate or from an override file, and is never mutated afterwards.
//!
//! Responsibilities:
//! - Define the strict wire model for catalog YAML
//! - Translate the wire model into validated domain types
//! - Provide read-only lookups keyed by option `value`

mod options;
mod selection;

pub use options::{CatalogOption, OptionList, OptionListKind};
pub use selection::{ProcedureChoice, SubCategory, ALL_CATEGORIES};

use dental_types::{Money, NonEmptyText};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// The catalog document shipped with the crate.
pub const BUILTIN_CATALOG_YAML: &str = include_str!("../data/catalog.yaml");

/// Errors returned while loading or validating a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog schema mismatch at {path}: {message}")]
    Schema { path: String, message: String },

    #[error("catalog is missing option list `{0}`")]
    MissingList(OptionListKind),

    #[error("duplicate option value `{value}` in list `{kind}`")]
    DuplicateOption { kind: OptionListKind, value: String },

    #[error("duplicate sub-category `{0}`")]
    DuplicateSubCategory(String),

    #[error("failed to read catalog file: {0}")]
    FileRead(std::io::Error),
}

/// Type alias for Results that can fail with a [`CatalogError`].
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Loaded, validated option catalog.
///
/// Every [`OptionListKind`] is guaranteed to have a list once a `Catalog` exists.
#[derive(Clone, Debug)]
pub struct Catalog {
    sub_categories: Vec<SubCategory>,
    // Indexed by `OptionListKind as usize`, in `OptionListKind::ALL` order.
    lists: Vec<OptionList>,
}

impl Catalog {
    /// Parse the built-in catalog document.
    pub fn builtin() -> CatalogResult<Self> {
        Self::parse(BUILTIN_CATALOG_YAML)
    }

    /// Load a catalog from a YAML file on disk.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let text = std::fs::read_to_string(path).map_err(CatalogError::FileRead)?;
        let catalog = Self::parse(&text)?;
        tracing::info!("loaded option catalog from {}", path.display());
        Ok(catalog)
    }

    /// Parse a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if:
    /// - the YAML does not match the wire schema (unknown keys, wrong types, empty text),
    /// - an option list is missing,
    /// - a list contains the same `value` twice,
    /// - two sub-categories share a `value`.
    pub fn parse(yaml_text: &str) -> CatalogResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        let wire: CatalogWire = serde_path_to_error::deserialize(deserializer).map_err(|err| {
            let path = err.path().to_string();
            let path = if path.is_empty() || path == "." {
                "<root>".to_string()
            } else {
                path
            };
            CatalogError::Schema {
                path,
                message: err.into_inner().to_string(),
            }
        })?;

        wire_to_domain(wire)
    }

    /// The option list for `kind`.
    pub fn list(&self, kind: OptionListKind) -> &OptionList {
        &self.lists[kind as usize]
    }

    pub fn lists(&self) -> impl Iterator<Item = &OptionList> {
        self.lists.iter()
    }

    pub fn sub_categories(&self) -> &[SubCategory] {
        &self.sub_categories
    }

    pub fn sub_category(&self, value: &str) -> Option<&SubCategory> {
        self.sub_categories.iter().find(|c| c.value == value)
    }

    /// Procedures selectable under `category`.
    ///
    /// [`ALL_CATEGORIES`] yields every other category's procedures, de-duplicated by value in
    /// declaration order. An unknown category yields nothing.
    pub fn procedures_for(&self, category: &str) -> Vec<&ProcedureChoice> {
        if category == ALL_CATEGORIES {
            let mut seen = HashSet::new();
            return self
                .sub_categories
                .iter()
                .filter(|c| c.value != ALL_CATEGORIES)
                .flat_map(|c| c.procedures.iter())
                .filter(|p| seen.insert(p.value.as_str()))
                .collect();
        }

        self.sub_category(category)
            .map(|c| c.procedures.iter().collect())
            .unwrap_or_default()
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogWire {
    sub_categories: Vec<SubCategoryWire>,
    option_lists: BTreeMap<OptionListKind, Vec<OptionWire>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SubCategoryWire {
    value: NonEmptyText,
    label: NonEmptyText,
    procedures: Vec<OptionWire>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OptionWire {
    value: NonEmptyText,
    label: NonEmptyText,
    #[serde(default)]
    price: Option<Money>,
}

fn wire_to_domain(mut wire: CatalogWire) -> CatalogResult<Catalog> {
    let mut category_values = HashSet::new();
    let mut sub_categories = Vec::with_capacity(wire.sub_categories.len());
    for category in wire.sub_categories {
        if !category_values.insert(category.value.clone()) {
            return Err(CatalogError::DuplicateSubCategory(
                category.value.into_inner(),
            ));
        }
        sub_categories.push(SubCategory {
            value: category.value,
            label: category.label,
            procedures: category
                .procedures
                .into_iter()
                .map(|p| ProcedureChoice {
                    value: p.value,
                    label: p.label,
                })
                .collect(),
        });
    }

    let mut lists = Vec::with_capacity(OptionListKind::ALL.len());
    for kind in OptionListKind::ALL {
        let entries = wire
            .option_lists
            .remove(&kind)
            .ok_or(CatalogError::MissingList(kind))?;

        let mut values = HashSet::new();
        let mut options = Vec::with_capacity(entries.len());
        for entry in entries {
            if !values.insert(entry.value.clone()) {
                return Err(CatalogError::DuplicateOption {
                    kind,
                    value: entry.value.into_inner(),
                });
            }
            options.push(CatalogOption {
                value: entry.value,
                label: entry.label,
                price: entry.price,
            });
        }
        lists.push(OptionList::new(kind, options));
    }

    Ok(Catalog {
        sub_categories,
        lists,
    })
}
