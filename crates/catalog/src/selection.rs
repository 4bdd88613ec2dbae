//! Sub-category to procedure selection table.

use dental_types::NonEmptyText;
use serde::Serialize;

/// Sub-category value that selects procedures from every other category.
pub const ALL_CATEGORIES: &str = "all";

/// A procedure offered under a sub-category: its internal key and display label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProcedureChoice {
    pub value: NonEmptyText,
    pub label: NonEmptyText,
}

/// A selectable order category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubCategory {
    pub value: NonEmptyText,
    pub label: NonEmptyText,
    pub procedures: Vec<ProcedureChoice>,
}
