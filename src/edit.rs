//! Applying field edits to an open form.

use dental_catalog::Catalog;
use dental_core::{Editing, FieldValue, FormField, OrderResult, ProcedureForm};
use dental_types::NonEmptyText;

/// Sets one field on `form`, warning about values the catalog does not list.
///
/// Unlisted values are still recorded; they only contribute nothing to the price.
pub fn apply(
    form: &mut ProcedureForm<Editing>,
    catalog: &Catalog,
    field: FormField,
    value: FieldValue,
) -> OrderResult<()> {
    if let Some(kind) = field.option_list() {
        let list = catalog.list(kind);
        for selected in selected(&value) {
            if !list.contains(selected.as_str()) {
                tracing::warn!("'{}' is not a listed {} option", selected, kind);
            }
        }
    }
    form.set(field, value)
}

fn selected(value: &FieldValue) -> Vec<&NonEmptyText> {
    match value {
        FieldValue::Single(Some(v)) => vec![v],
        FieldValue::Multi(values) => values.iter().collect(),
        FieldValue::Single(None) | FieldValue::Flag(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dental_core::{Procedure, ProcedureDetails};

    #[test]
    fn test_unlisted_value_is_still_recorded() {
        let catalog = Catalog::builtin().expect("built-in catalog should parse");
        let mut form = ProcedureForm::open(Procedure::BoneGraft, "boneGraft", "boneGraft");

        apply(
            &mut form,
            &catalog,
            FormField::BoneType,
            FieldValue::Single(NonEmptyText::new("notInCatalog").ok()),
        )
        .expect("edit should apply");

        match form.draft() {
            ProcedureDetails::BoneGraft(d) => {
                assert_eq!(d.bone_type.as_ref().map(|v| v.as_str()), Some("notInCatalog"))
            }
            other => panic!("unexpected draft {other:?}"),
        }
    }

    #[test]
    fn test_field_errors_pass_through() {
        let catalog = Catalog::builtin().expect("built-in catalog should parse");
        let mut form = ProcedureForm::open(Procedure::GumSurgery, "gumSurgery", "gumSurgery");
        assert!(apply(&mut form, &catalog, FormField::VisitCharge, FieldValue::Multi(vec![])).is_err());
    }
}
