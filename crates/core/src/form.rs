//! Procedure order forms.
//!
//! A form is opened for one procedure and holds a draft of its selections. Every edit
//! changes exactly one field. Submitting prices the draft, assigns the next order code from
//! the store and appends a `Pending` order, all in one synchronous step.
//!
//! The form uses a type-state parameter: only a `ProcedureForm<Editing>` can be edited or
//! submitted, and `submit` consumes it. A submit that is blocked by an empty required field
//! hands the untouched editing form back inside [`SubmitBlocked`]. Cancelling is simply
//! dropping the form.

use crate::order::{Order, OrderDetails, OrderStatus, ProcedureDetails};
use crate::pricing::{PriceCalculator, Pricing};
use crate::procedure::Procedure;
use crate::store::OrderStore;
use crate::{OrderError, OrderResult};
use dental_catalog::OptionListKind;
use dental_types::NonEmptyText;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// FIELDS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
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
    AnestheticUsed,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self.option_list() {
            Some(kind) => kind.as_str(),
            None => "anesthetic_used",
        }
    }

    /// Catalog list the field draws its choices from. `None` for the anesthetic checkbox.
    pub fn option_list(self) -> Option<OptionListKind> {
        let kind = match self {
            FormField::BoneType => OptionListKind::BoneType,
            FormField::BoneMaterial => OptionListKind::BoneMaterial,
            FormField::Membrane => OptionListKind::Membrane,
            FormField::TentingScrew => OptionListKind::TentingScrew,
            FormField::FixingScrew => OptionListKind::FixingScrew,
            FormField::SutureMaterial => OptionListKind::SutureMaterial,
            FormField::PeriodontalDressing => OptionListKind::PeriodontalDressing,
            FormField::Filling => OptionListKind::Filling,
            FormField::Complex => OptionListKind::Complex,
            FormField::FillingForTreatment => OptionListKind::FillingForTreatment,
            FormField::VisitCharge => OptionListKind::VisitCharge,
            FormField::AnestheticUsed => return None,
        };
        Some(kind)
    }

    /// Fields on the form for `procedure`, in display order.
    pub fn for_procedure(procedure: Procedure) -> &'static [FormField] {
        match procedure {
            Procedure::BoneGraft => &[
                FormField::BoneType,
                FormField::BoneMaterial,
                FormField::Membrane,
                FormField::TentingScrew,
                FormField::FixingScrew,
                FormField::SutureMaterial,
                FormField::AnestheticUsed,
            ],
            Procedure::GumSurgery => &[
                FormField::BoneMaterial,
                FormField::Membrane,
                FormField::TentingScrew,
                FormField::FixingScrew,
                FormField::PeriodontalDressing,
                FormField::SutureMaterial,
                FormField::AnestheticUsed,
            ],
            Procedure::RootCanal => &[
                FormField::Filling,
                FormField::Complex,
                FormField::FillingForTreatment,
                FormField::VisitCharge,
                FormField::AnestheticUsed,
            ],
        }
    }

    /// Fields that must be filled before the form for `procedure` can be submitted.
    pub fn required_for(procedure: Procedure) -> &'static [FormField] {
        match procedure {
            Procedure::RootCanal => &[FormField::VisitCharge],
            Procedure::BoneGraft | Procedure::GumSurgery => &[],
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = OrderError;

    fn from_str(s: &str) -> OrderResult<Self> {
        let normalised = s.trim().replace('-', "_");
        if normalised == "anesthetic_used" || normalised == "anesthetic" {
            return Ok(FormField::AnestheticUsed);
        }
        let kind: OptionListKind = normalised
            .parse()
            .map_err(|_| OrderError::InvalidInput(format!("unknown form field: '{s}'")))?;
        Ok(match kind {
            OptionListKind::BoneType => FormField::BoneType,
            OptionListKind::BoneMaterial => FormField::BoneMaterial,
            OptionListKind::Membrane => FormField::Membrane,
            OptionListKind::TentingScrew => FormField::TentingScrew,
            OptionListKind::FixingScrew => FormField::FixingScrew,
            OptionListKind::SutureMaterial => FormField::SutureMaterial,
            OptionListKind::PeriodontalDressing => FormField::PeriodontalDressing,
            OptionListKind::Filling => FormField::Filling,
            OptionListKind::Complex => FormField::Complex,
            OptionListKind::FillingForTreatment => FormField::FillingForTreatment,
            OptionListKind::VisitCharge => FormField::VisitCharge,
        })
    }
}

/// A new value for one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// Single-choice dropdown; `None` clears it.
    Single(Option<NonEmptyText>),
    /// Multi-choice dropdown.
    Multi(Vec<NonEmptyText>),
    /// Checkbox.
    Flag(bool),
}

/// A borrowed view of one field's current value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldValueRef<'a> {
    Single(Option<&'a NonEmptyText>),
    Multi(&'a [NonEmptyText]),
    Flag(bool),
}

impl FieldValueRef<'_> {
    /// Whether the field counts as empty for required-field checks. A checkbox never is.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValueRef::Single(v) => v.is_none(),
            FieldValueRef::Multi(v) => v.is_empty(),
            FieldValueRef::Flag(_) => false,
        }
    }
}

enum Slot<'a> {
    Single(&'a mut Option<NonEmptyText>),
    Multi(&'a mut Vec<NonEmptyText>),
    Flag(&'a mut bool),
}

impl ProcedureDetails {
    fn slot(&mut self, field: FormField) -> Option<Slot<'_>> {
        use FormField as F;
        use ProcedureDetails as D;

        let slot = match (self, field) {
            (D::BoneGraft(d), F::BoneType) => Slot::Single(&mut d.bone_type),
            (D::BoneGraft(d), F::BoneMaterial) => Slot::Single(&mut d.bone_material),
            (D::BoneGraft(d), F::Membrane) => Slot::Single(&mut d.membrane),
            (D::BoneGraft(d), F::TentingScrew) => Slot::Single(&mut d.tenting_screw),
            (D::BoneGraft(d), F::FixingScrew) => Slot::Multi(&mut d.fixing_screw),
            (D::BoneGraft(d), F::SutureMaterial) => Slot::Single(&mut d.suture_material),
            (D::BoneGraft(d), F::AnestheticUsed) => Slot::Flag(&mut d.anesthetic_used),

            (D::GumSurgery(d), F::BoneMaterial) => Slot::Single(&mut d.bone_material),
            (D::GumSurgery(d), F::Membrane) => Slot::Single(&mut d.membrane),
            (D::GumSurgery(d), F::TentingScrew) => Slot::Single(&mut d.tenting_screw),
            (D::GumSurgery(d), F::FixingScrew) => Slot::Multi(&mut d.fixing_screw),
            (D::GumSurgery(d), F::PeriodontalDressing) => {
                Slot::Single(&mut d.periodontal_dressing)
            }
            (D::GumSurgery(d), F::SutureMaterial) => Slot::Single(&mut d.suture_material),
            (D::GumSurgery(d), F::AnestheticUsed) => Slot::Flag(&mut d.anesthetic_used),

            (D::RootCanal(d), F::Filling) => Slot::Single(&mut d.filling),
            (D::RootCanal(d), F::Complex) => Slot::Single(&mut d.complex),
            (D::RootCanal(d), F::FillingForTreatment) => {
                Slot::Single(&mut d.filling_for_treatment)
            }
            (D::RootCanal(d), F::VisitCharge) => Slot::Multi(&mut d.visit_charge),
            (D::RootCanal(d), F::AnestheticUsed) => Slot::Flag(&mut d.anesthetic_used),

            _ => return None,
        };
        Some(slot)
    }

    /// Replace one field of the draft.
    ///
    /// # Errors
    ///
    /// - [`OrderError::FieldNotOnForm`] if this procedure has no such field
    /// - [`OrderError::FieldValueMismatch`] if `value` is the wrong kind for the field
    ///
    /// The draft is unchanged on error.
    pub fn set(&mut self, field: FormField, value: FieldValue) -> OrderResult<()> {
        let procedure = self.procedure();
        let slot = self
            .slot(field)
            .ok_or(OrderError::FieldNotOnForm { field, procedure })?;

        match (slot, value) {
            (Slot::Single(target), FieldValue::Single(v)) => *target = v,
            (Slot::Multi(target), FieldValue::Multi(v)) => *target = v,
            (Slot::Flag(target), FieldValue::Flag(v)) => *target = v,
            _ => return Err(OrderError::FieldValueMismatch(field)),
        }
        Ok(())
    }

    /// Current value of one field, or `None` if this procedure has no such field.
    pub fn value_of(&self, field: FormField) -> Option<FieldValueRef<'_>> {
        use FieldValueRef as V;
        use FormField as F;
        use ProcedureDetails as D;

        let value = match (self, field) {
            (D::BoneGraft(d), F::BoneType) => V::Single(d.bone_type.as_ref()),
            (D::BoneGraft(d), F::BoneMaterial) => V::Single(d.bone_material.as_ref()),
            (D::BoneGraft(d), F::Membrane) => V::Single(d.membrane.as_ref()),
            (D::BoneGraft(d), F::TentingScrew) => V::Single(d.tenting_screw.as_ref()),
            (D::BoneGraft(d), F::FixingScrew) => V::Multi(&d.fixing_screw),
            (D::BoneGraft(d), F::SutureMaterial) => V::Single(d.suture_material.as_ref()),
            (D::BoneGraft(d), F::AnestheticUsed) => V::Flag(d.anesthetic_used),

            (D::GumSurgery(d), F::BoneMaterial) => V::Single(d.bone_material.as_ref()),
            (D::GumSurgery(d), F::Membrane) => V::Single(d.membrane.as_ref()),
            (D::GumSurgery(d), F::TentingScrew) => V::Single(d.tenting_screw.as_ref()),
            (D::GumSurgery(d), F::FixingScrew) => V::Multi(&d.fixing_screw),
            (D::GumSurgery(d), F::PeriodontalDressing) => {
                V::Single(d.periodontal_dressing.as_ref())
            }
            (D::GumSurgery(d), F::SutureMaterial) => V::Single(d.suture_material.as_ref()),
            (D::GumSurgery(d), F::AnestheticUsed) => V::Flag(d.anesthetic_used),

            (D::RootCanal(d), F::Filling) => V::Single(d.filling.as_ref()),
            (D::RootCanal(d), F::Complex) => V::Single(d.complex.as_ref()),
            (D::RootCanal(d), F::FillingForTreatment) => {
                V::Single(d.filling_for_treatment.as_ref())
            }
            (D::RootCanal(d), F::VisitCharge) => V::Multi(&d.visit_charge),
            (D::RootCanal(d), F::AnestheticUsed) => V::Flag(d.anesthetic_used),

            _ => return None,
        };
        Some(value)
    }

    fn is_blank(&self, field: FormField) -> bool {
        match self.value_of(field) {
            Some(value) => value.is_blank(),
            None => true,
        }
    }
}

// ============================================================================
// TYPE-STATE MARKERS
// ============================================================================

/// Marker type: the form is open and its draft may change.
#[derive(Clone, Copy, Debug)]
pub struct Editing;

/// Marker type: the form was submitted and produced an order.
#[derive(Clone, Debug)]
pub struct Submitted {
    order: Order,
}

// ============================================================================
// FORM
// ============================================================================

#[derive(Clone, Debug)]
pub struct ProcedureForm<S> {
    sub_category: String,
    order_name: String,
    draft: ProcedureDetails,
    state: S,
}

/// A submit that could not proceed. Holds the form so editing can continue.
#[derive(Debug, thiserror::Error)]
#[error("submit blocked: {reason}")]
pub struct SubmitBlocked {
    pub reason: OrderError,
    form: Box<ProcedureForm<Editing>>,
}

impl SubmitBlocked {
    /// The form, unchanged, still in the editing state.
    pub fn into_form(self) -> ProcedureForm<Editing> {
        *self.form
    }
}

impl<S> ProcedureForm<S> {
    pub fn procedure(&self) -> Procedure {
        self.draft.procedure()
    }

    /// Current selections.
    pub fn draft(&self) -> &ProcedureDetails {
        &self.draft
    }

    pub fn sub_category(&self) -> &str {
        &self.sub_category
    }

    pub fn order_name(&self) -> &str {
        &self.order_name
    }
}

impl ProcedureForm<Editing> {
    /// Opens an empty form for `procedure`.
    ///
    /// `sub_category` and `order_name` record what was picked to open the form and are
    /// carried into the order details as-is.
    pub fn open(
        procedure: Procedure,
        sub_category: impl Into<String>,
        order_name: impl Into<String>,
    ) -> Self {
        Self {
            sub_category: sub_category.into(),
            order_name: order_name.into(),
            draft: ProcedureDetails::empty(procedure),
            state: Editing,
        }
    }

    /// Edits one field. See [`ProcedureDetails::set`].
    pub fn set(&mut self, field: FormField, value: FieldValue) -> OrderResult<()> {
        self.draft.set(field, value)
    }

    /// Selects a single-choice value, or clears it when `value` is blank.
    pub fn select(&mut self, field: FormField, value: &str) -> OrderResult<()> {
        self.set(field, FieldValue::Single(NonEmptyText::new(value).ok()))
    }

    /// Replaces a multi-choice selection. Blank entries are dropped.
    pub fn select_many<I, T>(&mut self, field: FormField, values: I) -> OrderResult<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let values = values
            .into_iter()
            .filter_map(|v| NonEmptyText::new(v).ok())
            .collect();
        self.set(field, FieldValue::Multi(values))
    }

    pub fn set_anesthetic_used(&mut self, used: bool) -> OrderResult<()> {
        self.set(FormField::AnestheticUsed, FieldValue::Flag(used))
    }

    /// Required fields that are still empty.
    pub fn missing_required(&self) -> Vec<FormField> {
        FormField::required_for(self.procedure())
            .iter()
            .copied()
            .filter(|field| self.draft.is_blank(*field))
            .collect()
    }

    /// Whether the submit action is enabled.
    pub fn can_submit(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Prices the draft, assigns the next code from `store` and appends a `Pending` order.
    ///
    /// **This method consumes `self`.** On success the returned form is in the
    /// [`Submitted`] state and carries a copy of the recorded order.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitBlocked`] with [`OrderError::MissingRequired`] when a required field
    /// is empty. Nothing is appended in that case.
    pub fn submit(
        self,
        store: &mut OrderStore,
        pricing: &Pricing<'_>,
    ) -> Result<ProcedureForm<Submitted>, SubmitBlocked> {
        if let Some(field) = self.missing_required().into_iter().next() {
            tracing::debug!("{} submit blocked: `{}` is empty", self.procedure(), field);
            return Err(SubmitBlocked {
                reason: OrderError::MissingRequired(field),
                form: Box::new(self),
            });
        }

        let procedure = self.procedure();
        let net_price = self.draft.compute_price(pricing);
        let care_provider = pricing.tariffs.for_procedure(procedure).care_provider.clone();
        let details = OrderDetails {
            sub_category: self.sub_category.clone(),
            order_name: self.order_name.clone(),
            procedure: self.draft.clone(),
        };

        let order = store
            .append_with_next_code(procedure.key(), |code| {
                Order::new(code, net_price, OrderStatus::Pending, care_provider, details)
            })
            .clone();

        Ok(ProcedureForm {
            sub_category: self.sub_category,
            order_name: self.order_name,
            draft: self.draft,
            state: Submitted { order },
        })
    }
}

impl ProcedureForm<Submitted> {
    /// The order that was recorded.
    pub fn order(&self) -> &Order {
        &self.state.order
    }

    pub fn into_order(self) -> Order {
        self.state.order
    }
}
