//! Session scripts.
//!
//! A script is a YAML document listing orders to submit, in order, within one session,
//! followed by the summary filters to show afterwards:
//!
//! ```yaml
//! orders:
//!   - sub_category: boneGraft
//!     procedure: boneGraft
//!     fields:
//!       bone_type: boneType1
//!       fixing_screw: [fixingScrew1, fixingScrew2]
//!       anesthetic_used: true
//! summary:
//!   status: Pending
//!   provider: all
//! ```

use crate::edit;
use anyhow::{anyhow, Context};
use dental_core::{
    FieldValue, FieldValueRef, FormField, Order, OrderSession, ProviderFilter, StatusFilter,
};
use dental_types::NonEmptyText;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionScript {
    #[serde(default)]
    pub orders: Vec<ScriptOrder>,
    #[serde(default)]
    pub summary: ScriptSummary,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptOrder {
    /// Defaults to the procedure name itself.
    pub sub_category: Option<String>,
    pub procedure: String,
    #[serde(default)]
    pub fields: BTreeMap<String, ScriptValue>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ScriptValue {
    Flag(bool),
    Many(Vec<String>),
    One(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptSummary {
    pub status: Option<String>,
    pub provider: Option<String>,
}

impl SessionScript {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session script {}", path.display()))?;
        Self::parse(&text)
    }

    pub fn parse(yaml_text: &str) -> anyhow::Result<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        serde_path_to_error::deserialize(deserializer).map_err(|err| {
            anyhow!(
                "session script schema mismatch at {}: {}",
                err.path(),
                err.inner()
            )
        })
    }

    /// Submits every scripted order against `session`, stopping at the first failure.
    pub fn replay(&self, session: &mut OrderSession) -> anyhow::Result<Vec<Order>> {
        let mut submitted = Vec::with_capacity(self.orders.len());
        for (index, step) in self.orders.iter().enumerate() {
            let order = step
                .submit(session)
                .with_context(|| format!("scripted order #{} ({})", index + 1, step.procedure))?;
            submitted.push(order);
        }
        Ok(submitted)
    }
}

impl ScriptOrder {
    fn submit(&self, session: &mut OrderSession) -> anyhow::Result<Order> {
        let category = self.sub_category.as_deref().unwrap_or(&self.procedure);
        let mut form = session.open_form(category, &self.procedure)?;

        for (name, value) in &self.fields {
            let field: FormField = name.parse()?;
            let value = coerce(form.draft().value_of(field), value.clone());
            edit::apply(&mut form, session.config().catalog(), field, value)?;
        }

        Ok(session.submit(form)?)
    }
}

impl ScriptSummary {
    pub fn filters(&self) -> anyhow::Result<(StatusFilter, ProviderFilter)> {
        let status = self.status.as_deref().unwrap_or_default().parse()?;
        let provider = self.provider.as_deref().unwrap_or_default().parse()?;
        Ok((status, provider))
    }
}

/// Shapes a scripted value to the kind the field already holds.
///
/// A lone string for a multi-choice field becomes a one-item selection. Fields the form
/// does not have are passed through as written so the form reports them.
fn coerce(current: Option<FieldValueRef<'_>>, value: ScriptValue) -> FieldValue {
    match (current, value) {
        (Some(FieldValueRef::Multi(_)), ScriptValue::One(v)) => {
            FieldValue::Multi(NonEmptyText::new(v).into_iter().collect())
        }
        (_, ScriptValue::Flag(v)) => FieldValue::Flag(v),
        (_, ScriptValue::Many(values)) => FieldValue::Multi(
            values
                .into_iter()
                .filter_map(|v| NonEmptyText::new(v).ok())
                .collect(),
        ),
        (_, ScriptValue::One(v)) => FieldValue::Single(NonEmptyText::new(v).ok()),
    }
}
