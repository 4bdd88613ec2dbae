//! One order-entry session.
//!
//! A session owns the order store for its lifetime and shares the startup configuration.
//! It is the entry point the presentation layer drives: pick a sub-category and procedure
//! to open a form, submit the form, then render the summary.

use crate::code::next_code;
use crate::config::CoreConfig;
use crate::form::{Editing, ProcedureForm, SubmitBlocked};
use crate::order::{Order, OrderCode};
use crate::procedure::Procedure;
use crate::seed::seed_orders;
use crate::store::OrderStore;
use crate::summary::{ProviderFilter, StatusFilter, SummaryView};
use crate::{OrderError, OrderResult};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct OrderSession {
    cfg: Arc<CoreConfig>,
    store: OrderStore,
}

impl OrderSession {
    /// Starts a session, seeding the store with the fixture orders when configured to.
    pub fn new(cfg: Arc<CoreConfig>) -> OrderResult<Self> {
        let store = if cfg.seed_orders() {
            OrderStore::with_orders(seed_orders()?)
        } else {
            OrderStore::new()
        };
        tracing::debug!("session started with {} orders", store.len());
        Ok(Self { cfg, store })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn store(&self) -> &OrderStore {
        &self.store
    }

    /// Opens the form for `procedure_name` as picked under `sub_category`.
    ///
    /// # Errors
    ///
    /// - [`OrderError::ProcedureNotInCategory`] if the catalog does not offer the procedure
    ///   under that sub-category (this includes unknown sub-categories)
    /// - [`OrderError::UnknownProcedure`] if the name is offered but has no form
    pub fn open_form(
        &self,
        sub_category: &str,
        procedure_name: &str,
    ) -> OrderResult<ProcedureForm<Editing>> {
        let offered = self
            .cfg
            .catalog()
            .procedures_for(sub_category)
            .into_iter()
            .any(|p| p.value == procedure_name || p.label == procedure_name);
        if !offered {
            return Err(OrderError::ProcedureNotInCategory {
                category: sub_category.to_string(),
                procedure: procedure_name.to_string(),
            });
        }

        let procedure: Procedure = procedure_name.parse()?;
        Ok(ProcedureForm::open(procedure, sub_category, procedure_name))
    }

    /// Submits `form` against this session's store.
    pub fn submit(&mut self, form: ProcedureForm<Editing>) -> Result<Order, SubmitBlocked> {
        let pricing = self.cfg.pricing();
        form.submit(&mut self.store, &pricing)
            .map(|submitted| submitted.into_order())
    }

    /// The code the next order for `procedure_name` would receive.
    pub fn next_code(&self, procedure_name: &str) -> OrderCode {
        next_code(procedure_name, self.store.all())
    }

    pub fn summary(&self, status: &StatusFilter, provider: &ProviderFilter) -> SummaryView<'_> {
        SummaryView::build(self.store.all(), status, provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormField;
    use crate::pricing::Tariffs;
    use crate::summary::Filter;
    use crate::OrderStatus;
    use dental_catalog::Catalog;
    use dental_types::{Money, NonEmptyText};

    fn session(seed: bool) -> OrderSession {
        let cfg = CoreConfig::new(
            Catalog::builtin().expect("built-in catalog should parse"),
            Tariffs::default(),
            seed,
        );
        OrderSession::new(Arc::new(cfg)).expect("session should start")
    }

    #[test]
    fn test_seeded_session_continues_fixture_codes() {
        let mut session = session(true);
        assert_eq!(session.store().len(), 4);
        assert_eq!(session.next_code("boneGraft").as_str(), "BG003");
        assert_eq!(session.next_code("ผ่าตัดเหงือก").as_str(), "GS003");
        assert_eq!(session.next_code("rootCanal").as_str(), "RT001");

        let mut form = session
            .open_form("boneGraft", "boneGraft")
            .expect("form should open");
        form.select_many(FormField::FixingScrew, ["fixingScrew1", "fixingScrew3"])
            .unwrap();
        form.set_anesthetic_used(true).unwrap();

        let order = session.submit(form).expect("submit should succeed");
        assert_eq!(order.code().as_str(), "BG003");
        assert_eq!(order.net_price(), Money::from_whole(3600));
        assert_eq!(session.store().len(), 5);
        assert_eq!(session.store().all()[4].code().as_str(), "BG003");
    }

    #[test]
    fn test_unseeded_session_starts_empty() {
        let session = session(false);
        assert!(session.store().is_empty());
        assert_eq!(session.next_code("gumSurgery").as_str(), "GS001");
    }

    #[test]
    fn test_open_form_accepts_label_under_all() {
        let session = session(false);
        let form = session
            .open_form("all", "ผ่าตัดเหงือก")
            .expect("label should open the gum surgery form");
        assert_eq!(form.procedure(), Procedure::GumSurgery);
        assert_eq!(form.sub_category(), "all");
        assert_eq!(form.order_name(), "ผ่าตัดเหงือก");
    }

    #[test]
    fn test_open_form_rejects_procedure_outside_category() {
        let session = session(false);
        let err = session
            .open_form("boneGraft", "gumSurgery")
            .expect_err("gum surgery is not under bone graft");
        assert!(matches!(err, OrderError::ProcedureNotInCategory { .. }));

        assert!(session.open_form("orthodontics", "boneGraft").is_err());
    }

    #[test]
    fn test_summary_after_submissions() {
        let mut session = session(true);
        for _ in 0..2 {
            let form = session.open_form("gumSurgery", "gumSurgery").unwrap();
            session.submit(form).expect("submit should succeed");
        }

        let pending = session.summary(&Filter::Only(OrderStatus::Pending), &Filter::All);
        let codes: Vec<&str> = pending.rows.iter().map(|o| o.code().as_str()).collect();
        assert_eq!(codes, vec!["GS003", "GS004"]);

        let lee = Filter::Only(NonEmptyText::new("Dr. Lee").unwrap());
        let view = session.summary(&Filter::All, &lee);
        assert_eq!(view.rows.len(), 3);

        let everything = session.summary(&Filter::All, &Filter::All);
        assert_eq!(everything.rows.len(), session.store().len());
    }
}
