use crate::catalog::Catalog;
use crate::engine::{Estimate, estimate};
use crate::error::CalculatorError;
use crate::selection::{Selection, Step};
use abect_domain::calculator::{AddOn, Platform, ProjectType, UrgencyTier};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Active,
    Submitted,
}

/// One visitor's pass through the calculator wizard.
///
/// All state changes go through the named transitions below; each one recomputes the
/// estimate before returning. After [`Calculator::mark_submitted`] every transition except
/// [`Calculator::reset`] is ignored.
#[derive(Debug, Clone)]
pub struct Calculator {
    catalog: Arc<Catalog>,
    selection: Selection,
    estimate: Estimate,
    status: Status,
}

impl Calculator {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let selection = Selection::new(catalog.default_pages());
        let estimate = estimate(&catalog, &selection);
        Self { catalog, selection, estimate, status: Status::Active }
    }

    // --- Transitions ---

    pub fn advance(&mut self) {
        self.apply("advance", |_, s| s.step = s.step.next());
    }

    pub fn retreat(&mut self) {
        self.apply("retreat", |_, s| s.step = s.step.prev());
    }

    /// Jumps to the step at `index`, clamped into range.
    pub fn go_to(&mut self, index: usize) {
        self.apply("go_to", |_, s| s.step = Step::from_index(index));
    }

    /// # Errors
    /// [`CalculatorError::UnknownProjectType`] if the slug is not in the catalog; the session
    /// is left untouched.
    pub fn set_project_type(&mut self, slug: &str) -> Result<(), CalculatorError> {
        let Some(project) = self.catalog.project_type(slug) else {
            return Err(CalculatorError::UnknownProjectType {
                message: slug.to_owned().into(),
                context: None,
            });
        };
        let supports_alternate = project.supports_alternate_platform;

        self.apply("set_project_type", |_, s| {
            s.project_type = Some(slug.to_owned());
            if !supports_alternate {
                s.platform = Some(Platform::Standard);
            }
        });
        Ok(())
    }

    /// Stores the platform unless the chosen project type only offers the standard one.
    pub fn set_platform(&mut self, platform: Platform) {
        self.apply("set_platform", |catalog, s| {
            let locked = s
                .project_type
                .as_deref()
                .and_then(|slug| catalog.project_type(slug))
                .is_some_and(|project| !project.supports_alternate_platform);
            if !locked {
                s.platform = Some(platform);
            }
        });
    }

    pub fn set_page_count(&mut self, pages: u32) {
        self.apply("set_page_count", |catalog, s| s.page_count = catalog.clamp_pages(pages));
    }

    /// Adds the add-on if absent, removes it otherwise.
    ///
    /// A re-added add-on goes to the end, so removing and adding one back changes the
    /// order of [`Selection::add_ons`] but not its membership.
    ///
    /// # Errors
    /// [`CalculatorError::UnknownAddOn`] if the slug is not in the catalog.
    pub fn toggle_add_on(&mut self, slug: &str) -> Result<(), CalculatorError> {
        if self.catalog.add_on(slug).is_none() {
            return Err(CalculatorError::UnknownAddOn {
                message: slug.to_owned().into(),
                context: None,
            });
        }

        self.apply("toggle_add_on", |_, s| {
            if s.has_add_on(slug) {
                s.add_ons.retain(|existing| existing != slug);
            } else {
                s.add_ons.push(slug.to_owned());
            }
        });
        Ok(())
    }

    /// # Errors
    /// [`CalculatorError::UnknownUrgency`] if the slug is not in the catalog.
    pub fn set_urgency(&mut self, slug: &str) -> Result<(), CalculatorError> {
        if self.catalog.urgency(slug).is_none() {
            return Err(CalculatorError::UnknownUrgency {
                message: slug.to_owned().into(),
                context: None,
            });
        }

        self.apply("set_urgency", |_, s| s.urgency = Some(slug.to_owned()));
        Ok(())
    }

    pub fn set_contact_fields(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        note: impl Into<String>,
    ) {
        let (name, value, note) = (name.into(), value.into(), note.into());
        self.apply("set_contact_fields", |_, s| {
            s.contact.name = name;
            s.contact.value = value;
            s.contact.note = note;
        });
    }

    pub fn set_contact_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.apply("set_contact_name", |_, s| s.contact.name = name);
    }

    pub fn set_contact_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.apply("set_contact_value", |_, s| s.contact.value = value);
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        let note = note.into();
        self.apply("set_note", |_, s| s.contact.note = note);
    }

    /// Back to a fresh session on the first step. Leaves the submitted state.
    pub fn reset(&mut self) {
        self.selection = Selection::new(self.catalog.default_pages());
        self.estimate = estimate(&self.catalog, &self.selection);
        self.status = Status::Active;
        debug!("Calculator session reset");
    }

    /// Terminal state: the selection was handed off and must not change any more.
    pub fn mark_submitted(&mut self) {
        self.status = Status::Submitted;
        debug!(price = self.estimate.price, "Calculator session submitted");
    }

    // --- Queries ---

    /// Whether the requirement of the current step is met.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.selection.step_ready(self.selection.step)
    }

    #[must_use]
    pub fn is_ready_to_submit(&self) -> bool {
        Step::ALL.iter().all(|&step| self.selection.step_ready(step))
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.status == Status::Submitted
    }

    #[must_use]
    pub const fn step(&self) -> Step {
        self.selection.step
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub const fn estimate(&self) -> &Estimate {
        &self.estimate
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn selected_project_type(&self) -> Option<&ProjectType> {
        self.selection.project_type.as_deref().and_then(|slug| self.catalog.project_type(slug))
    }

    #[must_use]
    pub fn selected_urgency(&self) -> Option<&UrgencyTier> {
        self.selection.urgency.as_deref().and_then(|slug| self.catalog.urgency(slug))
    }

    /// Selected add-ons resolved against the catalog, in selection order.
    pub fn selected_add_ons(&self) -> impl Iterator<Item = &AddOn> + '_ {
        self.selection.add_ons.iter().filter_map(|slug| self.catalog.add_on(slug))
    }

    fn apply(&mut self, transition: &'static str, change: impl FnOnce(&Catalog, &mut Selection)) {
        if self.status == Status::Submitted {
            debug!(transition, "Ignoring transition on a submitted session");
            return;
        }

        let catalog: &Catalog = &self.catalog;
        change(catalog, &mut self.selection);
        self.estimate = estimate(&self.catalog, &self.selection);
        debug!(
            transition,
            step = %self.selection.step,
            price = self.estimate.price,
            "Calculator transition"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Calculator {
        Calculator::new(Arc::new(Catalog::fallback().unwrap()))
    }

    #[test]
    fn fresh_session_defaults() {
        let calc = session();
        assert_eq!(calc.step(), Step::ProjectType);
        assert_eq!(calc.selection().page_count, 5);
        assert!(calc.selection().add_ons.is_empty());
        assert_eq!(calc.estimate().price, 0);
        assert!(!calc.can_advance());
    }

    #[test]
    fn unknown_project_type_leaves_state_untouched() {
        let mut calc = session();
        calc.set_project_type("landing").unwrap();
        let before = calc.selection().clone();

        let err = calc.set_project_type("castle").unwrap_err();
        assert!(matches!(err, CalculatorError::UnknownProjectType { .. }));
        assert_eq!(calc.selection(), &before);
    }

    #[test]
    fn standard_only_type_forces_platform() {
        let mut calc = session();
        calc.set_platform(Platform::Alternate);
        calc.set_project_type("webapp").unwrap();
        assert_eq!(calc.selection().platform, Some(Platform::Standard));

        calc.set_platform(Platform::Alternate);
        assert_eq!(calc.selection().platform, Some(Platform::Standard));
    }

    #[test]
    fn supporting_type_keeps_previous_platform() {
        let mut calc = session();
        calc.set_platform(Platform::Alternate);
        calc.set_project_type("shop").unwrap();
        assert_eq!(calc.selection().platform, Some(Platform::Alternate));
    }

    #[test]
    fn page_count_is_clamped() {
        let mut calc = session();
        calc.set_page_count(0);
        assert_eq!(calc.selection().page_count, 1);
        calc.set_page_count(500);
        assert_eq!(calc.selection().page_count, 30);
    }

    #[test]
    fn add_ons_keep_insertion_order() {
        let mut calc = session();
        calc.toggle_add_on("support").unwrap();
        calc.toggle_add_on("seo").unwrap();
        let slugs: Vec<_> = calc.selected_add_ons().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, ["support", "seo"]);

        let err = calc.toggle_add_on("teleport").unwrap_err();
        assert!(matches!(err, CalculatorError::UnknownAddOn { .. }));
        let err = calc.set_urgency("yesterday").unwrap_err();
        assert!(matches!(err, CalculatorError::UnknownUrgency { .. }));
    }

    #[test]
    fn navigation_is_clamped() {
        let mut calc = session();
        calc.retreat();
        assert_eq!(calc.step(), Step::ProjectType);
        for _ in 0..10 {
            calc.advance();
        }
        assert_eq!(calc.step(), Step::Contact);
        calc.go_to(2);
        assert_eq!(calc.step(), Step::PageCount);
    }

    #[test]
    fn estimate_follows_every_transition() {
        let mut calc = session();
        calc.set_project_type("landing").unwrap();
        assert_eq!(calc.estimate().price, 0);

        calc.set_platform(Platform::Standard);
        assert_eq!(calc.estimate().price, 16_000);

        calc.set_urgency("urgent").unwrap();
        assert_eq!(calc.estimate().price, 24_000);
        assert_eq!(calc.estimate().timeline, "до 2 тижнів");
        assert_eq!(calc.selected_urgency().unwrap().slug, "urgent");
        assert_eq!(calc.selected_project_type().unwrap().slug, "landing");
    }

    #[test]
    fn submitted_session_ignores_transitions_until_reset() {
        let mut calc = session();
        calc.set_project_type("landing").unwrap();
        calc.mark_submitted();

        calc.set_page_count(10);
        calc.advance();
        assert!(calc.is_submitted());
        assert_eq!(calc.selection().page_count, 5);
        assert_eq!(calc.step(), Step::ProjectType);

        calc.reset();
        assert!(!calc.is_submitted());
        assert!(calc.selection().project_type.is_none());
    }

    #[test]
    fn readiness_covers_every_step() {
        let mut calc = session();
        calc.set_project_type("corporate").unwrap();
        calc.set_platform(Platform::Standard);
        calc.set_urgency("standard").unwrap();
        assert!(!calc.is_ready_to_submit());

        calc.set_contact_fields("Олена", "+380671234567", "");
        assert!(calc.is_ready_to_submit());

        calc.set_contact_name(" ");
        assert!(!calc.is_ready_to_submit());
    }
}
