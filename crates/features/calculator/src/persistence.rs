//! Mirror of a session's selections in a key/value store.
//!
//! Only the wizard choices are stored; contact fields and the submission flag never leave
//! the session. Stores are synchronous and failures never reach the transitions: a broken
//! store degrades to "nothing remembered".

use crate::catalog::Catalog;
use crate::error::{CalculatorError, CalculatorErrorExt};
use crate::session::Calculator;
use abect_domain::calculator::Platform;
use abect_domain::constants::STORAGE_KEY;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, warn};

/// Persisted subset of a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct SelectionSnapshot {
    pub current_step: usize,
    pub project_type: Option<String>,
    #[cfg_attr(feature = "server", schema(value_type = Option<String>, example = "standard"))]
    pub platform: Option<Platform>,
    pub pages_count: Option<u32>,
    pub additional_services: Vec<String>,
    pub urgency: Option<String>,
}

/// Key/value backend for selection mirrors.
pub trait SelectionStore: Debug + Send + Sync {
    /// # Errors
    /// Backend specific read failure.
    fn load(&self, key: &str) -> Result<Option<String>, CalculatorError>;

    /// # Errors
    /// Backend specific write failure.
    fn save(&self, key: &str, value: &str) -> Result<(), CalculatorError>;

    /// # Errors
    /// Backend specific delete failure.
    fn clear(&self, key: &str) -> Result<(), CalculatorError>;
}

/// In-process store, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<FxHashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, CalculatorError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), CalculatorError> {
        self.entries.write().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), CalculatorError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// Store that remembers nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl SelectionStore for NoopStore {
    fn load(&self, _key: &str) -> Result<Option<String>, CalculatorError> {
        Ok(None)
    }

    fn save(&self, _key: &str, _value: &str) -> Result<(), CalculatorError> {
        Ok(())
    }

    fn clear(&self, _key: &str) -> Result<(), CalculatorError> {
        Ok(())
    }
}

impl Calculator {
    /// Starts from defaults and replays whatever `store` remembers.
    ///
    /// Missing, unreadable or corrupt records leave the fresh session as is.
    #[must_use]
    pub fn restore(catalog: Arc<Catalog>, store: &dyn SelectionStore) -> Self {
        let raw = match store.load(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::new(catalog),
            Err(e) => {
                warn!(error = %e, "Selection store unreadable, starting fresh");
                return Self::new(catalog);
            },
        };

        match serde_json::from_str::<SelectionSnapshot>(&raw).context("Decoding selection") {
            Ok(snapshot) => Self::from_snapshot(catalog, &snapshot),
            Err(e) => {
                warn!(error = %e, "Corrupt selection mirror, starting fresh");
                Self::new(catalog)
            },
        }
    }

    /// Builds a session by replaying `snapshot` through the regular transitions.
    ///
    /// Order: project type, platform, pages, add-ons, urgency, step. Slugs the catalog does
    /// not know are dropped.
    #[must_use]
    pub fn from_snapshot(catalog: Arc<Catalog>, snapshot: &SelectionSnapshot) -> Self {
        let mut calc = Self::new(catalog);

        if let Some(slug) = snapshot.project_type.as_deref() {
            drop_stale(calc.set_project_type(slug));
        }
        if let Some(platform) = snapshot.platform {
            calc.set_platform(platform);
        }
        if let Some(pages) = snapshot.pages_count.filter(|&pages| pages > 0) {
            calc.set_page_count(pages);
        }
        for slug in &snapshot.additional_services {
            drop_stale(calc.toggle_add_on(slug));
        }
        if let Some(slug) = snapshot.urgency.as_deref() {
            drop_stale(calc.set_urgency(slug));
        }
        if snapshot.current_step > 0 {
            calc.go_to(snapshot.current_step);
        }

        calc
    }

    #[must_use]
    pub fn snapshot(&self) -> SelectionSnapshot {
        let selection = self.selection();
        SelectionSnapshot {
            current_step: selection.step.index(),
            project_type: selection.project_type.clone(),
            platform: selection.platform,
            pages_count: Some(selection.page_count),
            additional_services: selection.add_ons.clone(),
            urgency: selection.urgency.clone(),
        }
    }

    /// Writes the mirror. Skipped once the session is submitted; failures are only logged.
    pub fn persist(&self, store: &dyn SelectionStore) {
        if self.is_submitted() {
            debug!("Session submitted, not persisting");
            return;
        }

        let result = serde_json::to_string(&self.snapshot())
            .context("Encoding selection")
            .and_then(|raw| store.save(STORAGE_KEY, &raw));

        if let Err(e) = result {
            warn!(error = %e, "Failed to persist selection");
        }
    }

    /// [`Calculator::reset`] plus removal of the stored mirror.
    pub fn reset_with(&mut self, store: &dyn SelectionStore) {
        self.reset();
        if let Err(e) = store.clear(STORAGE_KEY) {
            warn!(error = %e, "Failed to clear persisted selection");
        }
    }
}

fn drop_stale(result: Result<(), CalculatorError>) {
    if let Err(e) = result {
        debug!(error = %e, "Dropping stale selection");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Step;

    #[derive(Debug)]
    struct BrokenStore;

    impl SelectionStore for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<String>, CalculatorError> {
            Err(CalculatorError::Storage { message: "disk on fire".into(), context: None })
        }

        fn save(&self, _key: &str, _value: &str) -> Result<(), CalculatorError> {
            Err(CalculatorError::Storage { message: "disk on fire".into(), context: None })
        }

        fn clear(&self, _key: &str) -> Result<(), CalculatorError> {
            Err(CalculatorError::Storage { message: "disk on fire".into(), context: None })
        }
    }

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::fallback().unwrap())
    }

    #[test]
    fn snapshot_uses_storage_field_names() {
        let mut calc = Calculator::new(catalog());
        calc.set_project_type("landing").unwrap();
        calc.set_platform(Platform::Alternate);

        let value = serde_json::to_value(calc.snapshot()).unwrap();
        assert_eq!(value["projectType"], "landing");
        assert_eq!(value["platform"], "alternate");
        assert_eq!(value["pagesCount"], 5);
        assert_eq!(value["currentStep"], 0);
        assert!(value.get("name").is_none());
    }

    #[test]
    fn restore_replays_in_transition_order() {
        let store = MemoryStore::new();
        let raw = r#"{"currentStep":4,"projectType":"webapp","platform":"alternate",
            "pagesCount":12,"additionalServices":["seo","teleport"],"urgency":"relaxed"}"#;
        store.save(STORAGE_KEY, raw).unwrap();

        let calc = Calculator::restore(catalog(), &store);
        let selection = calc.selection();
        assert_eq!(selection.project_type.as_deref(), Some("webapp"));
        // webapp has no alternate option
        assert_eq!(selection.platform, Some(Platform::Standard));
        assert_eq!(selection.page_count, 12);
        assert_eq!(selection.add_ons, ["seo"]);
        assert_eq!(selection.urgency.as_deref(), Some("relaxed"));
        assert_eq!(calc.step(), Step::Urgency);
    }

    #[test]
    fn zero_pages_in_mirror_keep_the_default() {
        let snapshot = SelectionSnapshot { pages_count: Some(0), ..SelectionSnapshot::default() };
        let calc = Calculator::from_snapshot(catalog(), &snapshot);
        assert_eq!(calc.selection().page_count, 5);
    }

    #[test]
    fn broken_store_never_breaks_the_session() {
        let mut calc = Calculator::restore(catalog(), &BrokenStore);
        calc.set_project_type("shop").unwrap();
        calc.persist(&BrokenStore);
        calc.reset_with(&BrokenStore);
        assert!(calc.selection().project_type.is_none());
    }

    #[test]
    fn submitted_sessions_are_not_persisted() {
        let store = MemoryStore::new();
        let mut calc = Calculator::new(catalog());
        calc.set_project_type("landing").unwrap();
        calc.mark_submitted();
        calc.persist(&store);
        assert!(store.load(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn reset_with_clears_the_mirror() {
        let store = MemoryStore::new();
        let mut calc = Calculator::new(catalog());
        calc.set_project_type("landing").unwrap();
        calc.persist(&store);
        assert!(store.load(STORAGE_KEY).unwrap().is_some());

        calc.reset_with(&store);
        assert!(store.load(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn noop_store_remembers_nothing() {
        let mut calc = Calculator::new(catalog());
        calc.set_project_type("landing").unwrap();
        calc.persist(&NoopStore);
        assert!(Calculator::restore(catalog(), &NoopStore).selection().project_type.is_none());
    }
}
