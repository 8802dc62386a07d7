//! Per-form controller: one snapshot, one rule table, one override store.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, error};

use super::engine::{ChangeOutcome, OverrideEngine};
use super::error_map::ErrorMap;
use super::errors::{unknown_field, FormResult};
use super::field::FormField;
use super::overrides::{OverrideSpec, OverrideStore};
use super::snapshot::FormSnapshot;

/// Displayed validation messages for one form
#[derive(Debug, Clone, PartialEq)]
pub struct FieldErrors<F: FormField> {
    messages: BTreeMap<F, String>,
}

impl<F: FormField> Default for FieldErrors<F> {
    fn default() -> Self {
        Self {
            messages: BTreeMap::new(),
        }
    }
}

impl<F: FormField> FieldErrors<F> {
    pub fn get(&self, field: F) -> Option<&str> {
        self.messages.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.messages.iter().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// How an error map was applied to the form
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReconciliation<F: FormField> {
    pub applied: Vec<F>,
    /// Paths the server reported that this form does not have
    pub ignored_paths: Vec<String>,
}

impl<F: FormField> ErrorReconciliation<F> {
    pub fn has_ignored_paths(&self) -> bool {
        !self.ignored_paths.is_empty()
    }
}

/// Form state owned by one mounted form instance
#[derive(Debug)]
pub struct FormController<F: FormField> {
    engine: OverrideEngine<F>,
    store: OverrideStore<F>,
    snapshot: FormSnapshot,
    errors: FieldErrors<F>,
}

impl<F: FormField> FormController<F> {
    /// Mount an empty form
    pub fn new(engine: OverrideEngine<F>) -> Self {
        let snapshot = FormSnapshot::new();
        let mut store = OverrideStore::new();
        engine.recompute(&snapshot, &mut store);
        Self {
            engine,
            store,
            snapshot,
            errors: FieldErrors::default(),
        }
    }

    /// Mount a form hydrated with stored values
    ///
    /// Overrides are computed for the stored values; derived values the
    /// backend stored are kept as they are.
    pub fn with_snapshot(engine: OverrideEngine<F>, snapshot: FormSnapshot) -> Self {
        let mut store = OverrideStore::new();
        engine.recompute(&snapshot, &mut store);
        Self {
            engine,
            store,
            snapshot,
            errors: FieldErrors::default(),
        }
    }

    /// Entry point for any UI layer: a user changed `field` to `value`
    ///
    /// A failed edit leaves the form untouched, including its errors.
    pub fn on_field_change(&mut self, field: F, value: Value) -> FormResult<ChangeOutcome<F>> {
        let outcome = self
            .engine
            .on_field_change(&mut self.snapshot, &mut self.store, field, value)?;
        self.errors.messages.remove(&field);
        Ok(outcome)
    }

    /// Same as [`on_field_change`](Self::on_field_change) for a path coming from outside
    pub fn on_path_change(&mut self, path: &str, value: Value) -> FormResult<ChangeOutcome<F>> {
        let field = F::from_path(path).ok_or_else(|| unknown_field::<F>(path))?;
        self.on_field_change(field, value)
    }

    pub fn snapshot(&self) -> &FormSnapshot {
        &self.snapshot
    }

    pub fn value(&self, field: F) -> &Value {
        self.snapshot.get_field(field)
    }

    pub fn overrides(&self) -> &OverrideStore<F> {
        &self.store
    }

    pub fn get_override(&self, field: F) -> &OverrideSpec {
        self.store.get(field)
    }

    pub fn errors(&self) -> &FieldErrors<F> {
        &self.errors
    }

    pub fn error_for(&self, field: F) -> Option<&str> {
        self.errors.get(field)
    }

    /// Fields currently required by an override but left empty
    pub fn missing_required(&self) -> Vec<F> {
        self.store
            .table()
            .iter()
            .filter(|(field, spec)| {
                spec.is_required() && spec.is_visible() && !self.snapshot.is_filled(field.path())
            })
            .map(|(field, _)| field)
            .collect()
    }

    /// Replace the form wholesale with the server's canonical values
    ///
    /// Overrides are recomputed for the new values, but rule writes are not
    /// applied so the server's values stay as returned.
    pub fn apply_clean_entity(&mut self, canonical: FormSnapshot) {
        debug!(fields = canonical.len(), "Applying server canonical values");
        self.snapshot = canonical;
        self.errors = FieldErrors::default();
        self.engine.recompute(&self.snapshot, &mut self.store);
    }

    /// Show server validation messages; values and unrelated errors stay untouched
    pub fn apply_error_map(&mut self, error_map: &ErrorMap) -> ErrorReconciliation<F> {
        let mut applied = Vec::new();
        let mut ignored_paths = Vec::new();

        for (path, message) in error_map.iter() {
            match F::from_path(path) {
                Some(field) => {
                    self.errors.messages.insert(field, message.to_string());
                    applied.push(field);
                }
                None => ignored_paths.push(path.to_string()),
            }
        }

        if !ignored_paths.is_empty() {
            error!(
                ignored = ?ignored_paths,
                applied = applied.len(),
                "Error map references fields this form does not have"
            );
        }

        ErrorReconciliation {
            applied,
            ignored_paths,
        }
    }
}
