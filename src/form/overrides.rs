//! Per-field constraints computed by rules.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::field::FormField;

static NOOP: OverrideSpec = OverrideSpec {
    required: None,
    disabled: None,
    visible: None,
    min_bound: None,
    max_bound: None,
};

/// Constraint overrides for one field; `None` means "not overridden"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bound: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bound: Option<Value>,
}

impl OverrideSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn min_bound(mut self, bound: impl Into<Value>) -> Self {
        self.min_bound = Some(bound.into());
        self
    }

    pub fn max_bound(mut self, bound: impl Into<Value>) -> Self {
        self.max_bound = Some(bound.into());
        self
    }

    pub fn is_noop(&self) -> bool {
        self == &NOOP
    }

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.unwrap_or(false)
    }

    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    /// Overlay `other` on top of `self`; attributes `other` sets win
    pub fn merge(&mut self, other: &OverrideSpec) {
        if other.required.is_some() {
            self.required = other.required;
        }
        if other.disabled.is_some() {
            self.disabled = other.disabled;
        }
        if other.visible.is_some() {
            self.visible = other.visible;
        }
        if other.min_bound.is_some() {
            self.min_bound.clone_from(&other.min_bound);
        }
        if other.max_bound.is_some() {
            self.max_bound.clone_from(&other.max_bound);
        }
    }
}

/// Merged result of one full rule evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideTable<F: FormField> {
    entries: BTreeMap<F, OverrideSpec>,
}

impl<F: FormField> Default for OverrideTable<F> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<F: FormField> OverrideTable<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a rule's spec for `field` into the table
    pub fn apply(&mut self, field: F, spec: &OverrideSpec) {
        self.entries.entry(field).or_default().merge(spec);
    }

    pub fn get(&self, field: F) -> &OverrideSpec {
        self.entries.get(&field).unwrap_or(&NOOP)
    }

    pub fn get_path(&self, path: &str) -> &OverrideSpec {
        F::from_path(path).map_or(&NOOP, |field| self.get(field))
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &OverrideSpec)> {
        self.entries.iter().map(|(field, spec)| (*field, spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Override state owned by one form instance and read by its field renderers
#[derive(Debug, Clone)]
pub struct OverrideStore<F: FormField> {
    table: OverrideTable<F>,
    revision: u64,
}

impl<F: FormField> Default for OverrideStore<F> {
    fn default() -> Self {
        Self {
            table: OverrideTable::new(),
            revision: 0,
        }
    }
}

impl<F: FormField> OverrideStore<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole table; overrides are recomputed, never patched
    pub fn replace(&mut self, table: OverrideTable<F>) {
        if table != self.table {
            self.revision += 1;
        }
        self.table = table;
    }

    /// Read accessor for renderers; no-op spec when nothing targets the field
    pub fn get(&self, field: F) -> &OverrideSpec {
        self.table.get(field)
    }

    pub fn get_path(&self, path: &str) -> &OverrideSpec {
        self.table.get_path(path)
    }

    pub fn table(&self) -> &OverrideTable<F> {
        &self.table
    }

    /// Bumped whenever the table content changes, for renderers that cache
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
