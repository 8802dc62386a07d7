//! Rule definitions for the override engine.

use serde_json::Value;

use super::field::FormField;
use super::overrides::OverrideSpec;
use super::snapshot::FormSnapshot;

/// A direct value write issued by a rule
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWrite<F: FormField> {
    pub field: F,
    pub value: Value,
}

/// Everything one rule wants to change for the current snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEffect<F: FormField> {
    pub overrides: Vec<(F, OverrideSpec)>,
    pub writes: Vec<FieldWrite<F>>,
}

impl<F: FormField> Default for RuleEffect<F> {
    fn default() -> Self {
        Self {
            overrides: Vec::new(),
            writes: Vec::new(),
        }
    }
}

impl<F: FormField> RuleEffect<F> {
    /// Effect that changes nothing
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, field: F, spec: OverrideSpec) -> Self {
        self.overrides.push((field, spec));
        self
    }

    pub fn with_write(mut self, field: F, value: impl Into<Value>) -> Self {
        self.writes.push(FieldWrite {
            field,
            value: value.into(),
        });
        self
    }

    /// Explicitly clear a field; the engine never clears values on its own
    pub fn with_clear(self, field: F) -> Self {
        self.with_write(field, Value::Null)
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty() && self.writes.is_empty()
    }
}

/// A pure function from the trigger's value and the snapshot to a [`RuleEffect`]
///
/// Rules must be deterministic: the same snapshot always yields the same effect.
pub trait FieldRule<F: FormField>: Send + Sync {
    fn apply(&self, value: &Value, snapshot: &FormSnapshot) -> RuleEffect<F>;

    /// Get a description of this rule for logging
    fn description(&self) -> &str;
}

/// Closure-backed rule
pub struct FnRule<Fun> {
    description: String,
    apply: Fun,
}

impl<F, Fun> FieldRule<F> for FnRule<Fun>
where
    F: FormField,
    Fun: Fn(&Value, &FormSnapshot) -> RuleEffect<F> + Send + Sync,
{
    fn apply(&self, value: &Value, snapshot: &FormSnapshot) -> RuleEffect<F> {
        (self.apply)(value, snapshot)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Wrap a closure as a [`FieldRule`]
pub fn rule_fn<F, Fun>(description: impl Into<String>, apply: Fun) -> FnRule<Fun>
where
    F: FormField,
    Fun: Fn(&Value, &FormSnapshot) -> RuleEffect<F> + Send + Sync,
{
    FnRule {
        description: description.into(),
        apply,
    }
}
