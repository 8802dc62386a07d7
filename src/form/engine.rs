//! The override engine: registration, full re-evaluation and re-entrant
//! direct-write passes.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, error, trace};

use super::errors::{unknown_field, FormError, FormResult};
use super::field::FormField;
use super::overrides::{OverrideStore, OverrideTable};
use super::rule::{FieldRule, FieldWrite};
use super::snapshot::FormSnapshot;
use crate::config::OverrideEngineConfig;
use crate::constants::engine::DEFAULT_MAX_REENTRANT_PASSES;
use crate::logging::log_rule_evaluation;

struct RegisteredRule<F: FormField> {
    trigger: F,
    rule: Box<dyn FieldRule<F>>,
}

/// Result of running every registered rule once
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<F: FormField> {
    pub table: OverrideTable<F>,
    pub writes: Vec<FieldWrite<F>>,
}

/// What one user action ended up doing to the form
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeOutcome<F: FormField> {
    /// Re-entrant passes triggered by direct writes
    pub passes: u32,
    /// Writes that actually changed the snapshot, in application order
    pub applied_writes: Vec<FieldWrite<F>>,
}

/// Rule table for one form instance
pub struct OverrideEngine<F: FormField> {
    rules: Vec<RegisteredRule<F>>,
    max_reentrant_passes: u32,
}

impl<F: FormField> std::fmt::Debug for OverrideEngine<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideEngine")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| (r.trigger.path(), r.rule.description()))
                    .collect::<Vec<_>>(),
            )
            .field("max_reentrant_passes", &self.max_reentrant_passes)
            .finish()
    }
}

impl<F: FormField> Default for OverrideEngine<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FormField> OverrideEngine<F> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            max_reentrant_passes: DEFAULT_MAX_REENTRANT_PASSES,
        }
    }

    pub fn from_config(config: &OverrideEngineConfig) -> Self {
        Self::new().with_max_reentrant_passes(config.max_reentrant_passes)
    }

    pub fn with_max_reentrant_passes(mut self, passes: u32) -> Self {
        self.max_reentrant_passes = passes;
        self
    }

    /// Add a rule for the lifetime of this form; evaluation follows registration order
    pub fn register_rule(&mut self, trigger: F, rule: impl FieldRule<F> + 'static) -> &mut Self {
        debug!(
            trigger = trigger.path(),
            rule = rule.description(),
            "Registering override rule"
        );
        self.rules.push(RegisteredRule {
            trigger,
            rule: Box::new(rule),
        });
        self
    }

    /// Register against a path received as a string, rejecting unknown fields
    pub fn register_rule_by_path(
        &mut self,
        trigger: &str,
        rule: impl FieldRule<F> + 'static,
    ) -> FormResult<&mut Self> {
        let field = F::from_path(trigger).ok_or_else(|| unknown_field::<F>(trigger))?;
        Ok(self.register_rule(field, rule))
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn max_reentrant_passes(&self) -> u32 {
        self.max_reentrant_passes
    }

    /// Whether any rule is bound to `field`
    pub fn watches(&self, field: F) -> bool {
        self.rules.iter().any(|r| r.trigger == field)
    }

    /// Run every rule once against `snapshot`
    ///
    /// All rules see the same snapshot; writes issued in this pass are only
    /// visible to the next pass.
    pub fn evaluate(&self, snapshot: &FormSnapshot) -> Evaluation<F> {
        self.evaluate_triggered(snapshot, |_| true)
    }

    /// Full override table, but direct writes only from rules whose trigger
    /// satisfies `triggered`
    fn evaluate_triggered(
        &self,
        snapshot: &FormSnapshot,
        triggered: impl Fn(F) -> bool,
    ) -> Evaluation<F> {
        let mut table = OverrideTable::new();
        let mut writes = Vec::new();

        for registered in &self.rules {
            let value = snapshot.get_field(registered.trigger);
            let effect = registered.rule.apply(value, snapshot);

            trace!(
                trigger = registered.trigger.path(),
                rule = registered.rule.description(),
                overrides = effect.overrides.len(),
                writes = effect.writes.len(),
                "Rule evaluated"
            );

            for (field, spec) in &effect.overrides {
                table.apply(*field, spec);
            }
            if triggered(registered.trigger) {
                writes.extend(effect.writes);
            }
        }

        Evaluation { table, writes }
    }

    /// Apply a user edit and settle the form
    ///
    /// Either the whole action settles or `snapshot` and `store` are left as
    /// they were before the edit.
    pub fn on_field_change(
        &self,
        snapshot: &mut FormSnapshot,
        store: &mut OverrideStore<F>,
        field: F,
        value: Value,
    ) -> FormResult<ChangeOutcome<F>> {
        let mut working = snapshot.clone();
        let mut working_store = store.clone();
        working.set_field(field, value);

        let outcome = self.settle_in_place(&mut working, &mut working_store, &[field])?;
        *snapshot = working;
        *store = working_store;
        Ok(outcome)
    }

    /// Recompute the override table without applying any writes
    pub fn recompute(&self, snapshot: &FormSnapshot, store: &mut OverrideStore<F>) {
        store.replace(self.evaluate(snapshot).table);
    }

    /// Treat `changed` as freshly edited and settle the form
    ///
    /// Only rules triggered by `changed` write derived values; fields those
    /// writes change trigger the next pass. Overrides are always recomputed
    /// from every rule. On error nothing is committed.
    pub fn settle(
        &self,
        snapshot: &mut FormSnapshot,
        store: &mut OverrideStore<F>,
        changed: &[F],
    ) -> FormResult<ChangeOutcome<F>> {
        let mut working = snapshot.clone();
        let mut working_store = store.clone();

        let outcome = self.settle_in_place(&mut working, &mut working_store, changed)?;
        *snapshot = working;
        *store = working_store;
        Ok(outcome)
    }

    /// Exceeding `max_reentrant_passes` is a rule wiring defect and is
    /// reported as [`FormError::RuleCycle`]. A write whose value already
    /// matches the snapshot is not a change and does not cause another pass.
    fn settle_in_place(
        &self,
        snapshot: &mut FormSnapshot,
        store: &mut OverrideStore<F>,
        changed: &[F],
    ) -> FormResult<ChangeOutcome<F>> {
        let trigger = changed
            .iter()
            .map(|field| field.path())
            .collect::<Vec<_>>()
            .join(",");
        let mut changed: BTreeSet<F> = changed.iter().copied().collect();
        let mut passes = 0u32;
        let mut applied_writes = Vec::new();

        loop {
            let evaluation = self.evaluate_triggered(snapshot, |field| changed.contains(&field));
            let pending = changing_writes(snapshot, evaluation.writes);
            store.replace(evaluation.table);

            if pending.is_empty() {
                log_rule_evaluation(&trigger, self.rules.len(), passes, applied_writes.len());
                return Ok(ChangeOutcome {
                    passes,
                    applied_writes,
                });
            }

            if passes >= self.max_reentrant_passes {
                let fields: Vec<String> =
                    pending.iter().map(|w| w.field.path().to_string()).collect();
                error!(
                    trigger = %trigger,
                    passes = passes + 1,
                    fields = ?fields,
                    "Override rules did not converge"
                );
                return Err(FormError::RuleCycle {
                    passes: passes + 1,
                    fields,
                });
            }

            changed = pending.iter().map(|write| write.field).collect();
            for write in pending {
                snapshot.set_field(write.field, write.value.clone());
                applied_writes.push(write);
            }
            passes += 1;
        }
    }
}

/// Collapse writes per target (last wins) and drop those that change nothing
fn changing_writes<F: FormField>(
    snapshot: &FormSnapshot,
    writes: Vec<FieldWrite<F>>,
) -> Vec<FieldWrite<F>> {
    let mut order = Vec::new();
    let mut latest: BTreeMap<F, Value> = BTreeMap::new();

    for write in writes {
        if !latest.contains_key(&write.field) {
            order.push(write.field);
        }
        latest.insert(write.field, write.value);
    }

    order
        .into_iter()
        .filter_map(|field| {
            let value = latest.remove(&field)?;
            let current = snapshot.get_field(field);
            let unchanged = current == &value || (value.is_null() && !snapshot.contains(field.path()));
            (!unchanged).then_some(FieldWrite { field, value })
        })
        .collect()
}
