mod common;

use common::strategies::*;
use common::reference_date;
use onboarding_core::config::OverrideEngineConfig;
use onboarding_core::form::{FormField, FormSnapshot, OverrideStore};
use onboarding_core::sections::{stammdaten, vertragsdaten, StammdatenField, VertragsdatenField};
use onboarding_core::workflow::{is_reachable, next_reachable_step, reachable_steps};
use proptest::prelude::*;
use serde_json::Value;

fn vertragsdaten_snapshot(values: &[Value]) -> FormSnapshot {
    VertragsdatenField::all()
        .iter()
        .zip(values)
        .map(|(field, value)| (field.path(), value.clone()))
        .collect()
}

fn stammdaten_snapshot(values: &[Value]) -> FormSnapshot {
    StammdatenField::all()
        .iter()
        .zip(values)
        .map(|(field, value)| (field.path(), value.clone()))
        .collect()
}

/// Fields a rule may write when `field` is edited
fn vertragsdaten_targets(field: VertragsdatenField) -> &'static [VertragsdatenField] {
    match field {
        VertragsdatenField::Eintritt => &[VertragsdatenField::ArbeitszeitmodellVon],
        VertragsdatenField::Verwendungsgruppe => &[VertragsdatenField::VereinbarungUEberstunden],
        _ => &[],
    }
}

fn stammdaten_targets(field: StammdatenField) -> &'static [StammdatenField] {
    match field {
        StammdatenField::Geburtsdatum => &[StammdatenField::Alter],
        StammdatenField::Antritt => &[StammdatenField::Begruendung],
        _ => &[],
    }
}

proptest! {
    /// Property: settling any snapshot converges, and settling again changes nothing
    #[test]
    fn vertragsdaten_rules_converge(values in prop::collection::vec(field_value_strategy(), 10)) {
        let engine = vertragsdaten::engine(&OverrideEngineConfig::default());
        let mut snapshot = vertragsdaten_snapshot(&values);
        let mut store = OverrideStore::new();

        let first = engine.settle(&mut snapshot, &mut store, VertragsdatenField::all());
        prop_assert!(first.is_ok(), "rules did not converge: {:?}", first);

        let settled = snapshot.clone();
        let second = engine.settle(&mut snapshot, &mut store, VertragsdatenField::all()).unwrap();
        prop_assert_eq!(second.passes, 0);
        prop_assert_eq!(snapshot, settled);
    }

    #[test]
    fn stammdaten_rules_converge(values in prop::collection::vec(field_value_strategy(), 16)) {
        let engine = stammdaten::engine(&OverrideEngineConfig::default(), reference_date());
        let mut snapshot = stammdaten_snapshot(&values);
        let mut store = OverrideStore::new();

        prop_assert!(engine.settle(&mut snapshot, &mut store, StammdatenField::all()).is_ok());
        let again = engine.settle(&mut snapshot, &mut store, StammdatenField::all()).unwrap();
        prop_assert_eq!(again.passes, 0);
    }

    /// Property: mounting a stored record changes none of its values
    #[test]
    fn hydration_keeps_stored_values(
        contract in prop::collection::vec(field_value_strategy(), 10),
        personal in prop::collection::vec(field_value_strategy(), 16),
    ) {
        let config = OverrideEngineConfig::default();

        let stored = vertragsdaten_snapshot(&contract);
        let form = vertragsdaten::controller(&config, Some(stored.clone()));
        prop_assert_eq!(form.snapshot(), &stored);

        let stored = stammdaten_snapshot(&personal);
        let form = stammdaten::controller(&config, reference_date(), Some(stored.clone()));
        prop_assert_eq!(form.snapshot(), &stored);
    }

    /// Property: an edit keeps the typed value and only touches the edited
    /// field's derived targets
    #[test]
    fn vertragsdaten_edit_keeps_user_values(
        values in prop::collection::vec(field_value_strategy(), 10),
        index in 0usize..10,
        typed in field_value_strategy(),
    ) {
        let stored = vertragsdaten_snapshot(&values);
        let mut form = vertragsdaten::controller(&OverrideEngineConfig::default(), Some(stored.clone()));
        let field = VertragsdatenField::all()[index];

        form.on_field_change(field, typed.clone()).unwrap();

        prop_assert_eq!(form.value(field), &typed);
        for other in VertragsdatenField::all() {
            if *other != field && !vertragsdaten_targets(field).contains(other) {
                prop_assert_eq!(form.value(*other), stored.get_field(*other));
            }
        }
    }

    #[test]
    fn stammdaten_edit_keeps_user_values(
        values in prop::collection::vec(field_value_strategy(), 16),
        index in 0usize..16,
        typed in field_value_strategy(),
    ) {
        let stored = stammdaten_snapshot(&values);
        let mut form = stammdaten::controller(
            &OverrideEngineConfig::default(),
            reference_date(),
            Some(stored.clone()),
        );
        let field = StammdatenField::all()[index];

        form.on_field_change(field, typed.clone()).unwrap();

        prop_assert_eq!(form.value(field), &typed);
        for other in StammdatenField::all() {
            if *other != field && !stammdaten_targets(field).contains(other) {
                prop_assert_eq!(form.value(*other), stored.get_field(*other));
            }
        }
    }

    /// Property: identical snapshots evaluate to identical tables and writes
    #[test]
    fn evaluation_is_pure(values in prop::collection::vec(field_value_strategy(), 16)) {
        let engine = stammdaten::engine(&OverrideEngineConfig::default(), reference_date());
        let snapshot = stammdaten_snapshot(&values);

        let first = engine.evaluate(&snapshot);
        let second = engine.evaluate(&snapshot.clone());
        prop_assert_eq!(first, second);
    }

    /// Property: the next step is never before the first non-completed step
    #[test]
    fn next_reachable_step_is_monotonic(steps in step_list_strategy()) {
        let first_incomplete = steps
            .iter()
            .filter(|step| !step.status.is_completed())
            .map(|step| step.order)
            .min();

        match next_reachable_step(&steps) {
            Some(id) => {
                let next = steps.iter().find(|step| step.id == id).unwrap();
                prop_assert!(!next.status.is_completed());
                prop_assert_eq!(Some(next.order), first_incomplete);
            }
            None => prop_assert!(first_incomplete.is_none()),
        }
    }

    /// Property: reachable steps are exactly the prefix up to the next step
    #[test]
    fn reachable_steps_form_a_prefix(steps in step_list_strategy()) {
        let reachable = reachable_steps(&steps);
        let limit = next_reachable_step(&steps)
            .and_then(|id| steps.iter().find(|step| step.id == id))
            .map(|step| step.order);

        for step in &steps {
            let expected = limit.map_or(true, |limit| step.order <= limit);
            prop_assert_eq!(reachable.contains(&step.id), expected);
            prop_assert_eq!(is_reachable(&steps, step.id), expected);
        }
    }
}
