//! Contract data ("Vertragsdaten erfassen").

use serde_json::Value;

use crate::config::OverrideEngineConfig;
use crate::form::dates::add_days;
use crate::form::{
    rule_fn, FormController, FormSnapshot, OverrideEngine, OverrideSpec, RuleEffect,
};

/// Section name in save paths and response envelopes
pub const SECTION: &str = "vertragsdaten";

/// Employment groups without an overtime agreement
pub const OVERTIME_EXEMPT_GROUPS: &[&str] = &["VB 1", "VB 2", "VB 3"];

/// Value forced into the overtime agreement for exempt groups
pub const NO_OVERTIME_AGREEMENT: &str = "Keine";

/// Shortest allowed contract term after the start date
pub const MIN_TERM_DAYS: i64 = 7;

crate::form_fields! {
    pub enum VertragsdatenField {
        Eintritt => "eintritt",
        Kollektivvertrag => "kollektivvertrag",
        Verwendungsgruppe => "verwendungsgruppe",
        VereinbarungUEberstunden => "vereinbarungUEberstunden",
        Arbeitszeitmodell => "arbeitszeitmodell",
        ArbeitszeitmodellVon => "arbeitszeitmodellVon",
        ArbeitszeitmodellBis => "arbeitszeitmodellBis",
        Wochenstunden => "wochenstunden",
        Befristet => "befristet",
        BefristungBis => "befristungBis",
    }
}

use VertragsdatenField as Field;

/// Register the contract data rules in their evaluation order
pub fn register_rules(engine: &mut OverrideEngine<Field>) {
    engine
        .register_rule(
            Field::Eintritt,
            rule_fn("eintritt starts the working time model and bounds end dates", |value, _| {
                let Some(eintritt) = non_blank(value) else {
                    return RuleEffect::none();
                };
                let mut effect = RuleEffect::none().with_write(Field::ArbeitszeitmodellVon, eintritt);
                if let Some(earliest_end) = add_days(eintritt, MIN_TERM_DAYS) {
                    effect = effect
                        .with_override(
                            Field::ArbeitszeitmodellBis,
                            OverrideSpec::new().min_bound(earliest_end.clone()),
                        )
                        .with_override(
                            Field::BefristungBis,
                            OverrideSpec::new().min_bound(earliest_end),
                        );
                }
                effect
            }),
        )
        .register_rule(
            Field::Verwendungsgruppe,
            rule_fn("verwendungsgruppe decides the overtime agreement", |value, _| {
                match non_blank(value) {
                    Some(group) if OVERTIME_EXEMPT_GROUPS.contains(&group) => RuleEffect::none()
                        .with_override(
                            Field::VereinbarungUEberstunden,
                            OverrideSpec::new().required(false).disabled(true),
                        )
                        .with_write(Field::VereinbarungUEberstunden, NO_OVERTIME_AGREEMENT),
                    Some(_) => RuleEffect::none().with_override(
                        Field::VereinbarungUEberstunden,
                        OverrideSpec::new().required(true).disabled(false),
                    ),
                    None => RuleEffect::none(),
                }
            }),
        )
        .register_rule(
            Field::Befristet,
            rule_fn("befristet shows and requires the end of the term", |value, _| {
                let limited = is_affirmative(value);
                RuleEffect::none().with_override(
                    Field::BefristungBis,
                    OverrideSpec::new().required(limited).visible(limited),
                )
            }),
        );
}

pub fn engine(config: &OverrideEngineConfig) -> OverrideEngine<Field> {
    let mut engine = OverrideEngine::from_config(config);
    register_rules(&mut engine);
    engine
}

/// Mount the section, optionally hydrated with stored values
pub fn controller(
    config: &OverrideEngineConfig,
    snapshot: Option<FormSnapshot>,
) -> FormController<Field> {
    match snapshot {
        Some(snapshot) => FormController::with_snapshot(engine(config), snapshot),
        None => FormController::new(engine(config)),
    }
}

fn non_blank(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

fn is_affirmative(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => matches!(text.trim().to_lowercase().as_str(), "ja" | "true"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> FormController<Field> {
        controller(&OverrideEngineConfig::default(), None)
    }

    #[test]
    fn test_eintritt_copies_and_bounds() {
        let mut form = form();
        let outcome = form.on_field_change(Field::Eintritt, json!("01.03.2026")).unwrap();

        assert_eq!(outcome.passes, 1);
        assert_eq!(form.value(Field::ArbeitszeitmodellVon), &json!("01.03.2026"));
        assert_eq!(
            form.get_override(Field::ArbeitszeitmodellBis).min_bound,
            Some(json!("08.03.2026"))
        );
        assert_eq!(
            form.get_override(Field::BefristungBis).min_bound,
            Some(json!("08.03.2026"))
        );
    }

    #[test]
    fn test_overtime_agreement_by_group() {
        let mut form = form();
        form.on_field_change(Field::Verwendungsgruppe, json!("VB 3")).unwrap();
        let spec = form.get_override(Field::VereinbarungUEberstunden);
        assert!(!spec.is_required() && spec.is_disabled());
        assert_eq!(form.value(Field::VereinbarungUEberstunden), &json!("Keine"));

        let mut form = self::form();
        let outcome = form.on_field_change(Field::Verwendungsgruppe, json!("VB 7")).unwrap();
        let spec = form.get_override(Field::VereinbarungUEberstunden);
        assert!(spec.is_required() && !spec.is_disabled());
        assert!(outcome.applied_writes.is_empty());
        assert_eq!(form.value(Field::VereinbarungUEberstunden), &Value::Null);
    }

    #[test]
    fn test_befristet_toggles_end_date() {
        let mut form = form();
        assert!(!form.get_override(Field::BefristungBis).is_visible());

        form.on_field_change(Field::Befristet, json!(true)).unwrap();
        let spec = form.get_override(Field::BefristungBis);
        assert!(spec.is_visible() && spec.is_required());

        form.on_field_change(Field::BefristungBis, json!("31.12.2026")).unwrap();
        form.on_field_change(Field::Befristet, json!("nein")).unwrap();
        assert!(!form.get_override(Field::BefristungBis).is_required());
        // hiding keeps the entered value
        assert_eq!(form.value(Field::BefristungBis), &json!("31.12.2026"));
    }

    #[test]
    fn test_model_start_can_differ_from_eintritt() {
        let mut form = form();
        form.on_field_change(Field::Eintritt, json!("01.03.2026")).unwrap();
        form.on_field_change(Field::ArbeitszeitmodellVon, json!("15.03.2026")).unwrap();
        form.on_field_change(Field::Wochenstunden, json!("38,5")).unwrap();

        assert!(!form.get_override(Field::ArbeitszeitmodellVon).is_disabled());
        assert_eq!(form.value(Field::ArbeitszeitmodellVon), &json!("15.03.2026"));

        // a new eintritt derives the model start again
        form.on_field_change(Field::Eintritt, json!("01.04.2026")).unwrap();
        assert_eq!(form.value(Field::ArbeitszeitmodellVon), &json!("01.04.2026"));
    }

    #[test]
    fn test_hydrated_record_keeps_stored_model_start() {
        let stored: FormSnapshot = [
            ("eintritt", json!("01.03.2026")),
            ("arbeitszeitmodellVon", json!("01.04.2026")),
            ("verwendungsgruppe", json!("VB 2")),
            ("vereinbarungUEberstunden", json!("Pauschale")),
        ]
        .into_iter()
        .collect();

        let form = controller(&OverrideEngineConfig::default(), Some(stored.clone()));
        assert_eq!(form.snapshot(), &stored);
        assert_eq!(
            form.get_override(Field::ArbeitszeitmodellBis).min_bound,
            Some(json!("08.03.2026"))
        );
        assert!(form.get_override(Field::VereinbarungUEberstunden).is_disabled());
    }
}
