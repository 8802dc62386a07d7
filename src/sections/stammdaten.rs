//! Personal master data ("Stammdaten erfassen").

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::config::OverrideEngineConfig;
use crate::form::dates::{age_on, parse_value};
use crate::form::{
    rule_fn, FormController, FormField, FormSnapshot, OverrideEngine, OverrideSpec,
    RuleEffect,
};

/// Section name in save paths and response envelopes
pub const SECTION: &str = "stammdaten";

/// Answer to "Antritt" that needs no justification
pub const AFFIRMATIVE_ANTRITT: &str = "ja";

crate::form_fields! {
    pub enum StammdatenField {
        Vorname => "vorname",
        Nachname => "nachname",
        Geburtsdatum => "geburtsdatum",
        Alter => "alter",
        Svnr => "svnr",
        Strasse => "adresse.strasse",
        Plz => "adresse.plz",
        Ort => "adresse.ort",
        Iban => "bank.iban",
        Bic => "bank.bic",
        Bankcard => "bankcard",
        BankcardReason => "bankcardReason",
        Ecard => "ecard",
        EcardReason => "ecardReason",
        Antritt => "antritt",
        Begruendung => "begruendung",
    }
}

use StammdatenField as Field;

/// Register the master data rules
///
/// `reference_date` is the day the derived age is computed for; it is fixed
/// when the form is mounted so evaluation stays deterministic.
pub fn register_rules(engine: &mut OverrideEngine<Field>, reference_date: NaiveDate) {
    engine
        .register_rule(
            Field::Geburtsdatum,
            rule_fn("geburtsdatum derives alter", move |value, _| {
                let effect = RuleEffect::none()
                    .with_override(Field::Alter, OverrideSpec::new().disabled(true));
                match parse_value(value) {
                    Some(birth) => effect.with_write(Field::Alter, json!(age_on(birth, reference_date))),
                    None => effect.with_clear(Field::Alter),
                }
            }),
        )
        .register_rule(
            Field::Bankcard,
            rule_fn("missing bankcard needs a reason", |_, snapshot: &FormSnapshot| {
                reason_required(
                    Field::BankcardReason,
                    !snapshot.is_filled(Field::Bankcard.path()),
                )
            }),
        )
        .register_rule(
            Field::Ecard,
            rule_fn("missing ecard needs a reason", |_, snapshot: &FormSnapshot| {
                reason_required(Field::EcardReason, !snapshot.is_filled(Field::Ecard.path()))
            }),
        )
        .register_rule(
            Field::Antritt,
            rule_fn("antritt decides whether begruendung is needed", |value, _| {
                if is_affirmative_antritt(value) {
                    RuleEffect::none()
                        .with_override(
                            Field::Begruendung,
                            OverrideSpec::new().required(false).disabled(true),
                        )
                        .with_clear(Field::Begruendung)
                } else {
                    RuleEffect::none().with_override(
                        Field::Begruendung,
                        OverrideSpec::new().required(true).disabled(false),
                    )
                }
            }),
        );
}

pub fn engine(config: &OverrideEngineConfig, reference_date: NaiveDate) -> OverrideEngine<Field> {
    let mut engine = OverrideEngine::from_config(config);
    register_rules(&mut engine, reference_date);
    engine
}

/// Mount the section, optionally hydrated with stored values
pub fn controller(
    config: &OverrideEngineConfig,
    reference_date: NaiveDate,
    snapshot: Option<FormSnapshot>,
) -> FormController<Field> {
    let engine = engine(config, reference_date);
    match snapshot {
        Some(snapshot) => FormController::with_snapshot(engine, snapshot),
        None => FormController::new(engine),
    }
}

fn reason_required(reason: Field, missing: bool) -> RuleEffect<Field> {
    RuleEffect::none().with_override(reason, OverrideSpec::new().required(missing).visible(missing))
}

fn is_affirmative_antritt(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|answer| answer.trim().eq_ignore_ascii_case(AFFIRMATIVE_ANTRITT))
}
