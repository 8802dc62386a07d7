use proptest::prelude::*;
use serde_json::{json, Value};

use onboarding_core::state_machine::StepStatus;
use onboarding_core::workflow::{EntityId, StepId, WorkflowStep};

/// Portal dates, including some that do not exist
pub fn portal_date_strategy() -> impl Strategy<Value = String> {
    (1u32..=31, 1u32..=12, 1950i32..=2030)
        .prop_map(|(day, month, year)| format!("{day:02}.{month:02}.{year}"))
}

/// Values a user might leave in any field
pub fn field_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(json!("")),
        Just(json!(true)),
        Just(json!(false)),
        Just(json!("ja")),
        Just(json!("nein")),
        portal_date_strategy().prop_map(Value::from),
        "VB [1-9]".prop_map(Value::from),
        "[A-Za-z ]{1,12}".prop_map(Value::from),
    ]
}

pub fn step_status_strategy() -> impl Strategy<Value = StepStatus> {
    prop_oneof![
        Just(StepStatus::New),
        Just(StepStatus::InProgress),
        Just(StepStatus::Error),
        Just(StepStatus::Completed),
    ]
}

/// Step lists with unique ids and orders, in shuffled order
pub fn step_list_strategy() -> impl Strategy<Value = Vec<WorkflowStep>> {
    prop::collection::vec(step_status_strategy(), 1..10)
        .prop_map(|statuses| {
            statuses
                .into_iter()
                .enumerate()
                .map(|(i, status)| {
                    WorkflowStep::new(
                        StepId::new(100 + i as u32),
                        format!("Schritt {i}"),
                        (i as u32) * 10,
                        EntityId::new(1),
                    )
                    .with_status(status)
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}
