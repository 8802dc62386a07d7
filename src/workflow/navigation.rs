//! Pure reachability functions over a workflow's step list.
//!
//! Steps are compared by `order`, so the slice does not need to be sorted.

use serde::{Deserialize, Serialize};

use super::step::{StepId, WorkflowStep};

/// How far ahead of the first incomplete step the user may jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    /// Every step can be opened at any time
    #[default]
    Free,
    /// Steps after the first non-completed step stay locked
    Sequential,
}

/// The first step (by order) that is not completed
pub fn blocking_step(steps: &[WorkflowStep]) -> Option<&WorkflowStep> {
    steps
        .iter()
        .filter(|step| step.status.is_blocking())
        .min_by_key(|step| step.order)
}

/// Step the user should continue with, or `None` when every step is completed
pub fn next_reachable_step(steps: &[WorkflowStep]) -> Option<StepId> {
    blocking_step(steps).map(|step| step.id)
}

/// Steps that may be opened under sequential navigation, in order
///
/// These are all steps up to and including the blocking step; when nothing
/// blocks, every step is reachable.
pub fn reachable_steps(steps: &[WorkflowStep]) -> Vec<StepId> {
    let limit = blocking_step(steps).map(|step| step.order);
    let mut reachable: Vec<&WorkflowStep> = steps
        .iter()
        .filter(|step| limit.map_or(true, |limit| step.order <= limit))
        .collect();
    reachable.sort_by_key(|step| step.order);
    reachable.into_iter().map(|step| step.id).collect()
}

/// Check whether `step_id` may be opened under sequential navigation
pub fn is_reachable(steps: &[WorkflowStep], step_id: StepId) -> bool {
    let Some(target) = steps.iter().find(|step| step.id == step_id) else {
        return false;
    };
    blocking_step(steps).map_or(true, |blocking| target.order <= blocking.order)
}
