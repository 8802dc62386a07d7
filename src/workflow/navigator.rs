use serde::{Deserialize, Serialize};

use super::navigation::{is_reachable, NavigationMode};
use super::step::{StepId, WorkflowStep};
use crate::constants::status_groups::ATTENTION_STATUSES;
use crate::state_machine::StepStatus;

/// Badge color shown next to a step in the navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Grey,
    Blue,
    Red,
    Green,
}

impl From<StepStatus> for BadgeColor {
    fn from(status: StepStatus) -> Self {
        match status {
            StepStatus::New => Self::Grey,
            StepStatus::InProgress => Self::Blue,
            StepStatus::Error => Self::Red,
            StepStatus::Completed => Self::Green,
        }
    }
}

/// Render-ready navigator row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigatorEntry {
    pub step_id: StepId,
    pub label: String,
    pub order: u32,
    pub status: StepStatus,
    pub badge: BadgeColor,
    pub active: bool,
    pub reachable: bool,
    pub needs_attention: bool,
    pub saving: bool,
}

/// Build navigator rows sorted by step order
pub fn build_navigator(
    steps: &[WorkflowStep],
    active: StepId,
    navigation: NavigationMode,
    is_saving: impl Fn(StepId) -> bool,
) -> Vec<NavigatorEntry> {
    let mut entries: Vec<NavigatorEntry> = steps
        .iter()
        .map(|step| NavigatorEntry {
            step_id: step.id,
            label: step.label.clone(),
            order: step.order,
            status: step.status,
            badge: step.status.into(),
            active: step.id == active,
            reachable: navigation == NavigationMode::Free || is_reachable(steps, step.id),
            needs_attention: ATTENTION_STATUSES.contains(&step.status),
            saving: is_saving(step.id),
        })
        .collect();
    entries.sort_by_key(|entry| entry.order);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::EntityId;

    #[test]
    fn test_navigator_marks_active_and_locked_steps() {
        let steps = vec![
            WorkflowStep::new(StepId::new(2), "Vertragsdaten erfassen", 1, EntityId::new(5)),
            WorkflowStep::new(StepId::new(1), "Stammdaten erfassen", 0, EntityId::new(5))
                .with_status(StepStatus::Error),
        ];

        let entries = build_navigator(&steps, StepId::new(1), NavigationMode::Sequential, |id| {
            id == StepId::new(1)
        });

        assert_eq!(entries[0].label, "Stammdaten erfassen");
        assert_eq!(entries[0].badge, BadgeColor::Red);
        assert!(entries[0].active && entries[0].reachable && entries[0].saving);
        assert!(entries[0].needs_attention);
        assert!(!entries[1].reachable);

        let free = build_navigator(&steps, StepId::new(1), NavigationMode::Free, |_| false);
        assert!(free.iter().all(|entry| entry.reachable));
    }
}
