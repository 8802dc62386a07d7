use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::state_machine::StepStatus;

/// Durable identifier of a workflow step (the `wfi` query value)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(u32);

impl StepId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StepId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Identifier of the employee or participant record a workflow belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Kind of record an onboarding workflow runs for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Mitarbeiter,
    Teilnehmer,
}

impl EntityKind {
    /// URL path segment used by pages and the gateway
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Mitarbeiter => "mitarbeiter",
            Self::Teilnehmer => "teilnehmer",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mitarbeiter" => Ok(Self::Mitarbeiter),
            "teilnehmer" => Ok(Self::Teilnehmer),
            other => Err(format!("Unknown entity kind: {other}")),
        }
    }
}

/// One named, ordered section of an entity's onboarding workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: StepId,
    pub label: String,
    pub order: u32,
    pub status: StepStatus,
    pub entity_id: EntityId,
}

impl WorkflowStep {
    /// Create a step in its initial `new` status
    pub fn new(id: StepId, label: impl Into<String>, order: u32, entity_id: EntityId) -> Self {
        Self {
            id,
            label: label.into(),
            order,
            status: StepStatus::New,
            entity_id,
        }
    }

    pub fn with_status(mut self, status: StepStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_parse_and_display() {
        let step: StepId = " 3".parse().unwrap();
        assert_eq!(step, StepId::new(3));
        assert_eq!(step.to_string(), "3");
        assert!("drei".parse::<StepId>().is_err());
        assert_eq!("42".parse::<EntityId>().unwrap().value(), 42);
    }

    #[test]
    fn test_entity_kind_segments() {
        assert_eq!(EntityKind::Mitarbeiter.path_segment(), "mitarbeiter");
        assert_eq!("teilnehmer".parse::<EntityKind>(), Ok(EntityKind::Teilnehmer));
        assert!("kunde".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_step_serializes_flat_ids() {
        let step = WorkflowStep::new(StepId::new(2), "Vertragsdaten erfassen", 1, EntityId::new(42));
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["id"], 2);
        assert_eq!(json["entity_id"], 42);
        assert_eq!(json["status"], "new");
    }
}
