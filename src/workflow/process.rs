use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, warn};

use super::location::WorkflowLocation;
use super::navigation::{self, NavigationMode};
use super::navigator::{build_navigator, NavigatorEntry};
use super::step::{EntityId, EntityKind, StepId, WorkflowStep};
use crate::events::EventPublisher;
use crate::form::ErrorMap;
use crate::gateway::SaveOutcome;
use crate::state_machine::{
    GuardContext, StateMachineError, StateMachineResult, StepEvent, StepStateMachine, StepStatus,
    Transition,
};

/// Proof that a save was started for one step
///
/// Handed back to [`WorkflowProcess::finish_save`] or
/// [`WorkflowProcess::abort_save`] when the request completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTicket {
    step_id: StepId,
    previous: StepStatus,
    sequence: u64,
}

impl SaveTicket {
    pub fn step_id(&self) -> StepId {
        self.step_id
    }

    /// Status the step had before the save started
    pub fn previous_status(&self) -> StepStatus {
        self.previous
    }
}

/// Step list and status bookkeeping for one entity's onboarding workflow
#[derive(Debug)]
pub struct WorkflowProcess {
    kind: EntityKind,
    entity_id: EntityId,
    steps: Vec<WorkflowStep>,
    active: StepId,
    navigation: NavigationMode,
    in_flight: HashMap<StepId, SaveTicket>,
    next_sequence: u64,
    state_machine: StepStateMachine,
}

impl WorkflowProcess {
    /// Create a workflow from its steps; the first step by order is active
    pub fn new(
        kind: EntityKind,
        entity_id: EntityId,
        mut steps: Vec<WorkflowStep>,
        navigation: NavigationMode,
    ) -> StateMachineResult<Self> {
        steps.sort_by_key(|step| step.order);

        let mut ids = HashSet::new();
        let mut orders = HashSet::new();
        for step in &steps {
            if step.entity_id != entity_id {
                return Err(StateMachineError::Configuration(format!(
                    "Step {} belongs to entity {}, not {}",
                    step.id, step.entity_id, entity_id
                )));
            }
            if !ids.insert(step.id) {
                return Err(StateMachineError::Configuration(format!(
                    "Duplicate step id {}",
                    step.id
                )));
            }
            if !orders.insert(step.order) {
                return Err(StateMachineError::Configuration(format!(
                    "Duplicate step order {} (step {})",
                    step.order, step.id
                )));
            }
        }

        let active = steps
            .first()
            .map(|step| step.id)
            .ok_or_else(|| StateMachineError::Configuration("Workflow has no steps".to_string()))?;

        Ok(Self {
            kind,
            entity_id,
            steps,
            active,
            navigation,
            in_flight: HashMap::new(),
            next_sequence: 0,
            state_machine: StepStateMachine::default(),
        })
    }

    /// Broadcast every status change on `publisher`
    pub fn with_event_publisher(mut self, publisher: EventPublisher) -> Self {
        self.state_machine = StepStateMachine::new(Some(publisher));
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    pub fn navigation(&self) -> NavigationMode {
        self.navigation
    }

    /// Steps sorted by order
    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    pub fn step(&self, step_id: StepId) -> Option<&WorkflowStep> {
        self.steps.iter().find(|step| step.id == step_id)
    }

    pub fn active_step(&self) -> &WorkflowStep {
        // `active` is only ever set to an id validated against `steps`
        self.step(self.active).unwrap_or(&self.steps[0])
    }

    pub fn is_saving(&self, step_id: StepId) -> bool {
        self.in_flight.contains_key(&step_id)
    }

    pub fn next_reachable_step(&self) -> Option<StepId> {
        navigation::next_reachable_step(&self.steps)
    }

    /// Page address of the active step
    pub fn location(&self) -> WorkflowLocation {
        WorkflowLocation::new(self.kind, self.entity_id, Some(self.active))
    }

    pub fn navigator(&self) -> Vec<NavigatorEntry> {
        build_navigator(&self.steps, self.active, self.navigation, |id| {
            self.is_saving(id)
        })
    }

    /// Open the step addressed by a page location
    ///
    /// Without `wfi` the workflow continues at the first incomplete step.
    pub fn open_location(&mut self, location: &WorkflowLocation) -> StateMachineResult<Transition> {
        if location.kind != self.kind || location.entity_id != self.entity_id {
            return Err(StateMachineError::Configuration(format!(
                "Location {location} does not address this workflow"
            )));
        }
        let step_id = location
            .step
            .or_else(|| self.next_reachable_step())
            .unwrap_or_else(|| self.steps[0].id);
        self.open_step(step_id)
    }

    /// Navigate to a step, making it the active one
    pub fn open_step(&mut self, step_id: StepId) -> StateMachineResult<Transition> {
        let transition = self.apply(step_id, StepEvent::Open)?;
        self.active = step_id;
        Ok(transition)
    }

    /// The user edited the step's form
    pub fn mark_edited(&mut self, step_id: StepId) -> StateMachineResult<Transition> {
        self.apply(step_id, StepEvent::Edit)
    }

    /// Mark the step `inprogress` ahead of dispatching its save request
    pub fn begin_save(&mut self, step_id: StepId) -> StateMachineResult<SaveTicket> {
        let previous = self
            .step(step_id)
            .map(|step| step.status)
            .ok_or(StateMachineError::UnknownStep(step_id.value()))?;

        self.apply(step_id, StepEvent::BeginSave)?;

        self.next_sequence += 1;
        let ticket = SaveTicket {
            step_id,
            previous,
            sequence: self.next_sequence,
        };
        self.in_flight.insert(step_id, ticket.clone());
        Ok(ticket)
    }

    /// Apply a save result to the step the ticket was issued for
    ///
    /// A result for a step that left `inprogress` in the meantime (rejected
    /// or reset out of band) is discarded.
    pub fn finish_save(
        &mut self,
        ticket: &SaveTicket,
        outcome: &SaveOutcome,
    ) -> StateMachineResult<StepStatus> {
        let event = match outcome {
            SaveOutcome::Clean(_) => StepEvent::SaveSucceeded,
            SaveOutcome::Rejected { error_map, .. } => StepEvent::SaveFailed(error_map.clone()),
        };
        self.conclude_save(ticket, event)
    }

    /// Roll the step back after a save that produced no result
    pub fn abort_save(&mut self, ticket: &SaveTicket) -> StateMachineResult<StepStatus> {
        self.conclude_save(
            ticket,
            StepEvent::SaveAborted {
                previous: ticket.previous,
            },
        )
    }

    /// Out-of-band rejection by a later review step
    pub fn reject(&mut self, step_id: StepId, error_map: ErrorMap) -> StateMachineResult<Transition> {
        self.apply(step_id, StepEvent::Reject(error_map))
    }

    /// Administrative reset ("zurücksetzen")
    pub fn reset(&mut self, step_id: StepId) -> StateMachineResult<Transition> {
        self.apply(step_id, StepEvent::Reset)
    }

    fn conclude_save(
        &mut self,
        ticket: &SaveTicket,
        event: StepEvent,
    ) -> StateMachineResult<StepStatus> {
        let current = self
            .step(ticket.step_id)
            .map(|step| step.status)
            .ok_or(StateMachineError::UnknownStep(ticket.step_id.value()))?;

        if self.in_flight.get(&ticket.step_id) != Some(ticket) {
            warn!(
                step_id = ticket.step_id.value(),
                event = event.event_type(),
                "Discarding result for a save that is no longer pending"
            );
            return Ok(current);
        }
        self.in_flight.remove(&ticket.step_id);

        if current != StepStatus::InProgress {
            warn!(
                step_id = ticket.step_id.value(),
                status = %current,
                event = event.event_type(),
                "Step changed out of band while saving; discarding save result"
            );
            return Ok(current);
        }

        let transition = self.apply(ticket.step_id, event)?;
        debug!(
            step_id = ticket.step_id.value(),
            active = (ticket.step_id == self.active),
            status = %transition.to,
            "Save concluded"
        );
        Ok(transition.to)
    }

    fn apply(&mut self, step_id: StepId, event: StepEvent) -> StateMachineResult<Transition> {
        let index = self
            .steps
            .iter()
            .position(|step| step.id == step_id)
            .ok_or(StateMachineError::UnknownStep(step_id.value()))?;

        let context = GuardContext {
            steps: &self.steps,
            save_in_flight: self.in_flight.contains_key(&step_id),
            navigation: self.navigation,
        };
        self.state_machine
            .check_guards(&self.steps[index], &event, &context)?;

        self.state_machine.transition(&mut self.steps[index], &event)
    }
}

/// Shared handle to a workflow
///
/// The navigator and every in-flight save hold a clone; all updates are keyed
/// by [`StepId`], so a save finishing after the user moved on still lands on
/// its own step.
#[derive(Debug, Clone)]
pub struct WorkflowHandle {
    inner: Arc<Mutex<WorkflowProcess>>,
}

impl WorkflowHandle {
    pub fn new(process: WorkflowProcess) -> Self {
        Self {
            inner: Arc::new(Mutex::new(process)),
        }
    }

    /// Lock the workflow for several operations at once
    pub fn lock(&self) -> MutexGuard<'_, WorkflowProcess> {
        self.inner.lock()
    }

    pub fn open_step(&self, step_id: StepId) -> StateMachineResult<Transition> {
        self.inner.lock().open_step(step_id)
    }

    pub fn mark_edited(&self, step_id: StepId) -> StateMachineResult<Transition> {
        self.inner.lock().mark_edited(step_id)
    }

    pub fn begin_save(&self, step_id: StepId) -> StateMachineResult<SaveTicket> {
        self.inner.lock().begin_save(step_id)
    }

    pub fn finish_save(
        &self,
        ticket: &SaveTicket,
        outcome: &SaveOutcome,
    ) -> StateMachineResult<StepStatus> {
        self.inner.lock().finish_save(ticket, outcome)
    }

    pub fn abort_save(&self, ticket: &SaveTicket) -> StateMachineResult<StepStatus> {
        self.inner.lock().abort_save(ticket)
    }

    pub fn reject(&self, step_id: StepId, error_map: ErrorMap) -> StateMachineResult<Transition> {
        self.inner.lock().reject(step_id, error_map)
    }

    pub fn reset(&self, step_id: StepId) -> StateMachineResult<Transition> {
        self.inner.lock().reset(step_id)
    }

    pub fn status(&self, step_id: StepId) -> Option<StepStatus> {
        self.inner.lock().step(step_id).map(|step| step.status)
    }

    /// Copy of the current step list
    pub fn steps(&self) -> Vec<WorkflowStep> {
        self.inner.lock().steps().to_vec()
    }

    pub fn navigator(&self) -> Vec<NavigatorEntry> {
        self.inner.lock().navigator()
    }
}
