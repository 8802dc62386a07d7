use serde_json::Value;
use tracing::{info, warn};

use super::process::{SaveTicket, WorkflowHandle};
use super::step::StepId;
use crate::error::{PortalError, Result};
use crate::form::{ChangeOutcome, FormController, FormField};
use crate::gateway::{GatewayError, SaveOutcome, SectionGateway, SectionTarget};
use crate::state_machine::StepStatus;

/// One step's open form bound to its workflow and save target
#[derive(Debug)]
pub struct SectionSession<F: FormField> {
    step_id: StepId,
    target: SectionTarget,
    controller: FormController<F>,
    workflow: WorkflowHandle,
}

/// A dispatched-but-not-yet-sent save, detached from the form
///
/// Holds everything needed to update the step once the backend answers, so
/// the form may be closed while the request is in flight.
#[derive(Debug)]
pub struct SaveRequest {
    ticket: SaveTicket,
    target: SectionTarget,
    body: Value,
    workflow: WorkflowHandle,
}

/// Backend answer after the step status has been updated
#[derive(Debug)]
pub struct SaveResponse {
    pub step_id: StepId,
    pub status: StepStatus,
    pub outcome: std::result::Result<SaveOutcome, GatewayError>,
}

/// What a finished save did to the step and the form
#[derive(Debug, Clone, PartialEq)]
pub struct SaveReport {
    pub step_id: StepId,
    pub status: StepStatus,
    /// General messages not tied to a field
    pub errors: Vec<String>,
    /// Error map entries with no field in this form
    pub ignored_paths: Vec<String>,
}

impl SaveReport {
    pub fn is_completed(&self) -> bool {
        self.status == StepStatus::Completed
    }
}

impl<F: FormField> SectionSession<F> {
    pub fn new(
        workflow: WorkflowHandle,
        step_id: StepId,
        target: SectionTarget,
        controller: FormController<F>,
    ) -> Self {
        Self {
            step_id,
            target,
            controller,
            workflow,
        }
    }

    pub fn step_id(&self) -> StepId {
        self.step_id
    }

    pub fn target(&self) -> &SectionTarget {
        &self.target
    }

    pub fn controller(&self) -> &FormController<F> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut FormController<F> {
        &mut self.controller
    }

    pub fn is_saving(&self) -> bool {
        self.workflow.lock().is_saving(self.step_id)
    }

    /// Apply a user edit and move the step back into progress
    pub fn on_field_change(&mut self, field: F, value: Value) -> Result<ChangeOutcome<F>> {
        let outcome = self.controller.on_field_change(field, value)?;
        self.workflow.mark_edited(self.step_id)?;
        Ok(outcome)
    }

    /// Mark the step `inprogress` and capture the request body
    pub fn prepare_save(&self) -> Result<SaveRequest> {
        let ticket = self.workflow.begin_save(self.step_id)?;
        Ok(SaveRequest {
            ticket,
            target: self.target.clone(),
            body: self.controller.snapshot().to_json(),
            workflow: self.workflow.clone(),
        })
    }

    /// Reconcile the form with a backend answer
    ///
    /// A clean entity replaces the form wholesale; an error map only marks
    /// the listed fields. Transport failures surface as
    /// [`PortalError::Transport`] after the step was rolled back.
    pub fn finish_save(&mut self, response: SaveResponse) -> Result<SaveReport> {
        if response.step_id != self.step_id {
            return Err(PortalError::Internal(format!(
                "Save response for step {} handed to step {}",
                response.step_id, self.step_id
            )));
        }

        match response.outcome {
            Ok(SaveOutcome::Clean(canonical)) => {
                self.controller.apply_clean_entity(canonical);
                Ok(SaveReport {
                    step_id: self.step_id,
                    status: response.status,
                    errors: Vec::new(),
                    ignored_paths: Vec::new(),
                })
            }
            Ok(SaveOutcome::Rejected { errors, error_map }) => {
                let reconciliation = self.controller.apply_error_map(&error_map);
                Ok(SaveReport {
                    step_id: self.step_id,
                    status: response.status,
                    errors,
                    ignored_paths: reconciliation.ignored_paths,
                })
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Prepare, dispatch and reconcile in one go
    pub async fn save<G>(&mut self, gateway: &G) -> Result<SaveReport>
    where
        G: SectionGateway + ?Sized,
    {
        let request = self.prepare_save()?;
        let response = request.dispatch(gateway).await?;
        self.finish_save(response)
    }
}

impl SaveRequest {
    pub fn step_id(&self) -> StepId {
        self.ticket.step_id()
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Send the request and record the result on the step
    ///
    /// Runs to completion even when the user navigated to another step.
    pub async fn dispatch<G>(self, gateway: &G) -> Result<SaveResponse>
    where
        G: SectionGateway + ?Sized,
    {
        let outcome = gateway.submit_section(&self.target, &self.body).await;

        let status = match &outcome {
            Ok(result) => self.workflow.finish_save(&self.ticket, result)?,
            Err(error) => {
                warn!(
                    step_id = self.ticket.step_id().value(),
                    path = %self.target.edit_path(),
                    error = %error,
                    "Save failed in transport; restoring step status"
                );
                self.workflow.abort_save(&self.ticket)?
            }
        };

        info!(
            step_id = self.ticket.step_id().value(),
            section = %self.target.section,
            status = %status,
            "Save dispatched"
        );

        Ok(SaveResponse {
            step_id: self.ticket.step_id(),
            status,
            outcome,
        })
    }
}
