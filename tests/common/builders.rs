use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::Notify;

use onboarding_core::config::OverrideEngineConfig;
use onboarding_core::gateway::{
    FileDownload, FileKey, FileUpload, GatewayError, GatewayResult, SaveOutcome, SectionGateway,
    SectionTarget,
};
use onboarding_core::sections::{stammdaten, vertragsdaten, StammdatenField, VertragsdatenField};
use onboarding_core::workflow::{
    EntityId, EntityKind, NavigationMode, SectionSession, StepId, WorkflowHandle, WorkflowProcess,
    WorkflowStep,
};

pub const ENTITY: EntityId = EntityId::new(42);
pub const STAMMDATEN_STEP: StepId = StepId::new(1);
pub const VERTRAGSDATEN_STEP: StepId = StepId::new(2);
pub const PRUEFEN_STEP: StepId = StepId::new(3);

pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

/// Three-step employee onboarding workflow
pub fn employee_process(navigation: NavigationMode) -> WorkflowProcess {
    WorkflowProcess::new(
        EntityKind::Mitarbeiter,
        ENTITY,
        vec![
            WorkflowStep::new(STAMMDATEN_STEP, "Stammdaten erfassen", 0, ENTITY),
            WorkflowStep::new(VERTRAGSDATEN_STEP, "Vertragsdaten erfassen", 1, ENTITY),
            WorkflowStep::new(PRUEFEN_STEP, "Mitarbeiter prüfen", 2, ENTITY),
        ],
        navigation,
    )
    .unwrap()
}

pub fn employee_workflow(navigation: NavigationMode) -> WorkflowHandle {
    WorkflowHandle::new(employee_process(navigation))
}

pub fn stammdaten_session(workflow: &WorkflowHandle) -> SectionSession<StammdatenField> {
    let controller =
        stammdaten::controller(&OverrideEngineConfig::default(), reference_date(), None);
    SectionSession::new(
        workflow.clone(),
        STAMMDATEN_STEP,
        SectionTarget::new(EntityKind::Mitarbeiter, ENTITY, stammdaten::SECTION),
        controller,
    )
}

pub fn vertragsdaten_session(workflow: &WorkflowHandle) -> SectionSession<VertragsdatenField> {
    let controller = vertragsdaten::controller(&OverrideEngineConfig::default(), None);
    SectionSession::new(
        workflow.clone(),
        VERTRAGSDATEN_STEP,
        SectionTarget::new(EntityKind::Mitarbeiter, ENTITY, vertragsdaten::SECTION),
        controller,
    )
}

/// In-memory gateway answering submits from a queue of scripted results
#[derive(Default)]
pub struct ScriptedGateway {
    responses: Mutex<VecDeque<GatewayResult<Value>>>,
    submitted: Mutex<Vec<(SectionTarget, Value)>>,
    gate: Option<Notify>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every submit until [`ScriptedGateway::release`] is called
    pub fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    pub fn respond_with(self, body: Value) -> Self {
        self.responses.lock().push_back(Ok(body));
        self
    }

    pub fn fail_with(self, error: GatewayError) -> Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn submitted(&self) -> Vec<(SectionTarget, Value)> {
        self.submitted.lock().clone()
    }
}

#[async_trait]
impl SectionGateway for ScriptedGateway {
    async fn submit_section(
        &self,
        target: &SectionTarget,
        body: &Value,
    ) -> GatewayResult<SaveOutcome> {
        self.submitted.lock().push((target.clone(), body.clone()));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;

        let next = self.responses.lock().pop_front();
        match next {
            Some(Ok(body)) => SaveOutcome::from_response(&target.section, &body),
            Some(Err(error)) => Err(error),
            None => Err(GatewayError::Transport("no scripted response".to_string())),
        }
    }

    async fn list_subresource(
        &self,
        _kind: EntityKind,
        _entity_id: EntityId,
        _subresource: &str,
    ) -> GatewayResult<Vec<Value>> {
        Ok(Vec::new())
    }

    async fn delete_subresource(
        &self,
        _kind: EntityKind,
        _subresource: &str,
        _id: u64,
    ) -> GatewayResult<bool> {
        Ok(true)
    }

    async fn download_file(&self, _kind: EntityKind, key: &FileKey) -> GatewayResult<FileDownload> {
        Ok(FileDownload {
            filename: key.download_filename(None),
            content_type: None,
            bytes: Vec::new(),
        })
    }

    async fn upload_file(
        &self,
        _kind: EntityKind,
        _key: &FileKey,
        _file: FileUpload,
    ) -> GatewayResult<()> {
        Ok(())
    }
}
