//! Page address of a workflow step: `/<entity>/onboarding/<id>?wfi=<step>`.

use std::fmt;

use url::Url;

use super::step::{EntityId, EntityKind, StepId};
use crate::constants::routing::{ONBOARDING_SEGMENT, WFI_QUERY_PARAM};
use crate::error::{PortalError, Result};

const RELATIVE_BASE: &str = "http://localhost/";

/// Onboarding page location; `step` is `None` when the page was opened without `wfi`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowLocation {
    pub kind: EntityKind,
    pub entity_id: EntityId,
    pub step: Option<StepId>,
}

impl WorkflowLocation {
    pub fn new(kind: EntityKind, entity_id: EntityId, step: Option<StepId>) -> Self {
        Self {
            kind,
            entity_id,
            step,
        }
    }

    /// Parse an absolute URL or a root-relative path with optional query
    pub fn parse(input: &str) -> Result<Self> {
        let url = match Url::parse(input) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)
                .and_then(|base| base.join(input))
                .map_err(|e| invalid(input, &e.to_string()))?,
            Err(e) => return Err(invalid(input, &e.to_string())),
        };

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let [kind, marker, id] = segments.as_slice() else {
            return Err(invalid(input, "expected /<entity>/onboarding/<id>"));
        };
        if *marker != ONBOARDING_SEGMENT {
            return Err(invalid(input, "missing onboarding segment"));
        }

        let kind = kind.parse::<EntityKind>().map_err(|e| invalid(input, &e))?;
        let entity_id = id
            .parse::<EntityId>()
            .map_err(|e| invalid(input, &format!("entity id: {e}")))?;

        let step = match url
            .query_pairs()
            .find(|(key, _)| key == WFI_QUERY_PARAM)
        {
            Some((_, value)) => Some(
                value
                    .parse::<StepId>()
                    .map_err(|e| invalid(input, &format!("{WFI_QUERY_PARAM}: {e}")))?,
            ),
            None => None,
        };

        Ok(Self {
            kind,
            entity_id,
            step,
        })
    }

    /// The same page addressing a different step
    pub fn with_step(self, step: StepId) -> Self {
        Self {
            step: Some(step),
            ..self
        }
    }
}

impl fmt::Display for WorkflowLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/{}/{}/{}",
            self.kind.path_segment(),
            ONBOARDING_SEGMENT,
            self.entity_id
        )?;
        if let Some(step) = self.step {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair(WFI_QUERY_PARAM, &step.to_string())
                .finish();
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

fn invalid(input: &str, reason: &str) -> PortalError {
    PortalError::ValidationError(format!("Invalid onboarding location '{input}': {reason}"))
}
