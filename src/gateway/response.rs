//! Parsing of the save collaborator's response envelope
//!
//! `{ "<section>": [ { ...entity, "errors": [..], "errorsMap": {..} } ] }`

use serde::Deserialize;
use serde_json::Value;

use super::errors::{GatewayError, GatewayResult};
use crate::constants::response_keys::{ERRORS, ERRORS_MAP};
use crate::form::{ErrorMap, FormSnapshot};

/// Result of submitting one section
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Canonical values as stored by the backend
    Clean(FormSnapshot),
    /// Validation failed; nothing was stored
    Rejected {
        errors: Vec<String>,
        error_map: ErrorMap,
    },
}

impl SaveOutcome {
    /// Parse the response body for `section`
    pub fn from_response(section: &str, body: &Value) -> GatewayResult<Self> {
        let element = body
            .get(section)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                GatewayError::MalformedResponse(format!("Missing '{section}' array in response"))
            })?
            .first()
            .and_then(Value::as_object)
            .ok_or_else(|| {
                GatewayError::MalformedResponse(format!("Empty '{section}' array in response"))
            })?;

        let errors: Vec<String> = match element.get(ERRORS) {
            Some(Value::Array(items)) => items.iter().map(message_text).collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(GatewayError::MalformedResponse(format!(
                    "'{ERRORS}' must be an array, got {other}"
                )))
            }
        };

        let error_map: ErrorMap = match element.get(ERRORS_MAP) {
            Some(Value::Object(entries)) => entries
                .iter()
                .map(|(path, message)| (path.clone(), message_text(message)))
                .collect(),
            Some(Value::Null) | None => ErrorMap::new(),
            Some(other) => {
                return Err(GatewayError::MalformedResponse(format!(
                    "'{ERRORS_MAP}' must be an object, got {other}"
                )))
            }
        };

        if !errors.is_empty() || !error_map.is_empty() {
            return Ok(Self::Rejected { errors, error_map });
        }

        let mut entity = element.clone();
        entity.remove(ERRORS);
        entity.remove(ERRORS_MAP);
        let snapshot = FormSnapshot::from_json(&Value::Object(entity))
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        Ok(Self::Clean(snapshot))
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean(_))
    }

    pub fn error_map(&self) -> Option<&ErrorMap> {
        match self {
            Self::Rejected { error_map, .. } => Some(error_map),
            Self::Clean(_) => None,
        }
    }
}

/// Body of the delete collaborator's response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

fn message_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
