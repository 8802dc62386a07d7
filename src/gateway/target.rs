use serde::{Deserialize, Serialize};

use crate::workflow::{EntityId, EntityKind};

/// Form section of one entity addressed by a save request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTarget {
    pub kind: EntityKind,
    pub entity_id: EntityId,
    pub section: String,
}

impl SectionTarget {
    pub fn new(kind: EntityKind, entity_id: EntityId, section: impl Into<String>) -> Self {
        Self {
            kind,
            entity_id,
            section: section.into(),
        }
    }

    /// Path segments of `/<entity>/edit/<id>/<section>`
    pub fn edit_segments(&self) -> Vec<String> {
        vec![
            self.kind.path_segment().to_string(),
            "edit".to_string(),
            self.entity_id.to_string(),
            self.section.clone(),
        ]
    }

    pub fn edit_path(&self) -> String {
        format!("/{}", self.edit_segments().join("/"))
    }
}

/// Path segments of `/<entity>/<id>/<subresource>`
pub fn list_segments(kind: EntityKind, entity_id: EntityId, subresource: &str) -> Vec<String> {
    vec![
        kind.path_segment().to_string(),
        entity_id.to_string(),
        subresource.to_string(),
    ]
}

/// Path segments of `/<entity>/delete/<subresource>/<id>`
pub fn delete_segments(kind: EntityKind, subresource: &str, id: u64) -> Vec<String> {
    vec![
        kind.path_segment().to_string(),
        "delete".to_string(),
        subresource.to_string(),
        id.to_string(),
    ]
}
