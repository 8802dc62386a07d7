//! Document upload and download keyed by `(personalnummer, kind, entryId)`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::workflow::EntityKind;

const DEFAULT_EXTENSION: &str = "pdf";

/// Kinds of scanned documents attached to an onboarding record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Ecard,
    Bankcard,
    Arbeitsgenehmigung,
}

impl FileKind {
    /// Fixed uppercase tag embedded in download filenames
    pub fn tag(self) -> &'static str {
        match self {
            Self::Ecard => "ECARD",
            Self::Bankcard => "BANKCARD",
            Self::Arbeitsgenehmigung => "ARBEITSGENEHMIGUNG",
        }
    }

    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Ecard => "ecard",
            Self::Bankcard => "bankcard",
            Self::Arbeitsgenehmigung => "arbeitsgenehmigung",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Identity of one stored document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileKey {
    pub kind: FileKind,
    pub personalnummer: String,
    pub entry_id: u64,
}

impl FileKey {
    pub fn new(kind: FileKind, personalnummer: impl Into<String>, entry_id: u64) -> Self {
        Self {
            kind,
            personalnummer: personalnummer.into(),
            entry_id,
        }
    }

    /// Path segments of `/<entity>/file/<kind>/<personalnummer>/<entryId>`
    pub fn segments(&self, entity: EntityKind) -> Vec<String> {
        vec![
            entity.path_segment().to_string(),
            "file".to_string(),
            self.kind.path_segment().to_string(),
            self.personalnummer.clone(),
            self.entry_id.to_string(),
        ]
    }

    /// `<personalnummer>_<TAG>_<entryId>.<ext>`
    pub fn download_filename(&self, content_type: Option<&str>) -> String {
        format!(
            "{}_{}_{}.{}",
            self.personalnummer,
            self.kind.tag(),
            self.entry_id,
            extension_for(content_type)
        )
    }
}

/// A downloaded document ready to be handed to the browser or disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDownload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A document to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

fn extension_for(content_type: Option<&str>) -> &'static str {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());

    match essence.as_deref() {
        Some("image/jpeg") | Some("image/jpg") => "jpg",
        Some("image/png") => "png",
        Some("image/tiff") => "tiff",
        _ => DEFAULT_EXTENSION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_filename_contains_tag() {
        let key = FileKey::new(FileKind::Bankcard, "10023", 5);
        assert_eq!(key.download_filename(None), "10023_BANKCARD_5.pdf");
        assert_eq!(
            key.download_filename(Some("image/png")),
            "10023_BANKCARD_5.png"
        );

        let permit = FileKey::new(FileKind::Arbeitsgenehmigung, "10023", 1);
        assert_eq!(
            permit.download_filename(Some("application/pdf; charset=binary")),
            "10023_ARBEITSGENEHMIGUNG_1.pdf"
        );
        assert!(FileKey::new(FileKind::Ecard, "7", 2)
            .download_filename(Some("IMAGE/JPEG"))
            .contains("_ECARD_"));
    }

    #[test]
    fn test_file_segments() {
        let key = FileKey::new(FileKind::Ecard, "10023", 9);
        assert_eq!(
            key.segments(EntityKind::Mitarbeiter).join("/"),
            "mitarbeiter/file/ecard/10023/9"
        );
    }
}
