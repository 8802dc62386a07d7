//! Boundary to the portal backend.
//!
//! The backend owns validation and persistence. This module only knows the
//! request paths, the response envelope and the document naming contract.

pub mod client;
pub mod errors;
pub mod files;
pub mod http;
pub mod response;
pub mod target;

pub use client::SectionGateway;
pub use errors::{GatewayError, GatewayResult};
pub use files::{FileDownload, FileKey, FileKind, FileUpload};
pub use http::HttpGateway;
pub use response::{DeleteResponse, SaveOutcome};
pub use target::SectionTarget;
