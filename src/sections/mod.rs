//! Reference form sections with their override rule tables.
//!
//! Each section declares its closed field set, registers its rules on an
//! [`OverrideEngine`](crate::form::OverrideEngine) and offers a constructor
//! for a ready-to-use [`FormController`](crate::form::FormController).

pub mod stammdaten;
pub mod vertragsdaten;

pub use stammdaten::StammdatenField;
pub use vertragsdaten::VertragsdatenField;
