use thiserror::Error;

/// Errors raised by the override engine and form controller
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Unknown field path '{path}' for form {form}")]
    UnknownField { path: String, form: String },

    #[error("Rule cycle detected after {passes} re-entrant passes; still changing: {fields:?}")]
    RuleCycle { passes: u32, fields: Vec<String> },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type FormResult<T> = Result<T, FormError>;

/// Helper function to create unknown field errors for a form type
pub fn unknown_field<F>(path: impl Into<String>) -> FormError {
    FormError::UnknownField {
        path: path.into(),
        form: short_type_name::<F>().to_string(),
    }
}

fn short_type_name<F>() -> &'static str {
    let full = std::any::type_name::<F>();
    full.rsplit("::").next().unwrap_or(full)
}
