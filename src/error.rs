use thiserror::Error;

pub type CalcResult<T> = Result<T, CalcError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("an unknown must be selected before calculating")]
    MissingUnknown,

    #[error("field {field} must be a positive number")]
    InvalidField { field: &'static str },

    #[error("insufficient inputs: {0}")]
    InsufficientInputs(String),

    #[error("cannot solve: {0}")]
    Domain(String),

    #[error("division by zero in {context}")]
    DivisionByZero { context: String },
}

impl CalcError {
    pub(crate) fn invalid(field: &'static str) -> Self {
        log::warn!("rejected input: {field} must be a positive number");
        CalcError::InvalidField { field }
    }
}
