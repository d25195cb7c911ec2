//! Error types for the eligibility rule engine

use thiserror::Error;

/// Main error type for parsing, combining and evaluating rules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Invalid token: {0}")]
    Syntax(String),

    #[error("Unexpected end of rule")]
    UnexpectedEnd,

    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),

    #[error("Rule nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Type mismatch: cannot apply {operator} to {left} and {right}")]
    TypeMismatch {
        operator: String,
        left: String,
        right: String,
    },

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Empty rule at position {0}")]
    EmptyRule(usize),

    #[error("Rule not found: {0}")]
    RuleNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for RuleError {
    fn from(err: serde_json::Error) -> Self {
        RuleError::Config(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<RuleError> for pyo3::PyErr {
    fn from(err: RuleError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyKeyError, PyRecursionError, PyRuntimeError, PyValueError};

        match err {
            RuleError::Syntax(_)
            | RuleError::UnexpectedEnd
            | RuleError::UnexpectedToken(_)
            | RuleError::EmptyRule(_)
            | RuleError::TypeMismatch { .. }
            | RuleError::Config(_) => PyValueError::new_err(err.to_string()),
            RuleError::FieldNotFound(_) | RuleError::RuleNotFound(_) => {
                PyKeyError::new_err(err.to_string())
            }
            RuleError::TooDeep(_) => PyRecursionError::new_err(err.to_string()),
            RuleError::UnknownOperator(_) => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

/// Result type alias for the rule engine
pub type Result<T> = std::result::Result<T, RuleError>;
