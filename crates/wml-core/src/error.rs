//! Errors raised by variable resolution

use thiserror::Error;

/// Failure to resolve a variable path.
///
/// Every problem (bad syntax, an index past the allowed maximum, a missing
/// child under strict resolution, an access the resolved state does not
/// support) collapses into this single kind. Callers treat the whole path
/// as unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VariableError {
    #[error("invalid variable name: '{name}'")]
    InvalidName { name: String },
}

impl VariableError {
    pub fn invalid(name: &str) -> Self {
        VariableError::InvalidName {
            name: name.to_string(),
        }
    }

    /// The path that failed to resolve
    pub fn name(&self) -> &str {
        match self {
            VariableError::InvalidName { name } => name,
        }
    }
}

pub type VariableResult<T> = Result<T, VariableError>;
