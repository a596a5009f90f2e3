//! Error taxonomy shared by the core and the HTTP/WS surface.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssessmentError {
  /// Bad caller input (unknown tier, empty account, malformed id).
  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// Operation not allowed in the current session state.
  #[error("invalid state: {0}")]
  InvalidState(String),

  /// Question data cannot support the requested operation.
  #[error("data integrity error: {0}")]
  DataIntegrity(String),

  #[error("not found: {0}")]
  NotFound(String),
}

impl AssessmentError {
  /// Stable machine-readable code for API error bodies.
  pub fn code(&self) -> &'static str {
    match self {
      AssessmentError::InvalidInput(_) => "invalid_input",
      AssessmentError::InvalidState(_) => "invalid_state",
      AssessmentError::DataIntegrity(_) => "data_integrity",
      AssessmentError::NotFound(_) => "not_found",
    }
  }
}
