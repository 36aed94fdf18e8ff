use thiserror::Error;

use crate::api::ApiError;

/// Errors surfaced by the mood tracker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoodError {
  /// Bad mood label or value; never retried.
  #[error("invalid mood entry: {0}")]
  Validation(String),

  /// The server or network failed after the retry budget.
  #[error(transparent)]
  Api(#[from] ApiError),

  /// A submission is already in flight.
  #[error("previous entry still in progress")]
  Busy,
}

/// A mood scale that breaks its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaleError {
  #[error("mood scale is empty")]
  Empty,

  #[error("mood label must not be empty")]
  EmptyLabel,

  #[error("duplicate mood label '{0}'")]
  DuplicateLabel(String),

  #[error("mood '{label}' has value {value}, expected 1..=5")]
  OutOfRange { label: String, value: u8 },

  #[error("mood values must strictly increase; '{label}' has value {value}")]
  NotMonotonic { label: String, value: u8 },
}
