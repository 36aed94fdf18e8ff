use std::time::Duration;
use tracing::info;

use super::error::MoodError;
use crate::api::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
  Success,
  Error,
  Info,
}

impl NotificationKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      NotificationKind::Success => "SUCCESS",
      NotificationKind::Error => "ERROR",
      NotificationKind::Info => "INFO",
    }
  }
}

/// Shows short-lived messages to the user.
pub trait Notifier: Send + Sync {
  fn show(&self, message: &str, kind: NotificationKind, duration: Duration);
}

/// Used when no notifier is attached.
pub fn log_notification(message: &str, kind: NotificationKind) {
  info!("{}: {}", kind.as_str(), message);
}

/// User-facing text for an error, chosen by its kind.
pub fn error_message(err: &MoodError) -> String {
  match err {
    MoodError::Validation(reason) => format!("Invalid mood entry: {}", reason),
    MoodError::Busy => "Please wait, your previous entry is still saving.".to_string(),
    MoodError::Api(api) => match api.kind {
      ErrorKind::Network => "Network error. Please check your connection.".to_string(),
      ErrorKind::Unauthorized => "Your session has expired. Please log in again.".to_string(),
      ErrorKind::RateLimited => "Too many requests. Please wait a moment.".to_string(),
      ErrorKind::Client | ErrorKind::Server | ErrorKind::Decode => {
        "Something went wrong. Please try again later.".to_string()
      }
    },
  }
}
