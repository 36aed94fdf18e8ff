use reqwest::StatusCode;
use thiserror::Error;

/// Category of an API failure, decided where the failure is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// No response: connection refused, DNS, timeout, bad URL
  Network,
  /// 401 or 403
  Unauthorized,
  /// 429
  RateLimited,
  /// Any other 4xx
  Client,
  /// 5xx
  Server,
  /// Success status but the body was not the JSON we expected
  Decode,
}

impl ErrorKind {
  /// Classify a non-success HTTP status.
  pub fn from_status(status: u16) -> Self {
    match status {
      401 | 403 => ErrorKind::Unauthorized,
      429 => ErrorKind::RateLimited,
      400..=499 => ErrorKind::Client,
      _ => ErrorKind::Server,
    }
  }
}

/// Failure of a single API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
  pub kind: ErrorKind,
  pub status: Option<u16>,
  pub message: String,
}

impl ApiError {
  pub fn network(message: impl Into<String>) -> Self {
    Self {
      kind: ErrorKind::Network,
      status: None,
      message: message.into(),
    }
  }

  pub fn decode(message: impl Into<String>) -> Self {
    Self {
      kind: ErrorKind::Decode,
      status: None,
      message: message.into(),
    }
  }

  /// Build an error for a non-success response.
  ///
  /// Prefers the message the server put in its JSON body (`message`, `msg`
  /// or `error`), falling back to the canonical status text.
  pub fn from_response(status: u16, body: &[u8]) -> Self {
    let message = server_message(body).unwrap_or_else(|| status_text(status));
    Self {
      kind: ErrorKind::from_status(status),
      status: Some(status),
      message,
    }
  }
}

fn server_message(body: &[u8]) -> Option<String> {
  let value: serde_json::Value = serde_json::from_slice(body).ok()?;
  ["message", "msg", "error"]
    .iter()
    .find_map(|field| value.get(field).and_then(|v| v.as_str()))
    .filter(|s| !s.is_empty())
    .map(String::from)
}

fn status_text(status: u16) -> String {
  StatusCode::from_u16(status)
    .ok()
    .and_then(|s| s.canonical_reason())
    .map(String::from)
    .unwrap_or_else(|| format!("HTTP error {}", status))
}
