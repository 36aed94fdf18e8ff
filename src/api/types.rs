//! Wire types for the MindWell REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One mood observation as submitted by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
  pub mood: String,
  pub value: u8,
  pub timestamp: DateTime<Utc>,
}

impl MoodEntry {
  /// Entry stamped with the current time.
  pub fn now(mood: impl Into<String>, value: u8) -> Self {
    Self {
      mood: mood.into(),
      value,
      timestamp: Utc::now(),
    }
  }
}

/// Describes the submitting client; sent alongside every entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
  pub user_agent: String,
  pub platform: String,
  pub language: String,
}

impl ClientInfo {
  pub fn current() -> Self {
    let language = std::env::var("LANG")
      .ok()
      .and_then(|lang| lang.split('.').next().map(|l| l.replace('_', "-")))
      .filter(|l| !l.is_empty())
      .unwrap_or_else(|| "en-US".to_string());

    Self {
      user_agent: concat!("mindwell/", env!("CARGO_PKG_VERSION")).to_string(),
      platform: std::env::consts::OS.to_string(),
      language,
    }
  }
}

/// Body of `POST` to the mood endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodSubmission {
  pub mood: String,
  pub value: u8,
  pub timestamp: DateTime<Utc>,
  pub client_info: ClientInfo,
}

impl From<&MoodEntry> for MoodSubmission {
  fn from(entry: &MoodEntry) -> Self {
    Self {
      mood: entry.mood.clone(),
      value: entry.value,
      timestamp: entry.timestamp,
      client_info: ClientInfo::current(),
    }
  }
}

/// One element of the history endpoint's response.
///
/// `date` is either a calendar date (`2024-01-10`) or an RFC 3339 instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
  pub date: String,
  pub value: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
  pub email: String,
  pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
  pub token: String,
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn test_submission_body_shape() {
    let entry = MoodEntry {
      mood: "good".to_string(),
      value: 4,
      timestamp: Utc.with_ymd_and_hms(2024, 1, 10, 8, 30, 0).unwrap(),
    };

    let body = serde_json::to_value(MoodSubmission::from(&entry)).unwrap();

    assert_eq!(body["mood"], "good");
    assert_eq!(body["value"], 4);
    assert_eq!(body["timestamp"], "2024-01-10T08:30:00Z");
    assert!(body["clientInfo"]["userAgent"]
      .as_str()
      .unwrap()
      .starts_with("mindwell/"));
    assert!(body["clientInfo"].get("platform").is_some());
  }

  #[test]
  fn test_history_record_parses() {
    let records: Vec<HistoryRecord> =
      serde_json::from_str(r#"[{"date":"2024-01-10","value":4},{"date":"2024-01-09T22:00:00Z","value":2}]"#)
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].value, 4);
    assert_eq!(records[1].date, "2024-01-09T22:00:00Z");
  }
}
