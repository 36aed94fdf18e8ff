//! Rebuilds the fixed seven-day view from whatever the server returned.

use chrono::{DateTime, Duration, Local, NaiveDate};
use tracing::warn;

use crate::api::HistoryRecord;

/// Number of calendar days in a series, ending today.
pub const SERIES_DAYS: usize = 7;

/// One calendar day of the series. `value` is `None` when nothing was logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPoint {
  pub date: NaiveDate,
  pub label: String,
  pub value: Option<u8>,
}

/// Seven consecutive days, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DaySeries {
  pub points: Vec<DayPoint>,
}

impl DaySeries {
  pub fn labels(&self) -> Vec<String> {
    self.points.iter().map(|p| p.label.clone()).collect()
  }

  pub fn values(&self) -> Vec<Option<u8>> {
    self.points.iter().map(|p| p.value).collect()
  }
}

/// The derived series plus the untouched input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedHistory {
  pub series: DaySeries,
  pub raw: Vec<HistoryRecord>,
}

/// Build the series for `today - 6 ..= today`.
///
/// For each day the first record in input order that falls on that day
/// wins; later records for the same day are ignored.
pub fn process_history(raw: &[HistoryRecord], today: NaiveDate) -> ProcessedHistory {
  let days: Vec<Option<NaiveDate>> = raw
    .iter()
    .map(|record| {
      let day = record_day(&record.date);
      if day.is_none() {
        warn!("Skipping history record with unparseable date '{}'", record.date);
      }
      day
    })
    .collect();

  let mut points = Vec::with_capacity(SERIES_DAYS);
  for offset in (0..SERIES_DAYS).rev() {
    let date = today - Duration::days(offset as i64);
    let value = raw
      .iter()
      .zip(&days)
      .find(|(_, day)| **day == Some(date))
      .map(|(record, _)| record.value);

    points.push(DayPoint {
      date,
      label: day_label(date),
      value,
    });
  }

  ProcessedHistory {
    series: DaySeries { points },
    raw: raw.to_vec(),
  }
}

/// Calendar day of a record, in local time for full timestamps.
fn record_day(date: &str) -> Option<NaiveDate> {
  let date = date.trim();
  if let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
    return Some(day);
  }
  DateTime::parse_from_rfc3339(date)
    .ok()
    .map(|instant| instant.with_timezone(&Local).date_naive())
}

fn day_label(date: NaiveDate) -> String {
  date.format("%a %d").to_string()
}
