//! Orchestrates mood submission and history refresh.

use chrono::{Local, NaiveDate};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::error::MoodError;
use super::history::{process_history, DaySeries};
use super::notify::{error_message, log_notification, NotificationKind, Notifier};
use super::scale::{MoodScale, MAX_VALUE, MIN_VALUE};
use crate::api::types::MoodSubmission;
use crate::api::{ApiClient, HistoryRecord, MoodEntry, RequestOptions, RetryPolicy, Transport};
use crate::cache::{TtlCache, DEFAULT_TTL};
use crate::ui::chart::{ChartBoard, MOOD_CHART_MOUNT};

/// Cache key of the processed history series.
pub const HISTORY_CACHE_KEY: &str = "mood_history";

/// Everything the tracker needs to know, passed in explicitly.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
  /// Defaults to 3 attempts, 1000 ms linear backoff, status-aware.
  pub retry: RetryPolicy,
  /// Defaults to 5 minutes.
  pub cache_ttl: Duration,
  /// How long notifications stay up. Defaults to 3000 ms.
  pub notification_duration: Duration,
  /// Defaults to `/api/mood`.
  pub mood_endpoint: String,
  /// Defaults to `/api/mood/history`.
  pub history_endpoint: String,
  pub scale: MoodScale,
}

impl Default for TrackerConfig {
  fn default() -> Self {
    Self {
      retry: RetryPolicy::default(),
      cache_ttl: DEFAULT_TTL,
      notification_duration: Duration::from_millis(3000),
      mood_endpoint: "/api/mood".to_string(),
      history_endpoint: "/api/mood/history".to_string(),
      scale: MoodScale::default(),
    }
  }
}

/// Where the current submission stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
  #[default]
  Idle,
  /// Sent, waiting for the server. New submissions are rejected.
  Submitting(MoodEntry),
  /// Server accepted the entry.
  Confirmed(MoodEntry),
  /// Server rejected the entry; the optimistic update was rolled back.
  Failed { entry: MoodEntry, reason: String },
}

impl SubmissionState {
  pub fn is_submitting(&self) -> bool {
    matches!(self, SubmissionState::Submitting(_))
  }
}

/// Validates, submits and charts mood entries.
pub struct MoodTracker<T> {
  client: ApiClient<T>,
  config: TrackerConfig,
  cache: Mutex<TtlCache<DaySeries>>,
  state: Mutex<SubmissionState>,
  latest: Mutex<Option<MoodEntry>>,
  charts: ChartBoard,
  notifier: Option<Arc<dyn Notifier>>,
  today: fn() -> NaiveDate,
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
  mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn local_today() -> NaiveDate {
  Local::now().date_naive()
}

impl<T: Transport> MoodTracker<T> {
  pub fn new(client: ApiClient<T>, config: TrackerConfig, charts: ChartBoard) -> Self {
    let client = client.with_retry(config.retry.clone());
    Self {
      client,
      cache: Mutex::new(TtlCache::new(config.cache_ttl)),
      config,
      state: Mutex::new(SubmissionState::Idle),
      latest: Mutex::new(None),
      charts,
      notifier: None,
      today: local_today,
    }
  }

  pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
    self.notifier = Some(notifier);
    self
  }

  /// Override how "today" is determined.
  #[cfg(test)]
  pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
    self.today = today;
    self
  }

  pub fn scale(&self) -> &MoodScale {
    &self.config.scale
  }

  pub fn client(&self) -> &ApiClient<T> {
    &self.client
  }

  pub fn submission_state(&self) -> SubmissionState {
    lock(&self.state).clone()
  }

  /// Most recent entry, including one still being submitted.
  pub fn latest_entry(&self) -> Option<MoodEntry> {
    lock(&self.latest).clone()
  }

  #[cfg(test)]
  pub fn cached_series(&self) -> Option<DaySeries> {
    lock(&self.cache).get(HISTORY_CACHE_KEY)
  }

  /// Validate and submit a mood, then refresh the history chart.
  ///
  /// Errors are shown through the notifier and also returned.
  pub async fn log_mood(&self, mood: &str, value: &str) -> Result<MoodEntry, MoodError> {
    match self.submit(mood, value).await {
      Ok(entry) => {
        let glyph = self
          .config
          .scale
          .get(&entry.mood)
          .map(|m| m.glyph.as_str())
          .unwrap_or("");
        self.notify(
          &format!("Mood logged: {} {}", glyph, entry.mood),
          NotificationKind::Success,
        );
        Ok(entry)
      }
      Err(err) => {
        self.notify(&error_message(&err), NotificationKind::Error);
        Err(err)
      }
    }
  }

  async fn submit(&self, mood: &str, value: &str) -> Result<MoodEntry, MoodError> {
    let entry = {
      let mut state = lock(&self.state);
      if state.is_submitting() {
        return Err(MoodError::Busy);
      }
      let value = self.validate(mood, value)?;
      let entry = MoodEntry::now(mood.trim(), value);
      *state = SubmissionState::Submitting(entry.clone());
      entry
    };

    let previous = lock(&self.latest).replace(entry.clone());

    let result = match RequestOptions::post(&MoodSubmission::from(&entry)) {
      Ok(options) => {
        self
          .client
          .retry_request::<Value>(&self.config.mood_endpoint, &options)
          .await
      }
      Err(err) => Err(err),
    };

    if let Err(err) = result {
      warn!("Mood submission failed: {}", err);
      *lock(&self.latest) = previous;
      *lock(&self.state) = SubmissionState::Failed {
        entry,
        reason: err.to_string(),
      };
      return Err(err.into());
    }

    info!("Logged mood {} ({})", entry.mood, entry.value);
    lock(&self.cache).clear();

    // Still Submitting during the refresh, so the guard covers the whole call
    let refreshed = self.load_history(true).await;
    *lock(&self.state) = SubmissionState::Confirmed(entry.clone());
    refreshed?;
    Ok(entry)
  }

  fn validate(&self, mood: &str, value: &str) -> Result<u8, MoodError> {
    let mood = mood.trim();
    if mood.is_empty() {
      return Err(MoodError::Validation("mood is required".to_string()));
    }
    if self.config.scale.get(mood).is_none() {
      return Err(MoodError::Validation(format!("unknown mood '{}'", mood)));
    }

    let value: i64 = value
      .trim()
      .parse()
      .map_err(|_| MoodError::Validation(format!("value '{}' is not a number", value.trim())))?;
    if !(i64::from(MIN_VALUE)..=i64::from(MAX_VALUE)).contains(&value) {
      return Err(MoodError::Validation(format!(
        "value {} is outside {}..={}",
        value, MIN_VALUE, MAX_VALUE
      )));
    }

    Ok(value as u8)
  }

  /// Load the seven-day series and draw it.
  ///
  /// Serves the cached series unless `force_refresh` is set or it expired.
  pub async fn fetch_mood_history(&self, force_refresh: bool) -> Result<DaySeries, MoodError> {
    let result = self.load_history(force_refresh).await;
    if let Err(err) = &result {
      self.notify(&error_message(err), NotificationKind::Error);
    }
    result
  }

  async fn load_history(&self, force_refresh: bool) -> Result<DaySeries, MoodError> {
    if !force_refresh {
      let cached = lock(&self.cache).get(HISTORY_CACHE_KEY);
      if let Some(series) = cached {
        debug!("Mood history served from cache");
        self.render(&series);
        return Ok(series);
      }
    }

    debug!("Fetching mood history from server");
    let raw: Vec<HistoryRecord> = match self
      .client
      .retry_request(&self.config.history_endpoint, &RequestOptions::get())
      .await
    {
      Ok(raw) => raw,
      Err(err) => {
        warn!("Mood history fetch failed: {}", err);
        self.charts.render(MOOD_CHART_MOUNT, &[], &[]);
        return Err(err.into());
      }
    };

    let processed = process_history(&raw, (self.today)());
    info!("Loaded {} mood history records", processed.raw.len());

    lock(&self.cache).set(HISTORY_CACHE_KEY, processed.series.clone());
    self.render(&processed.series);
    Ok(processed.series)
  }

  fn render(&self, series: &DaySeries) {
    self
      .charts
      .render(MOOD_CHART_MOUNT, &series.labels(), &series.values());
  }

  fn notify(&self, message: &str, kind: NotificationKind) {
    match &self.notifier {
      Some(notifier) => notifier.show(message, kind, self.config.notification_duration),
      None => log_notification(message, kind),
    }
  }
}
