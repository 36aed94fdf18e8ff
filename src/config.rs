use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::api::{RetryMode, RetryPolicy};
use crate::mood::{MoodScale, TrackerConfig};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub api: ApiConfig,
  pub tracker: TrackerSettings,
  /// Replaces the built-in mood scale when set
  pub moods: Option<MoodScale>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  pub base_url: String,
  pub mood_endpoint: String,
  pub history_endpoint: String,
  pub login_endpoint: String,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: "http://localhost:5000".to_string(),
      mood_endpoint: "/api/mood".to_string(),
      history_endpoint: "/api/mood/history".to_string(),
      login_endpoint: "/api/auth/login".to_string(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
  pub retry_attempts: u32,
  pub retry_base_delay_ms: u64,
  pub retry_mode: RetryMode,
  pub cache_ttl_secs: u64,
  pub notification_ms: u64,
}

impl Default for TrackerSettings {
  fn default() -> Self {
    Self {
      retry_attempts: 3,
      retry_base_delay_ms: 1000,
      retry_mode: RetryMode::StatusAware,
      cache_ttl_secs: 300,
      notification_ms: 3000,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./mindwell.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/mindwell/config.yaml
  ///
  /// Without any file the built-in defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("mindwell.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("mindwell").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    config.base_url()?;
    Ok(config)
  }

  pub fn base_url(&self) -> Result<Url> {
    Url::parse(&self.api.base_url)
      .map_err(|e| eyre!("Invalid api.base_url '{}': {}", self.api.base_url, e))
  }

  pub fn tracker_config(&self) -> TrackerConfig {
    let settings = &self.tracker;
    TrackerConfig {
      retry: RetryPolicy {
        attempts: settings.retry_attempts,
        base_delay: Duration::from_millis(settings.retry_base_delay_ms),
        mode: settings.retry_mode,
      },
      cache_ttl: Duration::from_secs(settings.cache_ttl_secs),
      notification_duration: Duration::from_millis(settings.notification_ms),
      mood_endpoint: self.api.mood_endpoint.clone(),
      history_endpoint: self.api.history_endpoint.clone(),
      scale: self.moods.clone().unwrap_or_default(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_file_uses_defaults() {
    let config = Config::parse("{}").unwrap();
    let tracker = config.tracker_config();

    assert_eq!(config.api.base_url, "http://localhost:5000");
    assert_eq!(tracker.retry, RetryPolicy::default());
    assert_eq!(tracker.cache_ttl, Duration::from_secs(300));
    assert_eq!(tracker.notification_duration, Duration::from_millis(3000));
    assert_eq!(tracker.scale, MoodScale::default());
  }

  #[test]
  fn test_overrides() {
    let yaml = r##"
api:
  base_url: https://mindwell.example.com
  history_endpoint: /api/v2/mood/history
tracker:
  retry_attempts: 5
  retry_base_delay_ms: 0
  retry_mode: uniform
moods:
  - { label: low, value: 1, glyph: "v", color: "#333333" }
  - { label: high, value: 5, glyph: "^", color: "#eeeeee" }
"##;
    let config = Config::parse(yaml).unwrap();
    let tracker = config.tracker_config();

    assert_eq!(config.base_url().unwrap().host_str(), Some("mindwell.example.com"));
    assert_eq!(tracker.history_endpoint, "/api/v2/mood/history");
    assert_eq!(tracker.mood_endpoint, "/api/mood");
    assert_eq!(
      tracker.retry,
      RetryPolicy {
        attempts: 5,
        base_delay: Duration::ZERO,
        mode: RetryMode::Uniform,
      }
    );
    assert_eq!(tracker.scale.label_for(5), Some("high"));
  }

  #[test]
  fn test_invalid_scale_is_rejected() {
    let yaml = "moods:\n  - { label: a, value: 3, glyph: x, color: '#000000' }\n  - { label: b, value: 2, glyph: y, color: '#000000' }\n";
    assert!(Config::parse(yaml).is_err());
  }

  #[test]
  fn test_invalid_base_url_is_rejected() {
    assert!(Config::parse("api:\n  base_url: not a url\n").is_err());
  }

  #[test]
  fn test_missing_explicit_path_errors() {
    let err = Config::load(Some(Path::new("/definitely/not/here.yaml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }
}
