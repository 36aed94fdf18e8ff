//! Status bar notifications.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::mood::{NotificationKind, Notifier};

#[derive(Debug, Clone)]
struct Notice {
  message: String,
  kind: NotificationKind,
  expires_at: Instant,
}

/// Notifier that shows the latest message in the status bar until it
/// expires.
#[derive(Debug, Clone, Default)]
pub struct StatusBar {
  notice: Arc<Mutex<Option<Notice>>>,
}

impl StatusBar {
  pub fn new() -> Self {
    Self::default()
  }

  /// Message still on screen, if any.
  pub fn current(&self) -> Option<(String, NotificationKind)> {
    let mut notice = self.notice.lock().unwrap_or_else(PoisonError::into_inner);
    if notice.as_ref().is_some_and(|n| Instant::now() >= n.expires_at) {
      *notice = None;
    }
    notice.as_ref().map(|n| (n.message.clone(), n.kind))
  }
}

impl Notifier for StatusBar {
  fn show(&self, message: &str, kind: NotificationKind, duration: Duration) {
    *self.notice.lock().unwrap_or_else(PoisonError::into_inner) = Some(Notice {
      message: message.to_string(),
      kind,
      expires_at: Instant::now() + duration,
    });
  }
}

fn kind_color(kind: NotificationKind) -> Color {
  match kind {
    NotificationKind::Success => Color::Green,
    NotificationKind::Error => Color::Red,
    NotificationKind::Info => Color::Cyan,
  }
}

/// Draw the status line: the active notification, or key hints.
pub fn draw_status_bar(frame: &mut Frame, area: Rect, status: &StatusBar) {
  let paragraph = match status.current() {
    Some((message, kind)) => Paragraph::new(format!(" {}", message))
      .style(Style::default().fg(kind_color(kind)).bold()),
    None => Paragraph::new(" 1-5:log mood  r:refresh  :command  q:quit")
      .style(Style::default().fg(Color::DarkGray)),
  };

  frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_latest_notice_wins() {
    let bar = StatusBar::new();
    bar.show("first", NotificationKind::Info, Duration::from_secs(60));
    bar.show("second", NotificationKind::Error, Duration::from_secs(60));

    assert_eq!(
      bar.current(),
      Some(("second".to_string(), NotificationKind::Error))
    );
  }

  #[test]
  fn test_notice_expires() {
    let bar = StatusBar::new();
    bar.show("gone", NotificationKind::Success, Duration::ZERO);

    assert_eq!(bar.current(), None);
  }
}
