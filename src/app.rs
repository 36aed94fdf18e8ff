use crate::api::HttpTransport;
use crate::commands::{self, Action};
use crate::event::{Event, EventHandler, MoodEvent};
use crate::mood::{MoodTracker, NotificationKind, Notifier};
use crate::ui::chart::{ChartBoard, MoodChart, MOOD_CHART_MOUNT};
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui;
use crate::ui::status::StatusBar;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Main application state
pub struct App {
  tracker: Arc<MoodTracker<HttpTransport>>,

  /// Chart mounts shared with the tracker
  charts: ChartBoard,

  /// Notification sink shared with the tracker
  status: StatusBar,

  /// Command line (after pressing :)
  command: CommandInput,

  /// A history fetch is in flight
  loading: bool,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  should_quit: bool,
}

impl App {
  pub fn new(tracker: MoodTracker<HttpTransport>, charts: ChartBoard, status: StatusBar) -> Self {
    let (tx, _rx) = mpsc::unbounded_channel();
    let command = CommandInput::new(tracker.scale().clone());

    Self {
      tracker: Arc::new(tracker),
      charts,
      status,
      command,
      loading: false,
      event_tx: tx,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.main_loop(&mut terminal).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn main_loop(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
  ) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(250));
    self.event_tx = events.sender();

    self.refresh(false);

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }

    Ok(())
  }

  fn refresh(&mut self, force: bool) {
    self.loading = true;
    let tracker = Arc::clone(&self.tracker);
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      let event = match tracker.fetch_mood_history(force).await {
        Ok(series) => MoodEvent::HistoryLoaded(series),
        Err(e) => MoodEvent::Failed(e.to_string()),
      };
      let _ = tx.send(Event::Mood(event));
    });
  }

  /// Submit in the background. The submit ends with a forced history
  /// refresh, so the chart shows as loading until it reports back.
  fn log_mood(&mut self, mood: String, value: String) {
    self.loading = true;
    let tracker = Arc::clone(&self.tracker);
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      let event = match tracker.log_mood(&mood, &value).await {
        Ok(entry) => MoodEvent::Logged(entry),
        Err(e) => MoodEvent::Failed(e.to_string()),
      };
      let _ = tx.send(Event::Mood(event));
    });
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {}
      Event::Mood(mood_event) => self.handle_mood_event(mood_event),
    }
  }

  fn handle_mood_event(&mut self, event: MoodEvent) {
    match event {
      MoodEvent::Logged(entry) => {
        info!("Entry confirmed: {} ({})", entry.mood, entry.value);
        self.loading = false;
      }
      MoodEvent::HistoryLoaded(series) => {
        let logged_days = series.values().iter().flatten().count();
        info!("History refreshed, {} days with entries", logged_days);
        self.loading = false;
      }
      MoodEvent::Failed(msg) => {
        warn!("Background task failed: {}", msg);
        self.loading = false;
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    match self.command.handle_key(key) {
      KeyResult::Event(CommandEvent::Submitted(line)) => {
        self.execute(commands::parse(&line));
        return;
      }
      KeyResult::Event(CommandEvent::Cancelled) | KeyResult::Handled => return,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('q') => self.should_quit = true,
      KeyCode::Char('r') => self.execute(Action::Refresh),
      KeyCode::Char(c @ '1'..='9') => {
        let index = c as usize - '1' as usize;
        let action = self.tracker.scale().at(index).map(|mood| Action::Log {
          mood: mood.label.clone(),
          value: mood.value.to_string(),
        });
        if let Some(action) = action {
          self.execute(action);
        }
      }
      _ => {}
    }
  }

  fn execute(&mut self, action: Action) {
    match action {
      Action::Log { mood, value } => self.log_mood(mood, value),
      Action::Refresh => self.refresh(true),
      Action::Quit => self.should_quit = true,
      Action::Unknown(line) => {
        self.status.show(
          &format!("Unknown command: {}", line),
          NotificationKind::Info,
          Duration::from_secs(3),
        );
      }
    }
  }

  // Accessors for UI rendering

  pub fn tracker(&self) -> &MoodTracker<HttpTransport> {
    &self.tracker
  }

  pub fn chart(&self) -> Option<MoodChart> {
    self.charts.chart(MOOD_CHART_MOUNT)
  }

  pub fn status(&self) -> &StatusBar {
    &self.status
  }

  pub fn command(&self) -> &CommandInput {
    &self.command
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::{ApiClient, CredentialStore};
  use crate::mood::TrackerConfig;
  use url::Url;

  fn app() -> App {
    let client = ApiClient::new(
      HttpTransport::new().unwrap(),
      Url::parse("http://127.0.0.1:9").unwrap(),
      CredentialStore::Fixed(None),
    );
    let charts = ChartBoard::with_mount(MOOD_CHART_MOUNT);
    let tracker = MoodTracker::new(client, TrackerConfig::default(), charts.clone());
    App::new(tracker, charts, StatusBar::new())
  }

  fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
  }

  #[tokio::test]
  async fn test_logging_a_mood_marks_chart_loading() {
    let mut app = app();
    assert!(!app.is_loading());

    press(&mut app, KeyCode::Char('4'));
    assert!(app.is_loading());

    app.handle_mood_event(MoodEvent::Failed("connection refused".to_string()));
    assert!(!app.is_loading());
  }

  #[tokio::test]
  async fn test_command_line_quit() {
    let mut app = app();
    press(&mut app, KeyCode::Char(':'));
    press(&mut app, KeyCode::Char('q'));
    assert!(!app.should_quit);

    press(&mut app, KeyCode::Enter);
    assert!(app.should_quit);
  }

  #[test]
  fn test_unknown_command_shows_notice() {
    let mut app = app();
    app.execute(Action::Unknown("dance".to_string()));

    assert_eq!(
      app.status().current(),
      Some(("Unknown command: dance".to_string(), NotificationKind::Info))
    );
  }
}
