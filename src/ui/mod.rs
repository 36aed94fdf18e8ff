pub mod chart;
pub mod components;
pub mod renderfns;
pub mod status;

use crate::app::App;
use ratatui::prelude::*;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(8),    // Chart
      Constraint::Length(1), // Mood picker
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  let tracker = app.tracker();
  let client = tracker.client();
  let latest = tracker.latest_entry();

  renderfns::draw_header(
    frame,
    chunks[0],
    client.base_url(),
    client.has_token(),
    latest.as_ref(),
    tracker.scale(),
  );

  let chart = app.chart();
  chart::draw_mood_chart(
    frame,
    chunks[1],
    chart.as_ref(),
    tracker.scale(),
    app.is_loading(),
  );

  renderfns::draw_mood_picker(
    frame,
    chunks[2],
    tracker.scale(),
    tracker.submission_state().is_submitting(),
  );

  status::draw_status_bar(frame, chunks[3], app.status());

  if app.command().is_active() {
    app.command().render_overlay(frame, chunks[1]);
  }
}
