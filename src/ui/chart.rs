//! Mood line chart and the mount points it is drawn into.

use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use crate::mood::scale::{MoodScale, MAX_VALUE, MIN_VALUE};

/// Mount point the mood history chart is drawn into.
pub const MOOD_CHART_MOUNT: &str = "moodChart";

/// One rendered chart: day labels and their values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodChart {
  pub labels: Vec<String>,
  pub points: Vec<Option<u8>>,
}

impl MoodChart {
  /// Plot coordinates for the present values. Absent days are skipped so
  /// the line runs straight across gaps.
  pub fn data(&self) -> Vec<(f64, f64)> {
    self
      .points
      .iter()
      .enumerate()
      .filter_map(|(i, value)| value.map(|v| (i as f64, f64::from(v))))
      .collect()
  }

  /// True when no day in the window has a value.
  pub fn is_empty(&self) -> bool {
    self.points.iter().all(Option::is_none)
  }
}

/// Registry of named chart slots, shared between the tracker and the UI.
///
/// Rendering into a slot replaces whatever chart was there. Rendering into
/// a slot that was never mounted does nothing.
#[derive(Debug, Clone, Default)]
pub struct ChartBoard {
  mounts: Arc<Mutex<HashMap<String, Option<MoodChart>>>>,
}

impl ChartBoard {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_mount(name: &str) -> Self {
    let board = Self::new();
    board.mount(name);
    board
  }

  pub fn mount(&self, name: &str) {
    self
      .mounts
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .entry(name.to_string())
      .or_insert(None);
  }

  /// Replace the chart on `mount`. Returns false if the mount is missing.
  pub fn render(&self, mount: &str, labels: &[String], points: &[Option<u8>]) -> bool {
    let mut mounts = self.mounts.lock().unwrap_or_else(PoisonError::into_inner);
    match mounts.get_mut(mount) {
      Some(slot) => {
        *slot = Some(MoodChart {
          labels: labels.to_vec(),
          points: points.to_vec(),
        });
        true
      }
      None => {
        debug!("Chart mount '{}' not present, skipping render", mount);
        false
      }
    }
  }

  pub fn chart(&self, mount: &str) -> Option<MoodChart> {
    self
      .mounts
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .get(mount)
      .cloned()
      .flatten()
  }
}

/// Parse a `#rrggbb` color, falling back to cyan.
pub fn mood_color(hex: &str) -> Color {
  Color::from_str(hex).unwrap_or(Color::Cyan)
}

/// Draw a mood chart with a fixed 1..=5 axis labelled by mood name.
pub fn draw_mood_chart(
  frame: &mut Frame,
  area: Rect,
  chart: Option<&MoodChart>,
  scale: &MoodScale,
  loading: bool,
) {
  let title = if loading {
    " Mood, last 7 days (loading...) "
  } else {
    " Mood, last 7 days "
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let chart = match chart {
    Some(chart) if !chart.labels.is_empty() => chart,
    _ => {
      let paragraph = Paragraph::new("No mood history to show.")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }
  };

  let block = if chart.is_empty() {
    block.title_bottom(Line::from(" nothing logged this week ").centered())
  } else {
    block
  };

  let data = chart.data();
  let line_color = data
    .last()
    .and_then(|(_, v)| scale.label_for(*v as u8))
    .and_then(|label| scale.get(label))
    .map(|m| mood_color(&m.color))
    .unwrap_or(Color::Cyan);

  let datasets = vec![
    Dataset::default()
      .marker(Marker::Braille)
      .graph_type(GraphType::Line)
      .style(Style::default().fg(line_color))
      .data(&data),
    Dataset::default()
      .marker(Marker::Dot)
      .graph_type(GraphType::Scatter)
      .style(Style::default().fg(Color::White))
      .data(&data),
  ];

  let x_labels: Vec<Line> = chart
    .labels
    .iter()
    .map(|l| Line::from(l.as_str()))
    .collect();
  let x_max = chart.labels.len().saturating_sub(1).max(1) as f64;

  let y_labels: Vec<Line> = (MIN_VALUE..=MAX_VALUE)
    .map(|v| Line::from(scale.label_for(v).unwrap_or("").to_string()))
    .collect();

  let widget = Chart::new(datasets)
    .block(block)
    .x_axis(
      Axis::default()
        .style(Style::default().fg(Color::DarkGray))
        .bounds([0.0, x_max])
        .labels(x_labels),
    )
    .y_axis(
      Axis::default()
        .style(Style::default().fg(Color::DarkGray))
        .bounds([f64::from(MIN_VALUE), f64::from(MAX_VALUE)])
        .labels(y_labels),
    );

  frame.render_widget(widget, area);
}
