//! The `:` command line.
//!
//! Completes command names while the first word is typed. After `log` it
//! completes mood labels from the active scale, each candidate carrying the
//! mood's value so a finished line can be submitted straight away.

use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::commands::{self, Command};
use crate::mood::MoodScale;
use crate::ui::chart::mood_color;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

const MAX_VISIBLE: usize = 8;

/// Events emitted by command input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
  /// Command submitted
  Submitted(String),
  /// Command cancelled
  Cancelled,
}

/// One completion candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
  /// The whole line once this candidate is taken
  pub line: String,
  pub label: String,
  pub detail: String,
  pub color: Color,
  /// `line` still needs arguments before it can be submitted
  pub needs_more: bool,
}

impl Completion {
  fn command(cmd: &Command) -> Self {
    let needs_more = cmd.name == "log";
    Self {
      line: if needs_more {
        format!("{} ", cmd.name)
      } else {
        cmd.name.to_string()
      },
      label: cmd.name.to_string(),
      detail: cmd.description.to_string(),
      color: Color::Cyan,
      needs_more,
    }
  }
}

/// Command line with command and mood completion.
#[derive(Debug, Clone)]
pub struct CommandInput {
  input: TextInput,
  scale: MoodScale,
  active: bool,
  selected: usize,
}

impl CommandInput {
  pub fn new(scale: MoodScale) -> Self {
    Self {
      input: TextInput::default(),
      scale,
      active: false,
      selected: 0,
    }
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  fn open(&mut self) {
    self.active = true;
    self.input.clear();
    self.selected = 0;
  }

  fn close(&mut self) {
    self.active = false;
    self.input.clear();
    self.selected = 0;
  }

  /// Candidates for the line as typed so far.
  pub fn completions(&self) -> Vec<Completion> {
    let line = self.input.value();
    let mut words = line.split_whitespace();
    let head = words.next().unwrap_or("");
    let rest: Vec<&str> = words.collect();

    if rest.is_empty() && !line.ends_with(char::is_whitespace) {
      return commands::get_suggestions(head)
        .into_iter()
        .map(Completion::command)
        .collect();
    }

    if !commands::find(head).is_some_and(|c| c.name == "log") {
      return Vec::new();
    }

    // Only the mood word is completed; once a value is typed the line is final
    let prefix = match rest.as_slice() {
      [] => String::new(),
      [mood] => mood.to_lowercase(),
      _ => return Vec::new(),
    };

    self
      .scale
      .iter()
      .filter(|m| m.label.starts_with(&prefix))
      .map(|m| Completion {
        line: format!("log {} {}", m.label, m.value),
        label: m.label.clone(),
        detail: format!("{} {}", m.glyph, m.value),
        color: mood_color(&m.color),
        needs_more: false,
      })
      .collect()
  }

  fn selected_completion(&self) -> Option<Completion> {
    self.completions().into_iter().nth(self.selected)
  }

  fn step(&mut self, forward: bool) {
    let count = self.completions().len();
    if count == 0 {
      return;
    }
    self.selected = if forward {
      (self.selected + 1) % count
    } else {
      (self.selected + count - 1) % count
    };
  }

  fn accept(&mut self, completion: &Completion) {
    self.input.set_value(&completion.line);
    self.selected = 0;
  }

  /// Handle a key event. Call this regardless of active state; `:` opens
  /// the line.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<CommandEvent> {
    if !self.active {
      if key.code == KeyCode::Char(':') {
        self.open();
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc => {
        self.close();
        return KeyResult::Event(CommandEvent::Cancelled);
      }
      KeyCode::Enter => {
        let line = match self.selected_completion() {
          Some(completion) if completion.needs_more => {
            self.accept(&completion);
            return KeyResult::Handled;
          }
          Some(completion) => completion.line,
          None => self.input.value().trim().to_string(),
        };
        self.close();
        return KeyResult::Event(CommandEvent::Submitted(line));
      }
      KeyCode::Tab => {
        if let Some(completion) = self.selected_completion() {
          self.accept(&completion);
        }
        return KeyResult::Handled;
      }
      KeyCode::Down => {
        self.step(true);
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.step(false);
        return KeyResult::Handled;
      }
      _ => {}
    }

    match self.input.handle_key(key) {
      InputResult::Consumed => {
        self.selected = 0;
        KeyResult::Handled
      }
      InputResult::Submitted(_) | InputResult::Cancelled => KeyResult::Handled,
      InputResult::NotHandled => KeyResult::NotHandled,
    }
  }

  /// Draw the line and its completions in the top-left of `area`.
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    let completions = self.completions();
    let shown = completions.len().min(MAX_VISIBLE) as u16;

    let width = (area.width * 60 / 100).clamp(30, 60).min(area.width.saturating_sub(2));
    let height = (3 + shown).min(area.height.saturating_sub(1));
    let overlay_area = Rect::new(area.x + 1, area.y + 1, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Command ");
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(1), Constraint::Min(0)])
      .split(inner);

    let value = self.input.value();
    let input_line = Line::from(vec![
      Span::styled(":", Style::default().fg(Color::Yellow)),
      Span::raw(value.clone()),
    ]);
    frame.render_widget(Paragraph::new(input_line), chunks[0]);

    let before_cursor: String = value.chars().take(self.input.cursor_position()).collect();
    let cursor_x = chunks[0].x + 1 + Span::raw(before_cursor).width() as u16;
    frame.set_cursor_position(Position::new(
      cursor_x.min(chunks[0].right().saturating_sub(1)),
      chunks[0].y,
    ));

    if completions.is_empty() || chunks[1].height == 0 {
      return;
    }

    let items: Vec<ListItem> = completions
      .iter()
      .take(MAX_VISIBLE)
      .map(|c| {
        ListItem::new(Line::from(vec![
          Span::styled(format!("{:<12}", c.label), Style::default().fg(c.color)),
          Span::styled(c.detail.clone(), Style::default().fg(Color::DarkGray)),
        ]))
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));
    let mut state = ListState::default();
    state.select(Some(self.selected.min(MAX_VISIBLE - 1)));

    frame.render_stateful_widget(list, chunks[1], &mut state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::mood::scale::MoodAttributes;
  use crossterm::event::KeyModifiers;
  use ratatui::backend::TestBackend;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn opened(text: &str) -> CommandInput {
    let mut input = CommandInput::new(MoodScale::default());
    input.handle_key(key(KeyCode::Char(':')));
    for c in text.chars() {
      input.handle_key(key(KeyCode::Char(c)));
    }
    input
  }

  fn labels(input: &CommandInput) -> Vec<String> {
    input.completions().into_iter().map(|c| c.label).collect()
  }

  #[test]
  fn test_colon_activates() {
    let mut input = CommandInput::new(MoodScale::default());
    assert_eq!(input.handle_key(key(KeyCode::Char('x'))), KeyResult::NotHandled);
    assert_eq!(input.handle_key(key(KeyCode::Char(':'))), KeyResult::Handled);
    assert!(input.is_active());
  }

  #[test]
  fn test_enter_resolves_command_prefix() {
    let mut input = opened("ref");

    assert_eq!(
      input.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("refresh".to_string()))
    );
    assert!(!input.is_active());
  }

  #[test]
  fn test_log_completes_moods_from_scale() {
    assert_eq!(
      labels(&opened("log ")),
      vec!["terrible", "bad", "okay", "good", "great"]
    );
    assert_eq!(labels(&opened("l G")), vec!["good", "great"]);
    assert!(labels(&opened("refresh ")).is_empty());
  }

  #[test]
  fn test_enter_submits_mood_with_its_value() {
    let mut input = opened("log g");
    input.handle_key(key(KeyCode::Down));

    assert_eq!(
      input.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("log great 5".to_string()))
    );
  }

  #[test]
  fn test_enter_on_log_asks_for_a_mood() {
    let mut input = opened("lo");

    assert_eq!(input.handle_key(key(KeyCode::Enter)), KeyResult::Handled);
    assert!(input.is_active());
    assert_eq!(labels(&input).len(), 5);
  }

  #[test]
  fn test_tab_fills_selected_completion() {
    let mut input = opened("log ok");
    input.handle_key(key(KeyCode::Tab));

    assert!(input.completions().is_empty());
    assert_eq!(
      input.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("log okay 3".to_string()))
    );
  }

  #[test]
  fn test_typed_value_is_submitted_verbatim() {
    let mut input = opened("log good 2");

    assert!(input.completions().is_empty());
    assert_eq!(
      input.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("log good 2".to_string()))
    );
  }

  #[test]
  fn test_custom_scale_labels_are_offered() {
    let scale = MoodScale::new(vec![
      MoodAttributes {
        label: "low".to_string(),
        value: 1,
        glyph: "v".to_string(),
        color: "#333333".to_string(),
      },
      MoodAttributes {
        label: "high".to_string(),
        value: 5,
        glyph: "^".to_string(),
        color: "#eeeeee".to_string(),
      },
    ])
    .unwrap();
    let mut input = CommandInput::new(scale);
    input.handle_key(key(KeyCode::Char(':')));
    for c in "log h".chars() {
      input.handle_key(key(KeyCode::Char(c)));
    }

    let completions = input.completions();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].line, "log high 5");
    assert_eq!(completions[0].color, Color::Rgb(0xee, 0xee, 0xee));
  }

  #[test]
  fn test_escape_cancels() {
    let mut input = opened("lo");

    assert_eq!(
      input.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(CommandEvent::Cancelled)
    );
    assert!(!input.is_active());
  }

  #[test]
  fn test_overlay_lists_mood_glyphs() {
    let input = opened("log gr");
    let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();

    terminal
      .draw(|frame| input.render_overlay(frame, frame.area()))
      .unwrap();

    let text: String = terminal
      .backend()
      .buffer()
      .content()
      .iter()
      .map(|cell| cell.symbol())
      .collect();
    assert!(text.contains("great"));
    assert!(text.contains(":log gr"));
  }
}
