use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::mood::MoodScale;
use crate::ui::chart::mood_color;

/// Draw the row of moods selectable with the number keys
pub fn draw_mood_picker(frame: &mut Frame, area: Rect, scale: &MoodScale, submitting: bool) {
  let mut spans = vec![Span::raw(" ")];

  for (i, mood) in scale.iter().enumerate() {
    spans.push(Span::styled(
      format!("<{}>", i + 1),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {} {}   ", mood.glyph, mood.label),
      Style::default().fg(mood_color(&mood.color)),
    ));
  }

  if submitting {
    spans.push(Span::styled("saving...", Style::default().fg(Color::DarkGray)));
  }

  frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
