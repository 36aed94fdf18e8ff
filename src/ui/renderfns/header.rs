use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use url::Url;

use crate::api::MoodEntry;
use crate::mood::MoodScale;

/// Draw the header bar with app name, server, session and latest mood
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  server: &Url,
  signed_in: bool,
  latest: Option<&MoodEntry>,
  scale: &MoodScale,
) {
  let (session, session_style) = if signed_in {
    ("signed in", Style::default().fg(Color::Green))
  } else {
    ("not signed in", Style::default().fg(Color::Red))
  };

  let mut spans = vec![
    Span::styled(" mindwell ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", server_label(server)),
      Style::default().fg(Color::White),
    ),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", session), session_style),
  ];

  if let Some(entry) = latest {
    let glyph = scale
      .get(&entry.mood)
      .map(|m| m.glyph.as_str())
      .unwrap_or("");
    spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(
      format!(" latest: {} {} ", glyph, entry.mood),
      Style::default().fg(Color::Yellow).bold(),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

/// Host and non-default port of the server
fn server_label(url: &Url) -> String {
  match (url.host_str(), url.port()) {
    (Some(host), Some(port)) => format!("{}:{}", host, port),
    (Some(host), None) => host.to_string(),
    _ => url.as_str().to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_server_label() {
    let url = |s: &str| Url::parse(s).unwrap();
    assert_eq!(server_label(&url("https://mindwell.example.com/api")), "mindwell.example.com");
    assert_eq!(server_label(&url("http://localhost:5000")), "localhost:5000");
    assert_eq!(server_label(&url("https://example.com:443")), "example.com");
  }
}
