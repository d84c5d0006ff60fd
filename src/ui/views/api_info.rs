use crate::ui::view::{Shortcut, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// (method, path, description, used by this client)
const ENDPOINTS: &[(&str, &str, &str, bool)] = &[
  ("GET", "characters", "List all characters", true),
  ("GET", "characters/{id}", "Get one character by id", true),
  ("POST", "characters", "Create a character", true),
  ("PUT", "characters/{id}", "Replace a character", false),
  ("DELETE", "characters/{id}", "Delete a character", false),
];

/// (attribute, type, description)
const ATTRIBUTES: &[(&str, &str, &str)] = &[
  ("id", "number", "Unique identifier"),
  ("name", "string", "Full name"),
  ("image", "string", "Portrait URL"),
  ("gender", "string", "Male, Female or Other"),
  ("status", "string", "Alive, Dead or unknown"),
  ("occupation", "string", "What they do for a living"),
  ("species", "string", "Human, Animal, Robot, Alien or Other"),
  ("type", "string", "Free-form subtype"),
  ("location", "object", "Last known place { name, url }"),
  ("origin", "object", "Place of origin { name, url }"),
  ("episode", "string[]", "Episodes the character appears in"),
  ("created", "string", "Creation time, ISO 8601"),
];

/// Static reference page for the remote API
pub struct ApiInfoView {
  base_url: String,
  scroll: u16,
}

impl ApiInfoView {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into(),
      scroll: 0,
    }
  }

  fn lines(&self) -> Vec<Line<'static>> {
    let heading = Style::default().fg(Color::Yellow).bold();
    let muted = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
      Line::from(vec![
        Span::styled("Base URL  ", muted),
        Span::styled(self.base_url.clone(), Style::default().fg(Color::Cyan)),
      ]),
      Line::raw(""),
      Line::styled("Endpoints", heading),
    ];

    for (method, path, description, used) in ENDPOINTS {
      let method_color = match *method {
        "GET" => Color::Green,
        "POST" => Color::Blue,
        "PUT" => Color::Yellow,
        _ => Color::Red,
      };
      let mut spans = vec![
        Span::styled(
          format!("  {:<7}", method),
          Style::default().fg(method_color).bold(),
        ),
        Span::raw(format!("/{:<18}", path)),
        Span::styled(description.to_string(), muted),
      ];
      if !used {
        spans.push(Span::styled(" (not used here)", muted.italic()));
      }
      lines.push(Line::from(spans));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled("Character attributes", heading));
    for (name, kind, description) in ATTRIBUTES {
      lines.push(Line::from(vec![
        Span::raw(format!("  {:<12}", name)),
        Span::styled(format!("{:<10}", kind), Style::default().fg(Color::Cyan)),
        Span::styled(description.to_string(), muted),
      ]));
    }

    lines
  }
}

impl View for ApiInfoView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
      KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
      KeyCode::Char('g') | KeyCode::Home => self.scroll = 0,
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(" API ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let paragraph = Paragraph::new(self.lines())
      .block(block)
      .wrap(Wrap { trim: false })
      .scroll((self.scroll, 0));
    frame.render_widget(paragraph, area);
  }

  fn breadcrumb_label(&self) -> String {
    "API".to_string()
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new(":", "command"),
      Shortcut::new("j/k", "scroll"),
      Shortcut::new("q", "back"),
    ]
  }
}
