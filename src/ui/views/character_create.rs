use crate::api::CachedCharacterClient;
use crate::cache::CreateOutcome;
use crate::form::{CharacterForm, FormField, ValidationErrors};
use crate::query::{Query, QueryState};
use crate::ui::components::{InputResult, TextInput};
use crate::ui::view::{Notification, Shortcut, View, ViewAction};
use crate::ui::views::CharacterListView;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

const LABEL_WIDTH: usize = 14;

/// Form for creating a new character
pub struct CharacterCreateView {
  client: CachedCharacterClient,
  form: CharacterForm,
  errors: ValidationErrors,
  focus: usize,
  /// Editor for the focused text field, kept in sync with `form`
  input: TextInput,
  submission: Option<Query<CreateOutcome>>,
  notification: Option<Notification>,
}

impl CharacterCreateView {
  pub fn new(client: CachedCharacterClient) -> Self {
    let form = CharacterForm::default();
    let input = TextInput::with_value(form.value(FormField::ALL[0]));

    Self {
      client,
      form,
      errors: ValidationErrors::default(),
      focus: 0,
      input,
      submission: None,
      notification: None,
    }
  }

  fn focused(&self) -> FormField {
    FormField::ALL[self.focus]
  }

  fn is_submitting(&self) -> bool {
    self
      .submission
      .as_ref()
      .is_some_and(|query| query.is_loading())
  }

  fn focus_on(&mut self, index: usize) {
    self.focus = index % FormField::ALL.len();
    self.input = TextInput::with_value(self.form.value(self.focused()));
  }

  fn move_focus(&mut self, forward: bool) {
    let len = FormField::ALL.len();
    let next = if forward {
      self.focus + 1
    } else {
      self.focus + len - 1
    };
    self.focus_on(next);
  }

  fn edited(&mut self, field: FormField) {
    self.errors.clear(field);
  }

  fn submit(&mut self) {
    let new = match self.form.build(Utc::now()) {
      Ok(new) => new,
      Err(errors) => {
        self.notification = Some(Notification::error(format!(
          "Please fix {} field(s)",
          errors.len()
        )));
        // Jump to the first invalid field
        if let Some(idx) = FormField::ALL
          .iter()
          .position(|field| errors.get(*field).is_some())
        {
          self.focus_on(idx);
        }
        self.errors = errors;
        return;
      }
    };

    let client = self.client.clone();
    let mut query = Query::new(move || {
      let client = client.clone();
      let new = new.clone();
      async move { client.create_character(new).await.map_err(|e| e.to_string()) }
    });
    query.fetch();
    self.submission = Some(query);
  }

  fn field_lines(&self, field: FormField, focused: bool) -> Vec<Line<'static>> {
    let marker = if field.is_required() { " *" } else { "" };
    let label_style = if focused {
      Style::default().fg(Color::Yellow).bold()
    } else {
      Style::default().fg(Color::DarkGray)
    };

    let mut spans = vec![
      Span::raw(if focused { "> " } else { "  " }),
      Span::styled(
        format!(
          "{:<width$}",
          format!("{}{}", field.label(), marker),
          width = LABEL_WIDTH
        ),
        label_style,
      ),
    ];

    let value = self.form.value(field);
    if field.options().is_some() {
      let shown = if value.is_empty() {
        Span::styled(field.placeholder(), Style::default().fg(Color::DarkGray))
      } else {
        Span::styled(value.to_string(), Style::default().fg(Color::Cyan))
      };
      if focused {
        spans.push(Span::styled("< ", Style::default().fg(Color::Yellow)));
        spans.push(shown);
        spans.push(Span::styled(" >", Style::default().fg(Color::Yellow)));
      } else {
        spans.push(shown);
      }
    } else if focused {
      spans.extend(cursor_spans(
        self.input.value(),
        self.input.cursor_position(),
      ));
    } else if value.is_empty() {
      spans.push(Span::styled(
        field.placeholder(),
        Style::default().fg(Color::DarkGray),
      ));
    } else {
      spans.push(Span::raw(value.to_string()));
    }

    let mut lines = vec![Line::from(spans)];
    if let Some(message) = self.errors.get(field) {
      lines.push(Line::from(vec![
        Span::raw(" ".repeat(LABEL_WIDTH + 2)),
        Span::styled(message, Style::default().fg(Color::Red)),
      ]));
    }
    lines
  }

  fn render_form(&self, frame: &mut Frame, area: Rect) {
    let title = if self.is_submitting() {
      " New character (saving...) "
    } else {
      " New character "
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let mut lines = vec![
      Line::styled(
        "Tab/Shift-Tab: move   ←/→: choose   Enter: save   Esc: cancel",
        Style::default().fg(Color::DarkGray),
      ),
      Line::raw(""),
    ];
    for (idx, field) in FormField::ALL.iter().enumerate() {
      lines.extend(self.field_lines(*field, idx == self.focus));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
  }
}

/// Text with a block cursor at char index `cursor`
fn cursor_spans(value: &str, cursor: usize) -> Vec<Span<'static>> {
  let before: String = value.chars().take(cursor).collect();
  let mut rest = value.chars().skip(cursor);
  let at = rest.next().map(String::from).unwrap_or_else(|| " ".to_string());
  let after: String = rest.collect();

  vec![
    Span::raw(before),
    Span::styled(at, Style::default().add_modifier(Modifier::REVERSED)),
    Span::raw(after),
  ]
}

impl View for CharacterCreateView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.is_submitting() {
      return ViewAction::None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let field = self.focused();

    match key.code {
      KeyCode::Esc => return ViewAction::Pop,
      KeyCode::Enter => {
        self.submit();
        return ViewAction::None;
      }
      KeyCode::Char('s') if ctrl => {
        self.submit();
        return ViewAction::None;
      }
      KeyCode::Tab | KeyCode::Down => {
        self.move_focus(true);
        return ViewAction::None;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.move_focus(false);
        return ViewAction::None;
      }
      _ => {}
    }

    if field.options().is_some() {
      let delta = match key.code {
        KeyCode::Left | KeyCode::Char('h') => -1,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => 1,
        _ => return ViewAction::None,
      };
      self.form.cycle(field, delta);
      self.edited(field);
      return ViewAction::None;
    }

    if self.input.handle_key(key) == InputResult::Consumed {
      self.form.set(field, self.input.value().to_string());
      self.edited(field);
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_form(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "New".to_string()
  }

  fn tick(&mut self) -> ViewAction {
    let Some(query) = self.submission.as_mut() else {
      return ViewAction::None;
    };
    if !query.poll() {
      return ViewAction::None;
    }

    match query.state() {
      QueryState::Success(outcome) => {
        let message = if outcome.is_local() {
          "Character created locally!"
        } else {
          "Character created!"
        };
        self.notification = Some(Notification::success(message));
        ViewAction::Root(Box::new(CharacterListView::new(self.client.clone())))
      }
      QueryState::Error(e) => {
        self.notification = Some(Notification::error(format!(
          "Failed to save character: {}",
          e
        )));
        self.submission = None;
        ViewAction::None
      }
      _ => ViewAction::None,
    }
  }

  fn captures_input(&self) -> bool {
    true
  }

  fn take_notification(&mut self) -> Option<Notification> {
    self.notification.take()
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new("Tab", "next"),
      Shortcut::new("Enter", "save"),
      Shortcut::new("Esc", "cancel"),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::cached_client::offline_client;
  use crate::api::Character;
  use crate::cache::{CharacterStore, MemoryStorage};
  use std::sync::Arc;
  use std::time::Duration;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn filled_form() -> CharacterForm {
    CharacterForm {
      name: "Apu Nahasapeemapetilon".to_string(),
      image: "https://example.com/apu.png".to_string(),
      gender: "Male".to_string(),
      occupation: "Kwik-E-Mart clerk".to_string(),
      location: "Kwik-E-Mart".to_string(),
      origin: "Springfield".to_string(),
      ..CharacterForm::default()
    }
  }

  #[tokio::test]
  async fn test_empty_name_blocks_submission() {
    let store = Arc::new(MemoryStorage::new());
    let mut view = CharacterCreateView::new(offline_client(store.clone()));
    view.form = CharacterForm {
      name: String::new(),
      ..filled_form()
    };
    view.focus_on(3);

    view.handle_key(key(KeyCode::Enter));

    assert_eq!(view.errors.get(FormField::Name), Some("Name is required"));
    assert_eq!(view.errors.len(), 1);
    assert!(view.submission.is_none());
    assert_eq!(view.focused(), FormField::Name);
    assert!(view.take_notification().is_some());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(store.read_all(), None);
  }

  #[tokio::test]
  async fn test_typing_clears_field_error() {
    let mut view = CharacterCreateView::new(offline_client(Arc::new(MemoryStorage::new())));
    view.handle_key(key(KeyCode::Enter));
    assert!(view.errors.get(FormField::Name).is_some());

    for c in "Otto".chars() {
      view.handle_key(key(KeyCode::Char(c)));
    }

    assert_eq!(view.form.name, "Otto");
    assert!(view.errors.get(FormField::Name).is_none());
    assert!(view.errors.get(FormField::Image).is_some());
  }

  #[tokio::test]
  async fn test_choice_fields_cycle_and_text_survives_focus_moves() {
    let mut view = CharacterCreateView::new(offline_client(Arc::new(MemoryStorage::new())));
    for c in "Lisa".chars() {
      view.handle_key(key(KeyCode::Char(c)));
    }

    // Name -> Image -> Gender
    view.handle_key(key(KeyCode::Tab));
    view.handle_key(key(KeyCode::Tab));
    assert_eq!(view.focused(), FormField::Gender);
    view.handle_key(key(KeyCode::Right));
    view.handle_key(key(KeyCode::Right));
    assert_eq!(view.form.gender, "Female");

    view.handle_key(key(KeyCode::BackTab));
    view.handle_key(key(KeyCode::BackTab));
    assert_eq!(view.input.value(), "Lisa");

    // Wraps around to the last field
    view.handle_key(key(KeyCode::Up));
    assert_eq!(view.focused(), FormField::Origin);
  }

  #[tokio::test]
  async fn test_failing_remote_create_stores_locally_and_returns_to_list() {
    let existing = vec![Character::new(1, "Homer Simpson"), Character::new(2, "Marge Simpson")];
    let store = Arc::new(MemoryStorage::with_records(&existing));
    let mut view = CharacterCreateView::new(offline_client(store.clone()));
    view.form = filled_form();

    view.handle_key(key(KeyCode::Enter));
    assert!(view.errors.is_empty());
    assert!(view.is_submitting());

    let mut redirected = false;
    for _ in 0..300 {
      if let ViewAction::Root(list) = view.tick() {
        assert_eq!(list.breadcrumb_label(), "Characters");
        redirected = true;
        break;
      }
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(redirected);

    let notification = view.take_notification().unwrap();
    assert_eq!(notification.message, "Character created locally!");

    let records = store.read_all().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].name, "Apu Nahasapeemapetilon");
    assert!(existing.iter().all(|c| c.id != records[0].id));
    assert_eq!(&records[1..], existing.as_slice());
  }

  #[test]
  fn test_cursor_spans_highlight_char_under_cursor() {
    let spans = cursor_spans("Moe", 1);
    let text: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(text, vec!["M", "o", "e"]);

    let spans = cursor_spans("Moe", 3);
    assert_eq!(spans[1].content, " ");
  }
}
