use crate::api::{CachedCharacterClient, Character};
use crate::cache::{CacheResult, CacheSource};
use crate::filter::CharacterFilter;
use crate::query::{Query, QueryState};
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::character_row;
use crate::ui::view::{Notification, Shortcut, View, ViewAction};
use crate::ui::views::{CharacterCreateView, CharacterDetailView};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

/// View listing all characters with name search and status filter
pub struct CharacterListView {
  client: CachedCharacterClient,
  query: Query<CacheResult<Vec<Character>>>,
  list_state: ListState,
  search: SearchInput,
  filter: CharacterFilter,
  notification: Option<Notification>,
}

impl CharacterListView {
  pub fn new(client: CachedCharacterClient) -> Self {
    let query_client = client.clone();
    let mut query = Query::new(move || {
      let client = query_client.clone();
      async move { client.list_characters().await.map_err(|e| e.to_string()) }
    });

    // Start fetching immediately
    query.fetch();

    Self {
      client,
      query,
      list_state: ListState::default(),
      search: SearchInput::new(),
      filter: CharacterFilter::default(),
      notification: None,
    }
  }

  fn characters(&self) -> &[Character] {
    self
      .query
      .data()
      .map(|result| result.data.as_slice())
      .unwrap_or(&[])
  }

  fn visible(&self) -> Vec<&Character> {
    self.filter.apply(self.characters())
  }

  fn selected_character(&self) -> Option<&Character> {
    let idx = self.list_state.selected()?;
    self.visible().get(idx).copied()
  }

  fn clear_filters(&mut self) {
    self.filter.clear();
    self.search.reset();
    self.list_state.select(Some(0));
  }

  fn render_filter_bar(&self, frame: &mut Frame, area: Rect) {
    let name = if self.filter.name.is_empty() {
      Span::styled("(any)", Style::default().fg(Color::DarkGray))
    } else {
      Span::styled(
        format!("\"{}\"", self.filter.name),
        Style::default().fg(Color::Yellow),
      )
    };

    let mut spans = vec![
      Span::styled(" Name: ", Style::default().fg(Color::DarkGray)),
      name,
      Span::styled("   Status: ", Style::default().fg(Color::DarkGray)),
      Span::styled(self.filter.status.label(), Style::default().fg(Color::Cyan)),
      Span::styled("   Total: ", Style::default().fg(Color::DarkGray)),
      Span::raw(self.characters().len().to_string()),
      Span::styled("   Filtered: ", Style::default().fg(Color::DarkGray)),
      Span::raw(self.visible().len().to_string()),
    ];
    if self.filter.is_active() {
      spans.push(Span::styled(
        "   (x to clear)",
        Style::default().fg(Color::DarkGray),
      ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.visible().len();
    ensure_valid_selection(&mut self.list_state, len);

    let title = match self.query.state() {
      QueryState::Loading => " Characters (loading...) ".to_string(),
      QueryState::Error(_) => " Characters (error) ".to_string(),
      QueryState::Success(result) if result.source == CacheSource::Cache => {
        format!(" Characters ({}, cached) ", self.characters().len())
      }
      _ => format!(" Characters ({}) ", self.characters().len()),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if len == 0 {
      let (content, color) = if self.query.is_loading() {
        ("Loading characters...".to_string(), Color::DarkGray)
      } else if let Some(error) = self.query.error() {
        (
          format!(
            "Could not load characters. Check your connection.\n\n{}\n\nPress 'r' to retry.",
            error
          ),
          Color::Red,
        )
      } else if self.characters().is_empty() {
        (
          "No characters yet. Press 'c' to create one.".to_string(),
          Color::DarkGray,
        )
      } else {
        (
          "No characters match the filters.\n\nPress 'x' to clear filters or 'c' to create a character."
            .to_string(),
          Color::DarkGray,
        )
      };

      let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(color));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = self
      .visible()
      .into_iter()
      .map(|character| ListItem::new(character_row(character)))
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }
}

impl View for CharacterListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    // Let search component try to handle first
    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Changed(query)) => {
        self.filter.name = query;
        self.list_state.select(Some(0));
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Submitted) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('g') | KeyCode::Home => self.list_state.select_first(),
      KeyCode::Char('G') | KeyCode::End => self.list_state.select_last(),
      KeyCode::Char('s') => {
        self.filter.status = self.filter.status.next();
        self.list_state.select(Some(0));
      }
      KeyCode::Char('x') => self.clear_filters(),
      KeyCode::Char('r') => {
        self.query.refetch();
        self.notification = Some(Notification::info("Reloading characters..."));
      }
      KeyCode::Char('c') => {
        return ViewAction::Push(Box::new(CharacterCreateView::new(self.client.clone())));
      }
      KeyCode::Enter => {
        if let Some(character) = self.selected_character() {
          return ViewAction::Push(Box::new(CharacterDetailView::new(
            character.id,
            self.client.clone(),
          )));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(1), Constraint::Min(1)])
      .split(area);

    self.render_filter_bar(frame, chunks[0]);
    self.render_list(frame, chunks[1]);
    self.search.render_overlay(frame, chunks[1]);
  }

  fn breadcrumb_label(&self) -> String {
    "Characters".to_string()
  }

  fn tick(&mut self) -> ViewAction {
    if self.query.poll() {
      // Cache hits stay quiet so a pending "created" message survives
      self.notification = match self.query.state() {
        QueryState::Success(result) if result.source == CacheSource::Network => Some(
          Notification::success(format!("Loaded {} characters", result.data.len())),
        ),
        QueryState::Error(_) => Some(Notification::error(
          "Failed to load characters. Press 'r' to retry.",
        )),
        _ => None,
      };
    }
    ViewAction::None
  }

  fn captures_input(&self) -> bool {
    self.search.is_active()
  }

  fn take_notification(&mut self) -> Option<Notification> {
    self.notification.take()
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new(":", "command"),
      Shortcut::new("/", "search"),
      Shortcut::new("s", "status"),
      Shortcut::new("x", "clear"),
      Shortcut::new("c", "create"),
      Shortcut::new("r", "reload"),
      Shortcut::new("q", "quit"),
    ]
  }
}
