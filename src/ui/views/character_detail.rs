use crate::api::{CachedCharacterClient, Character};
use crate::cache::{CacheResult, CacheSource};
use crate::query::{Query, QueryState};
use crate::ui::renderfns::character_lines;
use crate::ui::view::{Notification, Shortcut, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// View for displaying one character
pub struct CharacterDetailView {
  id: u64,
  query: Query<CacheResult<Character>>,
  scroll: u16,
  notification: Option<Notification>,
}

impl CharacterDetailView {
  pub fn new(id: u64, client: CachedCharacterClient) -> Self {
    let mut query = Query::new(move || {
      let client = client.clone();
      async move { client.get_character(id).await.map_err(|e| e.to_string()) }
    });

    // Start fetching immediately
    query.fetch();

    Self {
      id,
      query,
      scroll: 0,
      notification: None,
    }
  }

  fn render_detail(&self, frame: &mut Frame, area: Rect) {
    let title = match self.query.state() {
      QueryState::Loading => format!(" Character #{} (loading...) ", self.id),
      QueryState::Error(_) => format!(" Character #{} (error) ", self.id),
      QueryState::Success(result) if result.source == CacheSource::Cache => {
        format!(" Character #{} (cached) ", self.id)
      }
      _ => format!(" Character #{} ", self.id),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if self.query.is_loading() {
      let paragraph =
        Paragraph::new("Loading character...").style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, inner);
      return;
    }

    if let Some(error) = self.query.error() {
      let headline = if error.contains("404") {
        "Character not found."
      } else {
        "Could not load character. Check your connection."
      };
      let paragraph = Paragraph::new(format!("{}\n\n{}\n\nPress 'r' to retry.", headline, error))
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::Red));
      frame.render_widget(paragraph, inner);
      return;
    }

    let Some(result) = self.query.data() else {
      return;
    };

    let paragraph = Paragraph::new(character_lines(&result.data))
      .wrap(Wrap { trim: false })
      .scroll((self.scroll, 0));
    frame.render_widget(paragraph, inner);
  }
}

impl View for CharacterDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.scroll = self.scroll.saturating_add(1);
        ViewAction::None
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.scroll = self.scroll.saturating_sub(1);
        ViewAction::None
      }
      KeyCode::Char('r') => {
        self.scroll = 0;
        self.query.refetch();
        ViewAction::None
      }
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_detail(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    format!("#{}", self.id)
  }

  fn tick(&mut self) -> ViewAction {
    if self.query.poll() && self.query.is_error() {
      self.notification = Some(Notification::error(format!(
        "Failed to load character #{}",
        self.id
      )));
    }
    ViewAction::None
  }

  fn take_notification(&mut self) -> Option<Notification> {
    self.notification.take()
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new(":", "command"),
      Shortcut::new("j/k", "scroll"),
      Shortcut::new("r", "refresh"),
      Shortcut::new("q", "back"),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::cached_client::offline_client;
  use crate::cache::MemoryStorage;
  use crate::query::settle;
  use std::sync::Arc;

  #[tokio::test]
  async fn test_cached_character_loads_offline() {
    let store = Arc::new(MemoryStorage::with_records(&[
      Character::new(3, "Bart Simpson"),
      Character::new(7, "Krusty"),
    ]));
    let mut view = CharacterDetailView::new(7, offline_client(store));

    settle(&mut view.query, 300).await;

    let result = view.query.data().unwrap();
    assert_eq!(result.source, CacheSource::Cache);
    assert_eq!(result.data.name, "Krusty");
    assert!(view.take_notification().is_none());
  }

  #[tokio::test]
  async fn test_uncached_character_fails_offline() {
    let store = Arc::new(MemoryStorage::with_records(&[Character::new(3, "Bart Simpson")]));
    let mut view = CharacterDetailView::new(99, offline_client(store));

    for _ in 0..300 {
      view.tick();
      if !view.query.is_loading() {
        break;
      }
      tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    assert!(view.query.is_error());
    assert!(view.take_notification().is_some());
    assert_eq!(view.breadcrumb_label(), "#99");
  }
}
