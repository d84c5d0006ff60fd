use crate::api::CachedCharacterClient;
use crate::event::{Event, EventHandler};
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::view::{Notification, Shortcut, View, ViewAction};
use crate::ui::views::{ApiInfoView, CharacterCreateView, CharacterListView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const TICK_RATE: Duration = Duration::from_millis(250);
const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// `:` command prompt
  command_input: CommandInput,

  /// Shared characters client handed to views
  client: CachedCharacterClient,

  /// API base URL shown in the header
  base_url: String,

  /// Footer message and when it was posted
  notification: Option<(Notification, Instant)>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(client: CachedCharacterClient) -> Self {
    let base_url = client.base_url().to_string();
    let root = CharacterListView::new(client.clone());

    Self {
      view_stack: vec![Box::new(root)],
      command_input: CommandInput::new(),
      client,
      base_url,
      notification: None,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(TICK_RATE);
    info!(base_url = %self.base_url, "springfield started");

    let result = self.main_loop(&mut terminal, &mut events).await;

    // Cleanup terminal, even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn main_loop(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(Event::Key(key)) => {
          self.handle_key(key);
          // Typing starves the tick timer, poll here as well
          self.tick();
        }
        Some(Event::Resize) => {}
        Some(Event::Tick) => self.tick(),
        None => break,
      }
    }
    Ok(())
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    // Command prompt gets first look while open, and `:` opens it unless the
    // view is taking text input
    let captures = self
      .view_stack
      .last()
      .is_some_and(|view| view.captures_input());
    if self.command_input.is_active() || !captures {
      match self.command_input.handle_key(key) {
        KeyResult::Event(CommandEvent::Submitted(cmd)) => {
          self.execute_command(&cmd);
          return;
        }
        KeyResult::Event(CommandEvent::Cancelled) | KeyResult::Handled => return,
        KeyResult::NotHandled => {}
      }
    }

    if let Some(view) = self.view_stack.last_mut() {
      let action = view.handle_key(key);
      self.apply(action);
    }
  }

  fn tick(&mut self) {
    if let Some(view) = self.view_stack.last_mut() {
      let action = view.tick();
      // Take the message before the action can drop the view
      if let Some(notification) = view.take_notification() {
        self.notify(notification);
      }
      self.apply(action);
    }

    if let Some((_, posted)) = &self.notification {
      if posted.elapsed() >= NOTIFICATION_TTL {
        self.notification = None;
      }
    }
  }

  fn apply(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => {
        debug!(view = %view.breadcrumb_label(), "push view");
        self.view_stack.push(view);
      }
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
      ViewAction::Root(view) => {
        debug!(view = %view.breadcrumb_label(), "reset view stack");
        self.view_stack.clear();
        self.view_stack.push(view);
      }
      ViewAction::Quit => self.should_quit = true,
    }
  }

  fn execute_command(&mut self, cmd: &str) {
    match cmd {
      "characters" => self.apply(ViewAction::Root(Box::new(CharacterListView::new(
        self.client.clone(),
      )))),
      "create" => self.apply(ViewAction::Push(Box::new(CharacterCreateView::new(
        self.client.clone(),
      )))),
      "api" => self.apply(ViewAction::Push(Box::new(ApiInfoView::new(
        self.base_url.clone(),
      )))),
      "quit" => self.apply(ViewAction::Quit),
      "" => {}
      other => self.notify(Notification::error(format!("Unknown command: {}", other))),
    }
  }

  fn notify(&mut self, notification: Notification) {
    self.notification = Some((notification, Instant::now()));
  }

  // Accessors for UI rendering
  pub fn current_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
    self.view_stack.last_mut()
  }

  pub fn current_shortcuts(&self) -> Vec<Shortcut> {
    self
      .view_stack
      .last()
      .map(|view| view.shortcuts())
      .unwrap_or_default()
  }

  pub fn command_input(&self) -> &CommandInput {
    &self.command_input
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub fn notification(&self) -> Option<&Notification> {
    self.notification.as_ref().map(|(notification, _)| notification)
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|view| view.breadcrumb_label())
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::cached_client::offline_client;
  use crate::api::Character;
  use crate::cache::MemoryStorage;
  use std::sync::Arc;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn app() -> App {
    let store = Arc::new(MemoryStorage::with_records(&[Character::new(1, "Homer Simpson")]));
    App::new(offline_client(store))
  }

  fn run_command(app: &mut App, cmd: &str) {
    app.handle_key(key(KeyCode::Char(':')));
    for c in cmd.chars() {
      app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Enter));
  }

  #[tokio::test]
  async fn test_commands_navigate() {
    let mut app = app();
    assert_eq!(app.breadcrumb(), vec!["Characters"]);

    run_command(&mut app, "api");
    assert_eq!(app.breadcrumb(), vec!["Characters", "API"]);

    run_command(&mut app, "characters");
    assert_eq!(app.breadcrumb(), vec!["Characters"]);

    run_command(&mut app, "new");
    assert_eq!(app.breadcrumb(), vec!["Characters", "New"]);
  }

  #[tokio::test]
  async fn test_unknown_command_notifies() {
    let mut app = app();
    run_command(&mut app, "zzz");
    let notification = app.notification().unwrap();
    assert!(notification.message.contains("zzz"));
    assert!(!app.should_quit);
  }

  #[tokio::test]
  async fn test_colon_goes_to_form_while_editing() {
    let mut app = app();
    run_command(&mut app, "create");
    app.handle_key(key(KeyCode::Char(':')));
    assert!(!app.command_input().is_active());
  }

  #[tokio::test]
  async fn test_quit_command() {
    let mut app = app();
    run_command(&mut app, "api");
    run_command(&mut app, "exit");
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn test_back_from_root_quits() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('q')));
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn test_ctrl_c_quits_from_anywhere() {
    let mut app = app();
    run_command(&mut app, "create");
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
  }
}
