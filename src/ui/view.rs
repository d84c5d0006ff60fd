use crossterm::event::KeyEvent;
use ratatui::prelude::*;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
  pub key: &'static str,
  pub label: &'static str,
}

impl Shortcut {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self { key, label }
  }
}

/// Severity of a transient status-bar message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
  Success,
  Info,
  Error,
}

/// Transient message shown in the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
  pub level: NotificationLevel,
  pub message: String,
}

impl Notification {
  pub fn success(message: impl Into<String>) -> Self {
    Self {
      level: NotificationLevel::Success,
      message: message.into(),
    }
  }

  pub fn info(message: impl Into<String>) -> Self {
    Self {
      level: NotificationLevel::Info,
      message: message.into(),
    }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self {
      level: NotificationLevel::Error,
      message: message.into(),
    }
  }
}

/// Actions that a view can request from the App
pub enum ViewAction {
  /// No action needed
  None,
  /// Push a new view onto the stack
  Push(Box<dyn View>),
  /// Pop current view from stack (go back)
  Pop,
  /// Drop the whole stack and start over from this view
  Root(Box<dyn View>),
  /// Exit the application
  Quit,
}

/// Trait for view behavior
///
/// Views own their data queries and input components, and return actions for
/// the App to execute: App → View → Components.
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

  /// Render the view to the frame
  fn render(&mut self, frame: &mut Frame, area: Rect);

  /// Get the breadcrumb label for this view
  fn breadcrumb_label(&self) -> String;

  /// Called on each tick to poll async queries. A finished query may ask for
  /// navigation.
  fn tick(&mut self) -> ViewAction {
    ViewAction::None
  }

  /// Whether the view is consuming raw text input (search box, form field),
  /// in which case global keys like `:` are passed through to it.
  fn captures_input(&self) -> bool {
    false
  }

  /// Hand over a pending notification, if any
  fn take_notification(&mut self) -> Option<Notification> {
    None
  }

  /// Get keyboard shortcuts to display in the header
  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![Shortcut::new(":", "command"), Shortcut::new("q", "back")]
  }
}
