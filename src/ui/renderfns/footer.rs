use crate::ui::view::{Notification, NotificationLevel};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer bar: view breadcrumb on the left, notification on the right
pub fn draw_footer(
  frame: &mut Frame,
  area: Rect,
  breadcrumb: &[String],
  notification: Option<&Notification>,
) {
  let mut spans = vec![Span::raw(" ")];

  for (i, part) in breadcrumb.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
    }

    let style = if i + 1 == breadcrumb.len() {
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::White)
    };

    spans.push(Span::styled(part.clone(), style));
  }

  let left = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(left, area);

  if let Some(notification) = notification {
    let color = match notification.level {
      NotificationLevel::Success => Color::Green,
      NotificationLevel::Info => Color::Yellow,
      NotificationLevel::Error => Color::Red,
    };
    let right = Paragraph::new(format!("{} ", notification.message))
      .style(Style::default().fg(color).bg(Color::Black))
      .alignment(Alignment::Right);
    frame.render_widget(right, area);
  }
}
