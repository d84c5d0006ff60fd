use ratatui::prelude::Color;

/// Truncate a string to at most `max_len` characters, adding "..." if cut
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Get the display color for a character status
pub fn status_color(status: &str) -> Color {
  match status {
    "Alive" => Color::Green,
    "Dead" => Color::Red,
    _ => Color::Gray,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("Otto", 10), "Otto");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("Homer", 5), "Homer");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("Montgomery Burns", 8), "Montg...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("Señor Ding-a-ling", 6), "Señ...");
  }

  #[test]
  fn test_status_color() {
    assert_eq!(status_color("Alive"), Color::Green);
    assert_eq!(status_color("Dead"), Color::Red);
    assert_eq!(status_color("unknown"), Color::Gray);
  }
}
