use super::utils::{status_color, truncate};
use crate::api::{Character, Place};
use ratatui::prelude::*;

const LABEL_WIDTH: usize = 12;

/// One list row: id, status, name, occupation
pub fn character_row(character: &Character) -> Line<'static> {
  let status = character.status.as_deref().unwrap_or("-");

  Line::from(vec![
    Span::styled(
      format!("{:>6}", character.id),
      Style::default().fg(Color::DarkGray),
    ),
    Span::raw("  "),
    Span::styled(
      format!("{:<8}", truncate(status, 8)),
      Style::default().fg(status_color(status)),
    ),
    Span::raw(" "),
    Span::styled(
      format!("{:<28}", truncate(&character.name, 28)),
      Style::default().fg(Color::White).bold(),
    ),
    Span::raw(" "),
    Span::styled(
      truncate(character.occupation.as_deref().unwrap_or(""), 40),
      Style::default().fg(Color::DarkGray),
    ),
  ])
}

fn field_line(label: &str, value: String, value_style: Style) -> Line<'static> {
  Line::from(vec![
    Span::styled(
      format!("{:<width$}", format!("{}:", label), width = LABEL_WIDTH),
      Style::default().fg(Color::DarkGray),
    ),
    Span::styled(value, value_style),
  ])
}

fn place_text(place: &Place) -> String {
  if place.url.is_empty() {
    place.name.clone()
  } else {
    format!("{} ({})", place.name, place.url)
  }
}

/// Full detail card. Optional fields that are missing are left out.
pub fn character_lines(character: &Character) -> Vec<Line<'static>> {
  let plain = Style::default();
  let mut lines = vec![
    Line::from(vec![
      Span::styled(
        format!("[{}] ", character.initial()),
        Style::default().fg(Color::Yellow).bold(),
      ),
      Span::styled(character.name.clone(), Style::default().bold()),
    ]),
    Line::raw(""),
    field_line("Id", character.id.to_string(), plain),
  ];

  if let Some(status) = &character.status {
    lines.push(field_line(
      "Status",
      status.clone(),
      Style::default().fg(status_color(status)),
    ));
  }

  let text_fields = [
    ("Gender", &character.gender),
    ("Species", &character.species),
    ("Type", &character.kind),
    ("Occupation", &character.occupation),
  ];
  for (label, value) in text_fields {
    if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
      lines.push(field_line(label, value.clone(), plain));
    }
  }

  for (label, place) in [("Location", &character.location), ("Origin", &character.origin)] {
    if let Some(place) = place.as_ref().filter(|p| !p.name.is_empty()) {
      lines.push(field_line(label, place_text(place), plain));
    }
  }

  if let Some(image) = &character.image {
    lines.push(field_line(
      "Image",
      image.clone(),
      Style::default().fg(Color::Blue).underlined(),
    ));
  }

  if let Some(created) = &character.created {
    lines.push(field_line("Created", created.clone(), plain));
  }

  if !character.episode.is_empty() {
    lines.push(Line::raw(""));
    lines.push(field_line(
      "Episodes",
      character.episode.len().to_string(),
      plain,
    ));
    for episode in &character.episode {
      lines.push(Line::from(vec![
        Span::raw(" ".repeat(LABEL_WIDTH)),
        Span::styled(episode.clone(), Style::default().fg(Color::DarkGray)),
      ]));
    }
  }

  lines
}

#[cfg(test)]
mod tests {
  use super::*;

  fn line_text(line: &Line) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
  }

  #[test]
  fn test_minimal_card() {
    let lines = character_lines(&Character::new(7, "Krusty"));
    let text: Vec<String> = lines.iter().map(line_text).collect();

    assert_eq!(text[0], "[K] Krusty");
    assert!(text.iter().any(|l| l.starts_with("Id:") && l.ends_with('7')));
    assert!(!text.iter().any(|l| l.starts_with("Status:")));
  }

  #[test]
  fn test_full_card_lists_episodes_and_places() {
    let mut character = Character::new(1, "Homer Simpson");
    character.status = Some("Alive".to_string());
    character.location = Some(Place {
      name: "Springfield".to_string(),
      url: "https://example.com/springfield".to_string(),
    });
    character.origin = Some(Place::named(""));
    character.episode = vec!["S01E01".to_string(), "S01E02".to_string()];

    let text: Vec<String> = character_lines(&character).iter().map(line_text).collect();

    assert!(text
      .iter()
      .any(|l| l.contains("Springfield (https://example.com/springfield)")));
    assert!(!text.iter().any(|l| l.starts_with("Origin:")));
    assert!(text.iter().any(|l| l.starts_with("Episodes:") && l.ends_with('2')));
    assert!(text.iter().any(|l| l.trim() == "S01E02"));
  }

  #[test]
  fn test_row_contains_name_and_status() {
    let mut character = Character::new(12, "Ralph Wiggum");
    character.status = Some("Alive".to_string());
    let text = line_text(&character_row(&character));
    assert!(text.contains("Ralph Wiggum"));
    assert!(text.contains("Alive"));
    assert!(text.contains("12"));
  }
}
