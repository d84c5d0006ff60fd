//! Name and status filtering for the character list.

use crate::api::Character;

/// Status values the list can be narrowed to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
  #[default]
  All,
  Alive,
  Dead,
  Unknown,
}

impl StatusFilter {
  const CYCLE: [StatusFilter; 4] = [
    StatusFilter::All,
    StatusFilter::Alive,
    StatusFilter::Dead,
    StatusFilter::Unknown,
  ];

  /// Exact status string a record must carry, None for All
  pub fn value(self) -> Option<&'static str> {
    match self {
      StatusFilter::All => None,
      StatusFilter::Alive => Some("Alive"),
      StatusFilter::Dead => Some("Dead"),
      StatusFilter::Unknown => Some("unknown"),
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      StatusFilter::All => "All statuses",
      StatusFilter::Alive => "Alive",
      StatusFilter::Dead => "Dead",
      StatusFilter::Unknown => "Unknown",
    }
  }

  /// Next filter in the cycle, wrapping around to All
  pub fn next(self) -> Self {
    let idx = Self::CYCLE.iter().position(|s| *s == self).unwrap_or(0);
    Self::CYCLE[(idx + 1) % Self::CYCLE.len()]
  }
}

/// Combined list filter: name substring and status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterFilter {
  pub name: String,
  pub status: StatusFilter,
}

impl CharacterFilter {
  /// Whether any narrowing is applied
  pub fn is_active(&self) -> bool {
    !self.name.is_empty() || self.status != StatusFilter::All
  }

  pub fn clear(&mut self) {
    self.name.clear();
    self.status = StatusFilter::All;
  }

  /// Name contains the query (case-insensitive) and the status matches exactly.
  pub fn matches(&self, character: &Character) -> bool {
    let name_matches = character
      .name
      .to_lowercase()
      .contains(&self.name.to_lowercase());

    let status_matches = match self.status.value() {
      None => true,
      Some(wanted) => character.status.as_deref() == Some(wanted),
    };

    name_matches && status_matches
  }

  /// Matching records, in their original order
  pub fn apply<'a>(&self, records: &'a [Character]) -> Vec<&'a Character> {
    records.iter().filter(|c| self.matches(c)).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn character(id: u64, name: &str, status: Option<&str>) -> Character {
    let mut c = Character::new(id, name);
    c.status = status.map(String::from);
    c
  }

  fn cast() -> Vec<Character> {
    vec![
      character(1, "Homer Simpson", Some("Alive")),
      character(2, "Maude Flanders", Some("Dead")),
      character(3, "Bleeding Gums Murphy", Some("Dead")),
      character(4, "Frank Grimes", Some("Dead")),
      character(5, "Ned Flanders", Some("Alive")),
      character(6, "Mystery Man", Some("unknown")),
      character(7, "Rod Flanders", None),
    ]
  }

  #[test]
  fn test_default_filter_matches_everything() {
    let records = cast();
    let filter = CharacterFilter::default();
    assert!(!filter.is_active());
    assert_eq!(filter.apply(&records).len(), records.len());
  }

  #[test]
  fn test_status_and_name_both_apply() {
    let records = cast();
    let filter = CharacterFilter {
      name: "fLaNdErS".to_string(),
      status: StatusFilter::Dead,
    };

    let ids: Vec<u64> = filter.apply(&records).iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2]);

    // Exactly the subset satisfying both predicates
    let expected: Vec<u64> = records
      .iter()
      .filter(|c| c.status.as_deref() == Some("Dead"))
      .filter(|c| c.name.to_lowercase().contains("flanders"))
      .map(|c| c.id)
      .collect();
    assert_eq!(ids, expected);
  }

  #[test]
  fn test_unknown_status_matches_lowercase_value() {
    let records = cast();
    let filter = CharacterFilter {
      name: String::new(),
      status: StatusFilter::Unknown,
    };
    let ids: Vec<u64> = filter.apply(&records).iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![6]);
  }

  #[test]
  fn test_missing_status_only_matches_all() {
    let rod = character(7, "Rod Flanders", None);
    let mut filter = CharacterFilter::default();
    assert!(filter.matches(&rod));

    filter.status = StatusFilter::Alive;
    assert!(!filter.matches(&rod));
  }

  #[test]
  fn test_clear_resets_filter() {
    let mut filter = CharacterFilter {
      name: "bart".to_string(),
      status: StatusFilter::Alive,
    };
    assert!(filter.is_active());
    filter.clear();
    assert_eq!(filter, CharacterFilter::default());
  }

  #[test]
  fn test_status_cycle_wraps() {
    assert_eq!(StatusFilter::All.next(), StatusFilter::Alive);
    assert_eq!(StatusFilter::Alive.next(), StatusFilter::Dead);
    assert_eq!(StatusFilter::Dead.next(), StatusFilter::Unknown);
    assert_eq!(StatusFilter::Unknown.next(), StatusFilter::All);
  }
}
