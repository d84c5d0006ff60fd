//! Serde types matching the characters API payloads.
//!
//! The remote schema is not enforced: every field except `id` is optional or
//! defaulted, and unknown fields are ignored. The same types are what the
//! local snapshot stores.

use serde::{Deserialize, Deserializer, Serialize};

/// A named place with an optional link (`location`, `origin`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PlaceRepr")]
pub struct Place {
  pub name: String,
  pub url: String,
}

/// Places arrive either as `{ name, url }` or as a bare name
#[derive(Deserialize)]
#[serde(untagged)]
enum PlaceRepr {
  Full {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    url: String,
  },
  Name(String),
}

impl From<PlaceRepr> for Place {
  fn from(repr: PlaceRepr) -> Self {
    match repr {
      PlaceRepr::Full { name, url } => Place { name, url },
      PlaceRepr::Name(name) => Place::named(name),
    }
  }
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Place {
  pub fn named(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      url: String::new(),
    }
  }
}

// ============================================================================
// Character record
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
  pub id: u64,
  #[serde(default, deserialize_with = "null_as_default")]
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub gender: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub occupation: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub species: Option<String>,
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub kind: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location: Option<Place>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub origin: Option<Place>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub episode: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created: Option<String>,
}

impl Character {
  /// Minimal record with only an id and a name
  #[cfg(test)]
  pub fn new(id: u64, name: impl Into<String>) -> Self {
    Self {
      id,
      name: name.into(),
      image: None,
      gender: None,
      status: None,
      occupation: None,
      species: None,
      kind: None,
      location: None,
      origin: None,
      episode: Vec::new(),
      created: None,
    }
  }

  /// First letter of the name, shown in place of the image
  pub fn initial(&self) -> char {
    self.name.chars().next().unwrap_or('?')
  }
}

// ============================================================================
// Create payload
// ============================================================================

/// A character that has not been assigned an id yet (POST body)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCharacter {
  pub name: String,
  pub image: Option<String>,
  pub gender: Option<String>,
  pub status: Option<String>,
  pub occupation: Option<String>,
  pub species: Option<String>,
  #[serde(rename = "type")]
  pub kind: Option<String>,
  pub location: Option<Place>,
  pub origin: Option<Place>,
  pub episode: Vec<String>,
  pub created: Option<String>,
}

impl NewCharacter {
  pub fn with_id(self, id: u64) -> Character {
    Character {
      id,
      name: self.name,
      image: self.image,
      gender: self.gender,
      status: self.status,
      occupation: self.occupation,
      species: self.species,
      kind: self.kind,
      location: self.location,
      origin: self.origin,
      episode: self.episode,
      created: self.created,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_deserialize_partial_record() {
    let json = r#"{
      "id": 1,
      "name": "Homer Simpson",
      "status": "Alive",
      "type": "Main",
      "location": { "name": "Springfield" },
      "normalized_name": "homer-simpson"
    }"#;

    let character: Character = serde_json::from_str(json).unwrap();
    assert_eq!(character.id, 1);
    assert_eq!(character.name, "Homer Simpson");
    assert_eq!(character.kind.as_deref(), Some("Main"));
    assert_eq!(character.location, Some(Place::named("Springfield")));
    assert!(character.episode.is_empty());
    assert!(character.image.is_none());
  }

  #[test]
  fn test_sloppy_record_does_not_sink_the_list() {
    let json = r#"[
      {"id": 1, "name": "Homer Simpson"},
      {"id": 2, "name": null, "episode": null},
      {"id": 3, "name": "Moe Szyslak", "location": "Moe's Tavern", "origin": {"name": null}}
    ]"#;

    let characters: Vec<Character> = serde_json::from_str(json).unwrap();
    assert_eq!(characters.len(), 3);
    assert_eq!(characters[1].name, "");
    assert!(characters[1].episode.is_empty());
    assert_eq!(characters[2].location, Some(Place::named("Moe's Tavern")));
    assert_eq!(characters[2].origin, Some(Place::named("")));
  }

  #[test]
  fn test_place_object_keeps_url() {
    let place: Place =
      serde_json::from_str(r#"{"name": "Springfield", "url": "https://example.com/s"}"#).unwrap();
    assert_eq!(place.url, "https://example.com/s");
  }

  #[test]
  fn test_missing_name_defaults_to_empty() {
    let character: Character = serde_json::from_str(r#"{"id": 3, "image": null}"#).unwrap();
    assert_eq!(character.name, "");
    assert_eq!(character.initial(), '?');
  }

  #[test]
  fn test_kind_serializes_as_type() {
    let mut character = Character::new(2, "Bart Simpson");
    character.kind = Some("Kid".to_string());

    let value = serde_json::to_value(&character).unwrap();
    assert_eq!(value["type"], "Kid");
    assert!(value.get("kind").is_none());
    assert!(value.get("image").is_none());
  }

  #[test]
  fn test_new_character_with_id() {
    let new = NewCharacter {
      name: "Lisa Simpson".to_string(),
      image: Some("https://example.com/lisa.png".to_string()),
      gender: Some("Female".to_string()),
      status: Some("Alive".to_string()),
      occupation: Some("Student".to_string()),
      species: Some("Human".to_string()),
      kind: None,
      location: Some(Place::named("Springfield")),
      origin: Some(Place::named("Springfield")),
      episode: Vec::new(),
      created: None,
    };

    let character = new.with_id(42);
    assert_eq!(character.id, 42);
    assert_eq!(character.name, "Lisa Simpson");
    assert_eq!(character.occupation.as_deref(), Some("Student"));
  }
}
