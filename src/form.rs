//! Create-character form state and validation.

use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

use crate::api::{NewCharacter, Place};

pub const GENDER_OPTIONS: &[&str] = &["Male", "Female", "Other"];
pub const STATUS_OPTIONS: &[&str] = &["Alive", "Dead", "unknown"];
pub const SPECIES_OPTIONS: &[&str] = &["Human", "Animal", "Robot", "Alien", "Other"];

/// Fields of the create form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
  Name,
  Image,
  Gender,
  Status,
  Occupation,
  Species,
  Type,
  Location,
  Origin,
}

impl FormField {
  pub const ALL: [FormField; 9] = [
    FormField::Name,
    FormField::Image,
    FormField::Gender,
    FormField::Status,
    FormField::Occupation,
    FormField::Species,
    FormField::Type,
    FormField::Location,
    FormField::Origin,
  ];

  pub fn label(self) -> &'static str {
    match self {
      FormField::Name => "Name",
      FormField::Image => "Image URL",
      FormField::Gender => "Gender",
      FormField::Status => "Status",
      FormField::Occupation => "Occupation",
      FormField::Species => "Species",
      FormField::Type => "Type",
      FormField::Location => "Location",
      FormField::Origin => "Origin",
    }
  }

  pub fn is_required(self) -> bool {
    !matches!(
      self,
      FormField::Status | FormField::Species | FormField::Type
    )
  }

  /// Fixed choices for select-style fields, None for free text
  pub fn options(self) -> Option<&'static [&'static str]> {
    match self {
      FormField::Gender => Some(GENDER_OPTIONS),
      FormField::Status => Some(STATUS_OPTIONS),
      FormField::Species => Some(SPECIES_OPTIONS),
      _ => None,
    }
  }

  pub fn placeholder(self) -> &'static str {
    match self {
      FormField::Name => "e.g. Bart Simpson",
      FormField::Image => "https://example.com/image.png",
      FormField::Gender => "Select a gender",
      FormField::Occupation => "e.g. Student",
      FormField::Type => "e.g. Main character",
      FormField::Location => "e.g. Springfield",
      FormField::Origin => "e.g. Springfield",
      FormField::Status | FormField::Species => "",
    }
  }
}

impl fmt::Display for FormField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Per-field validation failures
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) are invalid", .0.len())]
pub struct ValidationErrors(BTreeMap<FormField, &'static str>);

impl ValidationErrors {
  pub fn get(&self, field: FormField) -> Option<&'static str> {
    self.0.get(&field).copied()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  /// Drop the error for one field (the user started editing it)
  pub fn clear(&mut self, field: FormField) {
    self.0.remove(&field);
  }

  fn insert(&mut self, field: FormField, message: &'static str) {
    self.0.insert(field, message);
  }
}

/// Raw form values as typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterForm {
  pub name: String,
  pub image: String,
  pub gender: String,
  pub status: String,
  pub occupation: String,
  pub species: String,
  pub kind: String,
  pub location: String,
  pub origin: String,
}

impl Default for CharacterForm {
  fn default() -> Self {
    Self {
      name: String::new(),
      image: String::new(),
      gender: String::new(),
      status: "Alive".to_string(),
      occupation: String::new(),
      species: "Human".to_string(),
      kind: String::new(),
      location: String::new(),
      origin: String::new(),
    }
  }
}

impl CharacterForm {
  pub fn value(&self, field: FormField) -> &str {
    match field {
      FormField::Name => &self.name,
      FormField::Image => &self.image,
      FormField::Gender => &self.gender,
      FormField::Status => &self.status,
      FormField::Occupation => &self.occupation,
      FormField::Species => &self.species,
      FormField::Type => &self.kind,
      FormField::Location => &self.location,
      FormField::Origin => &self.origin,
    }
  }

  pub fn set(&mut self, field: FormField, value: String) {
    let slot = match field {
      FormField::Name => &mut self.name,
      FormField::Image => &mut self.image,
      FormField::Gender => &mut self.gender,
      FormField::Status => &mut self.status,
      FormField::Occupation => &mut self.occupation,
      FormField::Species => &mut self.species,
      FormField::Type => &mut self.kind,
      FormField::Location => &mut self.location,
      FormField::Origin => &mut self.origin,
    };
    *slot = value;
  }

  /// Step a select-style field through its options. No-op for text fields.
  ///
  /// An unset value moves to the first option (or last, going backwards).
  pub fn cycle(&mut self, field: FormField, delta: i32) {
    let Some(options) = field.options() else {
      return;
    };
    let len = options.len() as i32;
    let next = match options.iter().position(|o| *o == self.value(field)) {
      Some(idx) => (idx as i32 + delta).rem_euclid(len),
      None if delta < 0 => len - 1,
      None => 0,
    };
    self.set(field, options[next as usize].to_string());
  }

  /// Check every field and collect all failures.
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = self.name.trim();
    if name.is_empty() {
      errors.insert(FormField::Name, "Name is required");
    } else if name.chars().count() < 2 {
      errors.insert(FormField::Name, "Name must be at least 2 characters");
    }

    let image = self.image.trim();
    if image.is_empty() {
      errors.insert(FormField::Image, "Image URL is required");
    } else if Url::parse(image).is_err() {
      errors.insert(FormField::Image, "Image URL is invalid");
    }

    if !GENDER_OPTIONS.contains(&self.gender.as_str()) {
      errors.insert(FormField::Gender, "Gender is required");
    }

    if self.occupation.trim().is_empty() {
      errors.insert(FormField::Occupation, "Occupation is required");
    }

    if self.location.trim().is_empty() {
      errors.insert(FormField::Location, "Location is required");
    }

    if self.origin.trim().is_empty() {
      errors.insert(FormField::Origin, "Origin is required");
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(errors)
    }
  }

  /// Validate and turn the form into a create payload stamped with `created`.
  pub fn build(&self, created: DateTime<Utc>) -> Result<NewCharacter, ValidationErrors> {
    self.validate()?;

    Ok(NewCharacter {
      name: self.name.trim().to_string(),
      image: Some(self.image.trim().to_string()),
      gender: Some(self.gender.clone()),
      status: non_empty(&self.status),
      occupation: non_empty(&self.occupation),
      species: non_empty(&self.species),
      kind: non_empty(&self.kind),
      location: Some(Place::named(self.location.trim())),
      origin: Some(Place::named(self.origin.trim())),
      episode: Vec::new(),
      created: Some(created.to_rfc3339_opts(SecondsFormat::Millis, true)),
    })
  }
}

fn non_empty(value: &str) -> Option<String> {
  let trimmed = value.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_string())
}
