//! Store trait for the local character snapshot.

use color_eyre::Result;
use tracing::warn;

use crate::api::Character;

/// Key the snapshot is stored under
pub const SNAPSHOT_KEY: &str = "simpsons_characters";

/// A single-slot store holding the last known list of characters.
///
/// Every write replaces the whole snapshot. There is no merge, no versioning
/// and no size bound.
pub trait CharacterStore: Send + Sync {
  /// Read the snapshot.
  ///
  /// Returns `None` when nothing has been written yet. Content that cannot be
  /// decoded, or a backend read failure, is also reported as `None` after a
  /// warning is logged: a broken cache behaves like an empty one.
  fn read_all(&self) -> Option<Vec<Character>>;

  /// Replace the snapshot.
  fn write_all(&self, records: &[Character]) -> Result<()>;

  /// Insert a record at the front of the snapshot.
  fn prepend(&self, record: Character) -> Result<()> {
    let mut records = self.read_all().unwrap_or_default();
    records.insert(0, record);
    self.write_all(&records)
  }
}

/// Serialize records into the stored text form.
pub fn encode_snapshot(records: &[Character]) -> Result<String> {
  Ok(serde_json::to_string(records)?)
}

/// Decode stored text, swallowing parse errors.
pub fn decode_snapshot(raw: &str) -> Option<Vec<Character>> {
  match serde_json::from_str(raw) {
    Ok(records) => Some(records),
    Err(e) => {
      warn!(error = %e, "cached snapshot is unreadable, treating it as absent");
      None
    }
  }
}
