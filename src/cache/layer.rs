//! Cache-first orchestration between the local snapshot and the network.

use chrono::Utc;
use color_eyre::Result;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::traits::CharacterStore;
use crate::api::{Character, NewCharacter, TransportError};

/// Indicates where fetched data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Served from the local snapshot, no request made
  Cache,
  /// Fetched from the remote API
  Network,
}

/// Fetched data plus where it came from.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  pub data: T,
  pub source: CacheSource,
}

impl<T> CacheResult<T> {
  pub fn from_cache(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Cache,
    }
  }

  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
    }
  }
}

/// How a create request ended up being stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
  /// The remote accepted the record and assigned its id
  Remote(Character),
  /// The remote refused; the record got a local id
  Local(Character),
}

impl CreateOutcome {
  pub fn character(&self) -> &Character {
    match self {
      CreateOutcome::Remote(c) | CreateOutcome::Local(c) => c,
    }
  }

  pub fn is_local(&self) -> bool {
    matches!(self, CreateOutcome::Local(_))
  }
}

/// Cache layer over an injectable store.
///
/// Lookups prefer the snapshot and only call the fetcher on a miss. An empty
/// snapshot counts as a miss.
#[derive(Clone)]
pub struct CacheLayer {
  store: Arc<dyn CharacterStore>,
}

impl CacheLayer {
  pub fn new(store: Arc<dyn CharacterStore>) -> Self {
    Self { store }
  }

  fn cached_records(&self) -> Option<Vec<Character>> {
    self.store.read_all().filter(|records| !records.is_empty())
  }

  /// Fetch the full list.
  ///
  /// 1. Snapshot present - return it, no request
  /// 2. Otherwise call `fetcher`; errors propagate
  /// 3. Write a non-empty network result back to the snapshot
  pub async fn fetch_list<F, Fut>(&self, fetcher: F) -> Result<CacheResult<Vec<Character>>>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<Vec<Character>, TransportError>>,
  {
    if let Some(records) = self.cached_records() {
      debug!(count = records.len(), "character list served from cache");
      return Ok(CacheResult::from_cache(records));
    }

    let records = fetcher().await?;
    debug!(count = records.len(), "character list fetched from network");

    if !records.is_empty() {
      // Persisting is opportunistic; the fetched data is still good
      if let Err(e) = self.store.write_all(&records) {
        warn!(error = %e, "failed to write character list to cache");
      }
    }

    Ok(CacheResult::from_network(records))
  }

  /// Fetch a single character by id.
  ///
  /// A snapshot containing `id` answers without calling `fetcher`. Network
  /// results are not written back.
  pub async fn fetch_one<F, Fut>(&self, id: u64, fetcher: F) -> Result<CacheResult<Character>>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<Character, TransportError>>,
  {
    if let Some(found) = self
      .cached_records()
      .and_then(|records| records.into_iter().find(|c| c.id == id))
    {
      debug!(id, "character served from cache");
      return Ok(CacheResult::from_cache(found));
    }

    let character = fetcher().await?;
    Ok(CacheResult::from_network(character))
  }

  /// Create a character, falling back to a local record.
  ///
  /// The remote attempt is expected to fail. Either way the resulting record
  /// is prepended to the snapshot.
  pub async fn create_with_fallback<F, Fut>(
    &self,
    new: NewCharacter,
    creator: F,
  ) -> Result<CreateOutcome>
  where
    F: FnOnce(NewCharacter) -> Fut,
    Fut: Future<Output = std::result::Result<Character, TransportError>>,
  {
    let outcome = match creator(new.clone()).await {
      Ok(created) => CreateOutcome::Remote(created),
      Err(e) => {
        info!(error = %e, "remote create rejected, storing character locally");
        let existing = self.store.read_all().unwrap_or_default();
        let id = assign_local_id(now_millis(), &existing);
        CreateOutcome::Local(new.with_id(id))
      }
    };

    self.store.prepend(outcome.character().clone())?;
    Ok(outcome)
  }
}

fn now_millis() -> u64 {
  u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}

/// Pick an id for a locally created record.
///
/// Uses the clock-derived `candidate` unless a record already has it, in
/// which case the id after the current maximum is used.
pub fn assign_local_id(candidate: u64, existing: &[Character]) -> u64 {
  if existing.iter().all(|c| c.id != candidate) {
    return candidate;
  }
  existing
    .iter()
    .map(|c| c.id)
    .max()
    .unwrap_or(candidate)
    .saturating_add(1)
}
