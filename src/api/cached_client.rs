//! Cached characters client that wraps CharacterClient with the local snapshot.

use color_eyre::Result;
use std::sync::Arc;

use crate::cache::{CacheLayer, CacheResult, CharacterStore, CreateOutcome};

use super::client::CharacterClient;
use super::types::{Character, NewCharacter};

/// Characters client with cache-first lookups and local create fallback.
///
/// This is the handle views hold. Cloning is cheap: the HTTP client and the
/// store are shared.
#[derive(Clone)]
pub struct CachedCharacterClient {
  inner: CharacterClient,
  cache: CacheLayer,
}

impl CachedCharacterClient {
  pub fn new(inner: CharacterClient, store: Arc<dyn CharacterStore>) -> Self {
    Self {
      inner,
      cache: CacheLayer::new(store),
    }
  }

  /// Base URL of the underlying API
  pub fn base_url(&self) -> &url::Url {
    self.inner.base_url()
  }

  /// List characters, from the snapshot when one exists.
  pub async fn list_characters(&self) -> Result<CacheResult<Vec<Character>>> {
    self
      .cache
      .fetch_list(|| {
        let inner = self.inner.clone();
        async move { inner.list_characters().await }
      })
      .await
  }

  /// Get a character, from the snapshot when it contains `id`.
  pub async fn get_character(&self, id: u64) -> Result<CacheResult<Character>> {
    self
      .cache
      .fetch_one(id, || {
        let inner = self.inner.clone();
        async move { inner.get_character(id).await }
      })
      .await
  }

  /// Create a character; a refused remote create is stored locally.
  pub async fn create_character(&self, new: NewCharacter) -> Result<CreateOutcome> {
    self
      .cache
      .create_with_fallback(new, |new| {
        let inner = self.inner.clone();
        async move { inner.create_character(&new).await }
      })
      .await
  }
}

/// Client whose remote refuses every connection
#[cfg(test)]
pub(crate) fn offline_client(store: Arc<dyn CharacterStore>) -> CachedCharacterClient {
  let inner = CharacterClient::new(&crate::config::ApiConfig {
    base_url: "http://127.0.0.1:1".to_string(),
    timeout_secs: 2,
  })
  .expect("static test URL is valid");
  CachedCharacterClient::new(inner, store)
}
