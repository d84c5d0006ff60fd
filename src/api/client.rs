use crate::api::error::TransportError;
use crate::api::types::{Character, NewCharacter};
use crate::config::ApiConfig;
use reqwest::header;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("springfield/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the characters API.
///
/// Every call is a single attempt: no retries, no pagination.
#[derive(Debug, Clone)]
pub struct CharacterClient {
  http: reqwest::Client,
  base_url: Url,
}

impl CharacterClient {
  pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
    let base_url = parse_base_url(&config.base_url)?;

    let mut headers = header::HeaderMap::new();
    headers.insert(
      header::CONTENT_TYPE,
      header::HeaderValue::from_static("application/json"),
    );

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(USER_AGENT)
      .default_headers(headers)
      .build()?;

    Ok(Self { http, base_url })
  }

  /// The base URL all endpoints are resolved against
  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  /// Get all characters
  pub async fn list_characters(&self) -> Result<Vec<Character>, TransportError> {
    let url = self.endpoint("characters")?;
    debug!(%url, "listing characters");
    self.send(self.http.get(url)).await
  }

  /// Get a single character by id
  pub async fn get_character(&self, id: u64) -> Result<Character, TransportError> {
    let url = self.endpoint(&format!("characters/{}", id))?;
    debug!(%url, "fetching character");
    self.send(self.http.get(url)).await
  }

  /// Create a character.
  ///
  /// The public API is read-only, so this normally fails.
  pub async fn create_character(&self, character: &NewCharacter) -> Result<Character, TransportError> {
    let url = self.endpoint("characters")?;
    debug!(%url, name = %character.name, "creating character");
    self.send(self.http.post(url).json(character)).await
  }

  fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
    Ok(self.base_url.join(path)?)
  }

  async fn send<T: DeserializeOwned>(
    &self,
    request: reqwest::RequestBuilder,
  ) -> Result<T, TransportError> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
      return Err(TransportError::Http {
        status: status.as_u16(),
      });
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| TransportError::Parse(e.to_string()))
  }
}

/// Parse the configured base URL so that relative joins append to its path.
///
/// `https://host/simpsons` joined with `characters` would otherwise drop the
/// last segment.
fn parse_base_url(raw: &str) -> Result<Url, TransportError> {
  let trimmed = raw.trim();
  let with_slash = if trimmed.ends_with('/') {
    trimmed.to_string()
  } else {
    format!("{}/", trimmed)
  };

  let url = Url::parse(&with_slash)?;
  if url.cannot_be_a_base() {
    return Err(TransportError::InvalidUrl(raw.to_string()));
  }
  Ok(url)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn config(base_url: &str) -> ApiConfig {
    ApiConfig {
      base_url: base_url.to_string(),
      timeout_secs: 2,
    }
  }

  #[test]
  fn test_endpoint_keeps_base_path() {
    let client = CharacterClient::new(&config("https://api.sampleapis.com/simpsons")).unwrap();
    assert_eq!(
      client.endpoint("characters").unwrap().as_str(),
      "https://api.sampleapis.com/simpsons/characters"
    );
    assert_eq!(
      client.endpoint("characters/7").unwrap().as_str(),
      "https://api.sampleapis.com/simpsons/characters/7"
    );
  }

  #[test]
  fn test_trailing_slash_is_not_doubled() {
    let url = parse_base_url("http://localhost:8080/api/").unwrap();
    assert_eq!(url.as_str(), "http://localhost:8080/api/");
  }

  #[test]
  fn test_invalid_base_url() {
    let err = CharacterClient::new(&config("no scheme here")).unwrap_err();
    assert!(matches!(err, TransportError::InvalidUrl(_)));

    let err = parse_base_url("mailto:someone@example.com").unwrap_err();
    assert!(matches!(err, TransportError::InvalidUrl(_)));
  }

  #[tokio::test]
  async fn test_unreachable_remote_is_transport_error() {
    let client = CharacterClient::new(&config("http://127.0.0.1:1")).unwrap();

    let err = client.list_characters().await.unwrap_err();
    assert!(matches!(
      err,
      TransportError::Network(_) | TransportError::Timeout
    ));

    let err = client.get_character(1).await.unwrap_err();
    assert!(matches!(
      err,
      TransportError::Network(_) | TransportError::Timeout
    ));
  }
}
