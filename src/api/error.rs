//! Transport error type for the characters API.

use std::sync::Arc;

/// Any failure talking to the remote API.
///
/// A missing character is reported as `Http { status: 404 }`; callers get no
/// separate not-found kind.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
  /// The configured base URL cannot be used to build request URLs.
  #[error("invalid base URL: {0}")]
  InvalidUrl(String),

  /// Request did not complete within the configured timeout.
  #[error("request timeout")]
  Timeout,

  /// Non-success HTTP response.
  #[error("HTTP error: {status}")]
  Http { status: u16 },

  /// Connection or protocol failure.
  #[error("network error: {0}")]
  Network(Arc<reqwest::Error>),

  /// Response body was not the expected JSON.
  #[error("parse error: {0}")]
  Parse(String),
}

impl From<reqwest::Error> for TransportError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_timeout() {
      TransportError::Timeout
    } else if let Some(status) = err.status() {
      TransportError::Http {
        status: status.as_u16(),
      }
    } else {
      TransportError::Network(Arc::new(err))
    }
  }
}

impl From<url::ParseError> for TransportError {
  fn from(err: url::ParseError) -> Self {
    TransportError::InvalidUrl(err.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_display() {
    let err = TransportError::Http { status: 404 };
    assert_eq!(err.to_string(), "HTTP error: 404");

    let err = TransportError::Parse("expected value".to_string());
    assert!(err.to_string().contains("parse error"));
  }

  #[test]
  fn test_url_parse_error_maps_to_invalid_url() {
    let err: TransportError = url::Url::parse("not a url").unwrap_err().into();
    assert!(matches!(err, TransportError::InvalidUrl(_)));
  }
}
