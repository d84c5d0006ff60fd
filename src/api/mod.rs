//! Client for the Simpsons characters REST API.
//!
//! `CharacterClient` issues the raw HTTP calls. `CachedCharacterClient` puts
//! the local snapshot in front of it and is what the views hold.

pub mod cached_client;
pub mod client;
pub mod error;
pub mod types;

pub use cached_client::CachedCharacterClient;
pub use client::CharacterClient;
pub use error::TransportError;
pub use types::{Character, NewCharacter, Place};
