//! Envelope models and JSON wire types shared by the relay and its clients.
//!
//! The relay only ever handles the byte fields here as opaque data. Base64 is
//! strictly a transport concern and lives in [`api`].

pub mod api;
pub mod models;

pub use models::{KeyExchangeEnvelope, MessageEnvelope};
