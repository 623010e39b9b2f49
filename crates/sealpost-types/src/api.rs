use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use serde::{Deserialize, Serialize};

use crate::models::{KeyExchangeEnvelope, MessageEnvelope};

/// A byte field on the wire was not valid base64.
#[derive(Debug, thiserror::Error)]
#[error("field `{field}` is not valid base64: {source}")]
pub struct WireError {
    pub field: &'static str,
    #[source]
    pub source: base64::DecodeError,
}

fn decode(field: &'static str, value: &str) -> Result<Vec<u8>, WireError> {
    B64.decode(value).map_err(|source| WireError { field, source })
}

// -- Messages --

/// JSON shape of a message envelope, used both for `POST /api/messages`
/// and for each element returned by `GET /api/messages/{user_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageDto {
    pub sender_id: String,
    pub recipient_id: String,
    pub nonce: String,
    pub ciphertext: String,
}

impl MessageDto {
    pub fn into_envelope(self) -> Result<MessageEnvelope, WireError> {
        Ok(MessageEnvelope {
            nonce: decode("nonce", &self.nonce)?,
            ciphertext: decode("ciphertext", &self.ciphertext)?,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
        })
    }
}

impl From<MessageEnvelope> for MessageDto {
    fn from(env: MessageEnvelope) -> Self {
        Self {
            sender_id: env.sender_id,
            recipient_id: env.recipient_id,
            nonce: B64.encode(&env.nonce),
            ciphertext: B64.encode(&env.ciphertext),
        }
    }
}

// -- Key exchange --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyExchangeDto {
    pub sender_id: String,
    pub recipient_id: String,
    pub wrapped_key: String,
}

impl KeyExchangeDto {
    pub fn into_envelope(self) -> Result<KeyExchangeEnvelope, WireError> {
        Ok(KeyExchangeEnvelope {
            wrapped_key: decode("wrapped_key", &self.wrapped_key)?,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
        })
    }
}

impl From<KeyExchangeEnvelope> for KeyExchangeDto {
    fn from(env: KeyExchangeEnvelope) -> Self {
        Self {
            sender_id: env.sender_id,
            recipient_id: env.recipient_id,
            wrapped_key: B64.encode(&env.wrapped_key),
        }
    }
}

// -- Health --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub recipients: usize,
    pub pending_messages: usize,
    pub pending_key_exchanges: usize,
}
