use serde::{Deserialize, Serialize};

/// An encrypted message waiting in a recipient's queue.
/// The relay only sees ciphertext — never plaintext or the session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub sender_id: String,
    pub recipient_id: String,
    /// 96-bit AES-GCM nonce, unique per message under a session key.
    pub nonce: Vec<u8>,
    /// Ciphertext with the 128-bit authentication tag appended.
    pub ciphertext: Vec<u8>,
}

/// A session key wrapped with the recipient's public key.
/// At most one is outstanding per recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyExchangeEnvelope {
    pub sender_id: String,
    pub recipient_id: String,
    pub wrapped_key: Vec<u8>,
}
