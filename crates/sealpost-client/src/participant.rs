use std::collections::HashMap;

use tracing::{debug, info, warn};

use sealpost_crypto::{
    CryptoError, CryptoProvider, HybridCipher, KeyPair, PublicKey, RustCryptoProvider, SessionKey,
};
use sealpost_types::{KeyExchangeEnvelope, MessageEnvelope};

use crate::error::ClientError;
use crate::transport::RelayTransport;

/// One envelope from a drained queue, after decryption was attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    Message { sender_id: String, plaintext: Vec<u8> },
    /// Not trustworthy. No plaintext is kept, not even partially.
    Rejected { sender_id: String, reason: RejectReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No session key is known for the sender.
    NoSession,
    /// The authentication tag did not verify: tampered, wrong key or wrong nonce.
    Tampered,
    /// The envelope itself was malformed (e.g. a nonce of the wrong size).
    Malformed,
}

/// A user of the relay: a key pair plus the session keys established with peers.
///
/// The private key and session keys only ever live here.
pub struct Participant<P = RustCryptoProvider> {
    user_id: String,
    key_pair: KeyPair,
    cipher: HybridCipher<P>,
    /// peer_id -> session key for that conversation.
    sessions: HashMap<String, SessionKey>,
}

impl Participant<RustCryptoProvider> {
    /// Create a participant with a freshly generated key pair.
    pub fn generate(user_id: impl Into<String>) -> Result<Self, ClientError> {
        let cipher = HybridCipher::new();
        let key_pair = cipher.generate_key_pair()?;
        Ok(Self::with_key_pair(user_id, key_pair, cipher))
    }
}

impl<P: CryptoProvider> Participant<P> {
    pub fn with_key_pair(user_id: impl Into<String>, key_pair: KeyPair, cipher: HybridCipher<P>) -> Self {
        Self {
            user_id: user_id.into(),
            key_pair,
            cipher,
            sessions: HashMap::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.key_pair.public
    }

    pub fn has_session(&self, peer_id: &str) -> bool {
        self.sessions.contains_key(peer_id)
    }

    /// Start a conversation: draw a session key, wrap it for the peer and post it.
    /// Replaces any session previously held with that peer.
    pub async fn offer_session<T: RelayTransport>(
        &mut self,
        transport: &T,
        peer_id: &str,
        peer_public: &PublicKey,
    ) -> Result<(), ClientError> {
        let key = self.cipher.generate_session_key()?;
        let wrapped_key = self.cipher.wrap_key(&key, peer_public)?;

        transport
            .post_key_exchange(KeyExchangeEnvelope {
                sender_id: self.user_id.clone(),
                recipient_id: peer_id.to_string(),
                wrapped_key,
            })
            .await?;

        info!("{} offered a session to {} ({})", self.user_id, peer_id, peer_public.fingerprint());
        self.sessions.insert(peer_id.to_string(), key);
        Ok(())
    }

    /// Pick up a pending key offer, if any. Returns the peer it came from.
    ///
    /// The offer is consumed by the fetch; if it cannot be unwrapped the peer
    /// has to offer again.
    pub async fn accept_session<T: RelayTransport>(
        &mut self,
        transport: &T,
    ) -> Result<Option<String>, ClientError> {
        let Some(offer) = transport.get_key_exchange(&self.user_id).await? else {
            return Ok(None);
        };

        let key = self
            .cipher
            .unwrap_key(&offer.wrapped_key, &self.key_pair.private)
            .inspect_err(|_| warn!("{} could not unwrap key offer from {}", self.user_id, offer.sender_id))?;

        info!("{} accepted a session from {}", self.user_id, offer.sender_id);
        self.sessions.insert(offer.sender_id.clone(), key);
        Ok(Some(offer.sender_id))
    }

    /// Encrypt `plaintext` for an established peer and post it.
    pub async fn send<T: RelayTransport>(
        &self,
        transport: &T,
        peer_id: &str,
        plaintext: &[u8],
    ) -> Result<(), ClientError> {
        let key = self
            .sessions
            .get(peer_id)
            .ok_or_else(|| ClientError::NoSession(peer_id.to_string()))?;

        let sealed = self.cipher.encrypt(plaintext, key)?;
        transport
            .post_message(MessageEnvelope {
                sender_id: self.user_id.clone(),
                recipient_id: peer_id.to_string(),
                nonce: sealed.nonce.to_vec(),
                ciphertext: sealed.ciphertext,
            })
            .await?;

        debug!("{} sent {} bytes to {}", self.user_id, plaintext.len(), peer_id);
        Ok(())
    }

    /// Drain the queue and decrypt each envelope on its own. A bad envelope is
    /// reported as [`Received::Rejected`] and never affects the others.
    pub async fn receive<T: RelayTransport>(&self, transport: &T) -> Result<Vec<Received>, ClientError> {
        let envelopes = transport.get_messages(&self.user_id).await?;
        Ok(envelopes.into_iter().map(|env| self.open(env)).collect())
    }

    fn open(&self, envelope: MessageEnvelope) -> Received {
        let sender_id = envelope.sender_id;

        let Some(key) = self.sessions.get(&sender_id) else {
            warn!("{} dropped a message from {}: no session", self.user_id, sender_id);
            return Received::Rejected { sender_id, reason: RejectReason::NoSession };
        };

        match self.cipher.decrypt(&envelope.nonce, &envelope.ciphertext, key) {
            Ok(plaintext) => Received::Message { sender_id, plaintext },
            Err(e) => {
                warn!("{} dropped a message from {}: {}", self.user_id, sender_id, e);
                let reason = match e {
                    CryptoError::InvalidArgument(_) => RejectReason::Malformed,
                    _ => RejectReason::Tampered,
                };
                Received::Rejected { sender_id, reason }
            }
        }
    }
}

impl<P> std::fmt::Debug for Participant<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Participant")
            .field("user_id", &self.user_id)
            .field("public_key", &self.key_pair.public)
            .field("sessions", &self.sessions.keys().collect::<Vec<_>>())
            .finish()
    }
}
