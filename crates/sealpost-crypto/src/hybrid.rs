use zeroize::Zeroizing;

use crate::error::{CryptoError, Result};
use crate::keys::{KeyPair, PrivateKey, PublicKey, SESSION_KEY_SIZE, SessionKey};
use crate::provider::{CryptoProvider, RustCryptoProvider};

/// AES-GCM nonce size (96 bits).
pub const NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag size (128 bits), appended to every ciphertext.
pub const TAG_SIZE: usize = 16;

/// Output of [`HybridCipher::encrypt`]: the nonce travels next to the ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub nonce: [u8; NONCE_SIZE],
    pub ciphertext: Vec<u8>,
}

/// Session key transport plus per-message authenticated encryption.
///
/// Stateless: a single instance can be shared across threads, and every call
/// draws its own randomness from the provider.
#[derive(Debug, Clone, Default)]
pub struct HybridCipher<P = RustCryptoProvider> {
    provider: P,
}

impl HybridCipher<RustCryptoProvider> {
    pub fn new() -> Self {
        Self::with_provider(RustCryptoProvider)
    }
}

impl<P: CryptoProvider> HybridCipher<P> {
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn generate_key_pair(&self) -> Result<KeyPair> {
        self.provider.generate_key_pair()
    }

    /// Draw a fresh 256-bit key for a new conversation.
    pub fn generate_session_key(&self) -> Result<SessionKey> {
        let mut bytes = Zeroizing::new([0u8; SESSION_KEY_SIZE]);
        self.provider.fill_random(bytes.as_mut_slice())?;
        Ok(SessionKey::from_bytes(*bytes))
    }

    /// Encrypt the raw session key to `recipient` so only its private key can recover it.
    pub fn wrap_key(&self, key: &SessionKey, recipient: &PublicKey) -> Result<Vec<u8>> {
        self.provider.oaep_encrypt(recipient, key.as_bytes())
    }

    /// Recover a session key wrapped by [`wrap_key`](Self::wrap_key).
    pub fn unwrap_key(&self, wrapped: &[u8], own: &PrivateKey) -> Result<SessionKey> {
        let raw = self.provider.oaep_decrypt(own, wrapped)?;
        // A well-formed OAEP payload of the wrong size is still not a key we issued.
        SessionKey::from_slice(&raw).map_err(|_| CryptoError::Decryption)
    }

    /// Encrypt `plaintext` under `key` with a freshly drawn random nonce.
    pub fn encrypt(&self, plaintext: &[u8], key: &SessionKey) -> Result<Sealed> {
        let mut nonce = [0u8; NONCE_SIZE];
        self.provider.fill_random(&mut nonce)?;

        let ciphertext = self.provider.aead_seal(key, &nonce, plaintext)?;
        Ok(Sealed { nonce, ciphertext })
    }

    /// Verify and decrypt. On [`CryptoError::Integrity`] the whole message must be
    /// discarded; no partial plaintext is ever returned.
    pub fn decrypt(&self, nonce: &[u8], ciphertext: &[u8], key: &SessionKey) -> Result<Vec<u8>> {
        let nonce: &[u8; NONCE_SIZE] = nonce
            .try_into()
            .map_err(|_| CryptoError::InvalidArgument("nonce must be 96 bits"))?;

        if ciphertext.len() < TAG_SIZE {
            return Err(CryptoError::Integrity);
        }

        self.provider.aead_open(key, nonce, ciphertext)
    }
}
