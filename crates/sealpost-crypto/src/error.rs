use thiserror::Error;

/// Failures surfaced by key handling and the hybrid cipher.
///
/// `Decryption` and `Integrity` carry no detail on purpose: callers must not be
/// able to tell which part of OAEP padding or GCM verification failed.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The random source or the key generation primitive is unavailable.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Wrapping or sealing failed, usually because of malformed key material.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// A wrapped session key did not decrypt under the given private key.
    #[error("decryption failed: wrong key or corrupted data")]
    Decryption,

    /// The authentication tag did not verify. The message must be discarded.
    #[error("message failed integrity check")]
    Integrity,

    /// Caller passed a key or nonce of the wrong size.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Key material could not be imported from its portable encoding.
    #[error("invalid key encoding: {0}")]
    KeyEncoding(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
