//! Sealpost Crypto Library
//!
//! Hybrid encryption between two parties:
//! - RSA-2048 OAEP/SHA-256 wraps a fresh 256-bit session key for the recipient
//! - AES-256-GCM encrypts each message under that session key with a random 96-bit nonce
//!
//! All primitives sit behind [`CryptoProvider`] so the protocol logic in
//! [`HybridCipher`] can run against a substitute implementation.
//! This crate never logs and never persists key material.

pub mod error;
pub mod hybrid;
pub mod keys;
pub mod provider;

pub use error::{CryptoError, Result};
pub use hybrid::{HybridCipher, NONCE_SIZE, Sealed, TAG_SIZE};
pub use keys::{KeyPair, PrivateKey, PublicKey, RSA_KEY_BITS, SESSION_KEY_SIZE, SessionKey};
pub use provider::{CryptoProvider, RustCryptoProvider};
