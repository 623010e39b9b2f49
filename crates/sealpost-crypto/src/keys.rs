use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, Result};

/// Size of an AES-256 session key in bytes.
pub const SESSION_KEY_SIZE: usize = 32;

/// Modulus size for generated RSA key pairs.
pub const RSA_KEY_BITS: usize = 2048;

const PUBLIC_KEY_TAG: &str = "PUBLIC KEY";
const PRIVATE_KEY_TAG: &str = "PRIVATE KEY";

/// A 256-bit symmetric key for one conversation.
/// Only ever held in sender/recipient memory or inside a wrapped envelope.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; SESSION_KEY_SIZE]);

impl SessionKey {
    pub fn from_bytes(bytes: [u8; SESSION_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Build a key from an untrusted slice. Anything but 32 bytes is rejected.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let key: [u8; SESSION_KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidArgument("session key must be 256 bits"))?;
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; SESSION_KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

/// Public half of a key pair, as SubjectPublicKeyInfo DER.
/// Freely shareable; the relay stores nothing about it.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(Vec<u8>);

impl PublicKey {
    pub fn from_der(der: Vec<u8>) -> Self {
        Self(der)
    }

    pub fn as_der(&self) -> &[u8] {
        &self.0
    }

    pub fn to_pem(&self) -> String {
        pem::encode(&pem::Pem::new(PUBLIC_KEY_TAG, self.0.clone()))
    }

    pub fn from_pem(pem_str: &str) -> Result<Self> {
        decode_pem(pem_str, PUBLIC_KEY_TAG).map(Self)
    }

    /// Encode for sharing through a text channel.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    pub fn from_base64(encoded: &str) -> Result<Self> {
        let der = BASE64
            .decode(encoded)
            .map_err(|e| CryptoError::KeyEncoding(e.to_string()))?;
        Ok(Self(der))
    }

    /// Short SHA-256 fingerprint for comparing keys out of band.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(&self.0);
        digest[..8]
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.fingerprint())
    }
}

/// Private half of a key pair, as PKCS#8 DER. Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(Vec<u8>);

impl PrivateKey {
    pub fn from_der(der: Vec<u8>) -> Self {
        Self(der)
    }

    pub fn as_der(&self) -> &[u8] {
        &self.0
    }

    pub fn to_pem(&self) -> String {
        pem::encode(&pem::Pem::new(PRIVATE_KEY_TAG, self.0.clone()))
    }

    pub fn from_pem(pem_str: &str) -> Result<Self> {
        decode_pem(pem_str, PRIVATE_KEY_TAG).map(Self)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

fn decode_pem(pem_str: &str, expected_tag: &str) -> Result<Vec<u8>> {
    let parsed = pem::parse(pem_str)
        .map_err(|e| CryptoError::KeyEncoding(format!("failed to parse PEM: {}", e)))?;

    if parsed.tag() != expected_tag {
        return Err(CryptoError::KeyEncoding(format!(
            "expected PEM tag '{}', got '{}'",
            expected_tag,
            parsed.tag()
        )));
    }

    Ok(parsed.into_contents())
}
