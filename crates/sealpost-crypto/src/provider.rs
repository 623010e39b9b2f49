use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit},
};
use rand_core::{OsRng, RngCore};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{CryptoError, Result};
use crate::hybrid::NONCE_SIZE;
use crate::keys::{KeyPair, PrivateKey, PublicKey, RSA_KEY_BITS, SessionKey};

/// The primitives the hybrid protocol is built from.
///
/// Implementations must be stateless with respect to callers: every method may
/// be invoked concurrently from many threads.
pub trait CryptoProvider: Send + Sync {
    /// Generate an asymmetric key pair usable for both wrap and unwrap.
    fn generate_key_pair(&self) -> Result<KeyPair>;

    /// Fill `buf` from a cryptographically secure random source.
    fn fill_random(&self, buf: &mut [u8]) -> Result<()>;

    /// Asymmetric encryption of a short secret under `public_key`.
    fn oaep_encrypt(&self, public_key: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Inverse of [`oaep_encrypt`](Self::oaep_encrypt). Every failure is [`CryptoError::Decryption`].
    fn oaep_decrypt(&self, private_key: &PrivateKey, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>>;

    /// AEAD encryption. Returns ciphertext with the tag appended.
    fn aead_seal(&self, key: &SessionKey, nonce: &[u8; NONCE_SIZE], plaintext: &[u8]) -> Result<Vec<u8>>;

    /// AEAD decryption. Every failure is [`CryptoError::Integrity`].
    fn aead_open(&self, key: &SessionKey, nonce: &[u8; NONCE_SIZE], ciphertext: &[u8]) -> Result<Vec<u8>>;
}

/// Default provider: RSA-OAEP/SHA-256 and AES-256-GCM from the RustCrypto crates,
/// randomness from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoProvider;

impl CryptoProvider for RustCryptoProvider {
    fn generate_key_pair(&self) -> Result<KeyPair> {
        let private = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS)
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
        let public = RsaPublicKey::from(&private);

        let private_der = private
            .to_pkcs8_der()
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
        let public_der = public
            .to_public_key_der()
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;

        Ok(KeyPair {
            public: PublicKey::from_der(public_der.into_vec()),
            private: PrivateKey::from_der(private_der.as_bytes().to_vec()),
        })
    }

    fn fill_random(&self, buf: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| CryptoError::KeyGeneration(format!("random source unavailable: {}", e)))
    }

    fn oaep_encrypt(&self, public_key: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>> {
        let public = RsaPublicKey::from_public_key_der(public_key.as_der())
            .map_err(|e| CryptoError::Encryption(format!("malformed public key: {}", e)))?;

        public
            .encrypt(&mut OsRng, Oaep::new::<Sha256>(), plaintext)
            .map_err(|e| CryptoError::Encryption(e.to_string()))
    }

    fn oaep_decrypt(&self, private_key: &PrivateKey, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let private = RsaPrivateKey::from_pkcs8_der(private_key.as_der())
            .map_err(|_| CryptoError::Decryption)?;

        private
            .decrypt(Oaep::new::<Sha256>(), ciphertext)
            .map(Zeroizing::new)
            .map_err(|_| CryptoError::Decryption)
    }

    fn aead_seal(&self, key: &SessionKey, nonce: &[u8; NONCE_SIZE], plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

        cipher
            .encrypt(Nonce::from_slice(nonce), plaintext)
            .map_err(|e| CryptoError::Encryption(format!("AES-GCM seal failed: {}", e)))
    }

    fn aead_open(&self, key: &SessionKey, nonce: &[u8; NONCE_SIZE], ciphertext: &[u8]) -> Result<Vec<u8>> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::Integrity)
    }
}
