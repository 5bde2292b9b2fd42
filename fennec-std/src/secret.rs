//! Authenticated secret sealing.
//!
//! [`SecretBox`] wraps AES-256-GCM behind a string-to-string API: `seal`
//! produces a base64 payload with the random nonce prefixed, `open` reverses
//! it. The ciphertext is authenticated, so any tampering with the payload
//! (nonce included) fails the open.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use fennec_core::SecretError;

const NONCE_LEN: usize = 12;

/// Seals and opens short secrets under a fixed 32-byte key.
pub struct SecretBox {
    cipher: Aes256Gcm,
}

impl SecretBox {
    /// Create a box over exactly 32 bytes of key material.
    pub fn new(key: &[u8]) -> Result<Self, SecretError> {
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| SecretError::BadKey)?;
        Ok(Self { cipher })
    }

    /// Encrypt and authenticate, returning a base64 payload.
    ///
    /// A fresh random nonce is drawn per call and prefixed to the
    /// ciphertext, so sealing the same plaintext twice yields different
    /// payloads.
    pub fn seal(&self, plaintext: &str) -> Result<String, SecretError> {
        let nonce_bytes: [u8; NONCE_LEN] = rand::random();
        let nonce = Nonce::from_slice(&nonce_bytes);
        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| SecretError::Opaque)?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce_bytes);
        payload.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(payload))
    }

    /// Decrypt and verify a payload produced by [`SecretBox::seal`].
    pub fn open(&self, sealed: &str) -> Result<String, SecretError> {
        let payload = STANDARD
            .decode(sealed)
            .map_err(|_| SecretError::Malformed)?;
        if payload.len() <= NONCE_LEN {
            return Err(SecretError::Malformed);
        }
        let (nonce_bytes, ciphertext) = payload.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);
        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| SecretError::Opaque)?;
        String::from_utf8(plaintext).map_err(|_| SecretError::Malformed)
    }
}
