// spotvault - core/secret.rs
//
// Per-field string encryption for the profile store.
// Core layer: operates on a caller-supplied key, never touches the
// filesystem — key acquisition (machine key file, fallback derivation)
// lives in platform::keys.
//
// Sealed values are `ENC::` + Base64(nonce || AES-256-GCM ciphertext).
// The marker prefix is the encryption-state flag: sealing an already-marked
// value is a no-op and opening an unmarked value passes it through, so the
// pipeline is idempotent in both directions without probing ciphertext.

use crate::util::constants::{FIELD_KEY_LEN, FIELD_NONCE_LEN, SEALED_PREFIX};
use crate::util::error::SecretError;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::Rng;

/// Symmetric cipher bound to one 256-bit key for the lifetime of a run.
pub struct FieldCipher {
    key: [u8; FIELD_KEY_LEN],
}

impl FieldCipher {
    pub fn new(key: [u8; FIELD_KEY_LEN]) -> Self {
        Self { key }
    }

    /// Returns true when `value` carries the sealed marker.
    pub fn is_sealed(value: &str) -> bool {
        value.starts_with(SEALED_PREFIX)
    }

    /// Encrypt a field value.
    ///
    /// Empty input stays empty and an already-sealed value is returned
    /// unchanged, so repeated sealing cannot double-encrypt.
    pub fn seal(&self, plain: &str) -> Result<String, SecretError> {
        if plain.is_empty() || Self::is_sealed(plain) {
            return Ok(plain.to_string());
        }

        let nonce_bytes: [u8; FIELD_NONCE_LEN] = rand::thread_rng().gen();
        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|_| SecretError::Cipher { phase: "key setup" })?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plain.as_bytes())
            .map_err(|_| SecretError::Cipher { phase: "encrypt" })?;

        let mut combined = Vec::with_capacity(FIELD_NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);

        Ok(format!("{SEALED_PREFIX}{}", BASE64.encode(combined)))
    }

    /// Decrypt a field value.
    ///
    /// Values without the sealed marker are returned unchanged (plaintext
    /// passthrough for stores written before encryption was enabled).
    pub fn open(&self, value: &str) -> Result<String, SecretError> {
        if !Self::is_sealed(value) {
            return Ok(value.to_string());
        }

        let encoded = &value[SEALED_PREFIX.len()..];
        let combined = BASE64
            .decode(encoded)
            .map_err(|source| SecretError::Decode { source })?;

        if combined.len() < FIELD_NONCE_LEN {
            return Err(SecretError::TooShort {
                len: combined.len(),
            });
        }

        let (nonce_bytes, ciphertext) = combined.split_at(FIELD_NONCE_LEN);
        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|_| SecretError::Cipher { phase: "key setup" })?;
        let nonce = Nonce::from_slice(nonce_bytes);

        let plain = cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| SecretError::Cipher { phase: "decrypt" })?;

        String::from_utf8(plain).map_err(|source| SecretError::Utf8 { source })
    }
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> FieldCipher {
        FieldCipher::new([7u8; FIELD_KEY_LEN])
    }

    #[test]
    fn test_seal_open_round_trip() {
        let c = cipher();
        let sealed = c.seal("hello spotlight").unwrap();
        assert!(FieldCipher::is_sealed(&sealed));
        assert_ne!(sealed, "hello spotlight");
        assert_eq!(c.open(&sealed).unwrap(), "hello spotlight");
    }

    #[test]
    fn test_empty_string_round_trips_as_empty() {
        let c = cipher();
        assert_eq!(c.seal("").unwrap(), "");
        assert_eq!(c.open("").unwrap(), "");
    }

    #[test]
    fn test_seal_is_idempotent() {
        let c = cipher();
        let once = c.seal("value").unwrap();
        let twice = c.seal(&once).unwrap();
        assert_eq!(once, twice, "sealing a sealed value must be a no-op");
        assert_eq!(c.open(&twice).unwrap(), "value");
    }

    #[test]
    fn test_open_passes_plaintext_through() {
        let c = cipher();
        assert_eq!(c.open("not sealed at all").unwrap(), "not sealed at all");
    }

    #[test]
    fn test_wrong_key_fails_cleanly() {
        let sealed = cipher().seal("secret").unwrap();
        let other = FieldCipher::new([9u8; FIELD_KEY_LEN]);
        assert!(matches!(
            other.open(&sealed),
            Err(SecretError::Cipher { phase: "decrypt" })
        ));
    }

    #[test]
    fn test_garbage_after_marker_is_rejected() {
        let c = cipher();
        assert!(matches!(
            c.open("ENC::!!!not-base64!!!"),
            Err(SecretError::Decode { .. })
        ));
        // Valid Base64 but shorter than a nonce.
        assert!(matches!(
            c.open("ENC::AAAA"),
            Err(SecretError::TooShort { .. })
        ));
    }
}
