//! AES-256-GCM sealing of transport credentials.
//!
//! Ciphertexts are hex strings with the 12-byte nonce prepended to the GCM
//! output. The key is the raw 32 bytes of the secret string.

use crate::error::CryptoError;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Decrypt a hex ciphertext produced by [`encrypt`].
pub fn decrypt(secret_key: &str, hex_cipher: &str) -> Result<String, CryptoError> {
    let data = hex::decode(hex_cipher)?;
    let cipher = cipher_for(secret_key)?;
    if data.len() < NONCE_LEN {
        return Err(CryptoError::CiphertextTooShort(data.len()));
    }
    let (nonce, ciphertext) = data.split_at(NONCE_LEN);
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::DecryptFailed)?;
    Ok(String::from_utf8(plaintext)?)
}

/// Encrypt a plaintext under the secret, returning hex with the nonce
/// prepended. Used to produce the ciphertexts stored in configuration.
pub fn encrypt(secret_key: &str, plaintext: &str) -> Result<String, CryptoError> {
    let cipher = cipher_for(secret_key)?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|_| CryptoError::DecryptFailed)?;
    let mut sealed = nonce.to_vec();
    sealed.extend_from_slice(&ciphertext);
    Ok(hex::encode(sealed))
}

fn cipher_for(secret_key: &str) -> Result<Aes256Gcm, CryptoError> {
    let key = secret_key.as_bytes();
    if key.len() != KEY_LEN {
        return Err(CryptoError::InvalidKeyLength(key.len()));
    }
    Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength(key.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn round_trip() {
        let sealed = encrypt(SECRET, "redis.internal:6379").unwrap();
        assert_eq!(decrypt(SECRET, &sealed).unwrap(), "redis.internal:6379");
    }

    #[test]
    fn wrong_key_fails_to_decrypt() {
        let sealed = encrypt(SECRET, "s3cr3t-password").unwrap();
        let other = "fedcba9876543210fedcba9876543210";
        assert!(matches!(
            decrypt(other, &sealed),
            Err(CryptoError::DecryptFailed)
        ));
    }

    #[test]
    fn short_key_is_rejected() {
        assert!(matches!(
            decrypt("short", "00"),
            Err(CryptoError::InvalidKeyLength(5))
        ));
    }

    #[test]
    fn non_hex_input_is_rejected() {
        assert!(matches!(
            decrypt(SECRET, "zz-not-hex"),
            Err(CryptoError::InvalidHex(_))
        ));
    }

    #[test]
    fn truncated_ciphertext_is_rejected() {
        assert!(matches!(
            decrypt(SECRET, "00ff"),
            Err(CryptoError::CiphertextTooShort(2))
        ));
    }
}
