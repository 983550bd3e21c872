// Chat message encryption
//
// Both sides convert their ed25519 keys to X25519, agree on a shared secret
// and seal the message with ChaCha20-Poly1305. The random nonce travels as
// `own_message`, the ciphertext as `message`, both hex encoded.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::{rngs::OsRng, RngCore};
use x25519_dalek::PublicKey as X25519PublicKey;
use zeroize::Zeroizing;

use super::{hash, CryptoError, KeyPair, PublicKey};

pub const NONCE_SIZE: usize = 12;

/// Encrypted chat payload as carried by a chat transaction asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMessage {
    pub message: String,
    pub own_message: String,
}

fn shared_cipher(key_pair: &KeyPair, other: &PublicKey) -> ChaCha20Poly1305 {
    let their_public = X25519PublicKey::from(other.to_montgomery().to_bytes());
    let shared = key_pair
        .diffie_hellman_secret()
        .diffie_hellman(&their_public);
    let key = Zeroizing::new(hash(shared.as_bytes()));

    ChaCha20Poly1305::new(Key::from_slice(key.as_slice()))
}

/// Encrypt `message` from `key_pair` to the owner of `recipient`.
pub fn encode_message(
    message: &str,
    key_pair: &KeyPair,
    recipient: &PublicKey,
) -> Result<EncodedMessage, CryptoError> {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = shared_cipher(key_pair, recipient)
        .encrypt(Nonce::from_slice(&nonce), message.as_bytes())
        .map_err(|_| CryptoError::EncryptionFailed)?;

    Ok(EncodedMessage {
        message: hex::encode(ciphertext),
        own_message: hex::encode(nonce),
    })
}

/// Decrypt a message sent by the owner of `sender` to `key_pair`.
pub fn decode_message(
    message: &str,
    own_message: &str,
    key_pair: &KeyPair,
    sender: &PublicKey,
) -> Result<String, CryptoError> {
    let ciphertext = hex::decode(message).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
    let nonce = hex::decode(own_message).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;

    if nonce.len() != NONCE_SIZE {
        return Err(CryptoError::InvalidNonceLength {
            len: nonce.len(),
            expected: NONCE_SIZE,
        });
    }

    let plaintext = shared_cipher(key_pair, sender)
        .decrypt(Nonce::from_slice(&nonce), ciphertext.as_slice())
        .map_err(|_| CryptoError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidUtf8)
}
