use thiserror::Error;

/// Errors that can occur during key, address or message operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid hexadecimal string format
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// Public key bytes are not a valid ed25519 point
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Address string is malformed or invalid
    #[error("Invalid address format: {0}")]
    InvalidAddress(String),

    /// Nonce has invalid length
    #[error("Invalid nonce length: {len} bytes, expected: {expected} bytes")]
    InvalidNonceLength { len: usize, expected: usize },

    #[error("Message encryption failed")]
    EncryptionFailed,

    /// Wrong key pair or tampered ciphertext
    #[error("Message decryption failed")]
    DecryptionFailed,

    #[error("Decrypted message is not valid UTF-8")]
    InvalidUtf8,
}
