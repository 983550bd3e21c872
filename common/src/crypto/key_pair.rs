use ed25519_dalek::{Signer, SigningKey, Verifier, PUBLIC_KEY_LENGTH};
use std::fmt;
use x25519_dalek::StaticSecret;
use zeroize::Zeroizing;

use super::{hash, Address, CryptoError, PublicKey, Signature};

/// Ed25519 key pair of an account.
///
/// Key pairs are derived deterministically from a passphrase so that the same
/// passphrase always yields the same address across test runs.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    pub fn from_passphrase(passphrase: &str) -> Self {
        let seed = Zeroizing::new(hash(passphrase.as_bytes()));
        Self::from_seed(&seed)
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        self.signing_key.verifying_key()
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key().as_bytes())
    }

    pub fn address(&self) -> Address {
        Address::from_public_key(&self.public_key())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }

    // Montgomery form of the secret scalar, used for message encryption
    pub(crate) fn diffie_hellman_secret(&self) -> StaticSecret {
        StaticSecret::from(self.signing_key.to_scalar_bytes())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_hex())
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Parse a hex encoded ed25519 public key.
pub fn public_key_from_hex(value: &str) -> Result<PublicKey, CryptoError> {
    let bytes = hex::decode(value).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
    let bytes: [u8; PUBLIC_KEY_LENGTH] = bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidPublicKey)?;

    PublicKey::from_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)
}

/// Check a detached signature against a public key.
pub fn verify_signature(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    public_key.verify(message, signature).is_ok()
}
