use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error, Formatter},
    str::FromStr,
};

use super::{short_id, CryptoError, PublicKey};

// Every address starts with this prefix followed by a decimal number
pub const ADDRESS_PREFIX: char = 'U';

/// Account address in `U<decimal>` form, derived from a public key.
#[derive(Eq, PartialEq, PartialOrd, Ord, Clone, Debug, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address {
    value: u64,
}

impl Address {
    pub const fn new(value: u64) -> Self {
        Self { value }
    }

    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Self::new(short_id(public_key.as_bytes()))
    }

    // Numeric part of the address, used in the transaction byte encoding
    pub fn as_u64(&self) -> u64 {
        self.value
    }
}

impl FromStr for Address {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(ADDRESS_PREFIX)
            .ok_or_else(|| CryptoError::InvalidAddress(s.to_string()))?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CryptoError::InvalidAddress(s.to_string()));
        }

        digits
            .parse::<u64>()
            .map(Self::new)
            .map_err(|_| CryptoError::InvalidAddress(s.to_string()))
    }
}

impl TryFrom<String> for Address {
    type Error = CryptoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}{}", ADDRESS_PREFIX, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;

    #[test]
    fn test_address_roundtrip_through_string() {
        let address = Address::new(12345678901234);
        assert_eq!(address.to_string(), "U12345678901234");
        assert_eq!("U12345678901234".parse::<Address>().unwrap(), address);
    }

    #[test]
    fn test_invalid_addresses() {
        assert!("12345".parse::<Address>().is_err());
        assert!("U".parse::<Address>().is_err());
        assert!("U12a45".parse::<Address>().is_err());
        assert!("U+1245".parse::<Address>().is_err());
        assert!("U99999999999999999999999".parse::<Address>().is_err());
    }

    #[test]
    fn test_address_is_derived_from_public_key() {
        let key_pair = KeyPair::from_passphrase("my fake passphrase");
        let first = Address::from_public_key(&key_pair.public_key());
        let second = KeyPair::from_passphrase("my fake passphrase").address();
        assert_eq!(first, second);

        let other = KeyPair::from_passphrase("another passphrase").address();
        assert_ne!(first, other);
    }

    #[test]
    fn test_address_serde() {
        let address = Address::new(42);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"U42\"");

        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, address);

        assert!(serde_json::from_str::<Address>("\"X42\"").is_err());
    }
}
