use serde::{Deserialize, Serialize};
use std::ops::Deref;
use thiserror::Error;

use crate::{
    crypto::{hash, public_key_from_hex, short_id, verify_signature, Address, CryptoError, Signature},
    time::EpochSeconds,
};

mod builder;

pub use builder::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Unknown transaction type: {0}")]
    UnknownTransactionType(u8),
    #[error("Unknown message type: {0}")]
    UnknownMessageType(u8),
    #[error("Invalid signature encoding")]
    InvalidSignature,
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Transaction type discriminator as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum TransactionType {
    Send,
    ChatMessage,
}

impl From<TransactionType> for u8 {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Send => 0,
            TransactionType::ChatMessage => 8,
        }
    }
}

impl TryFrom<u8> for TransactionType {
    type Error = TransactionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Send),
            8 => Ok(Self::ChatMessage),
            other => Err(TransactionError::UnknownTransactionType(other)),
        }
    }
}

/// Chat message subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum MessageType {
    /// Plain text message
    Chat,
    /// JSON payload, e.g. a simulated token transfer
    Rich,
}

impl From<MessageType> for u8 {
    fn from(value: MessageType) -> Self {
        match value {
            MessageType::Chat => 1,
            MessageType::Rich => 2,
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = TransactionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Chat),
            2 => Ok(Self::Rich),
            other => Err(TransactionError::UnknownMessageType(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAsset {
    pub message: String,
    pub own_message: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAsset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<ChatAsset>,
}

/// A signed transaction as built by a client, before any node has seen it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTransaction {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: u64,
    pub sender_id: Address,
    pub sender_public_key: String,
    pub recipient_id: Address,
    pub timestamp: EpochSeconds,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub asset: TransactionAsset,
}

impl ChatTransaction {
    pub fn chat(&self) -> Option<&ChatAsset> {
        self.asset.chat.as_ref()
    }

    // Canonical byte encoding: every field in a fixed order, strings length-prefixed
    pub fn to_bytes(&self, with_signature: bool) -> Vec<u8> {
        fn write_str(bytes: &mut Vec<u8>, value: &str) {
            bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
            bytes.extend_from_slice(value.as_bytes());
        }

        let mut bytes = Vec::with_capacity(256);
        bytes.push(self.transaction_type.into());
        bytes.extend_from_slice(&self.timestamp.to_le_bytes());
        write_str(&mut bytes, &self.sender_public_key);
        bytes.extend_from_slice(&self.sender_id.as_u64().to_be_bytes());
        bytes.extend_from_slice(&self.recipient_id.as_u64().to_be_bytes());
        bytes.extend_from_slice(&self.amount.to_le_bytes());

        if let Some(chat) = &self.asset.chat {
            write_str(&mut bytes, &chat.message);
            write_str(&mut bytes, &chat.own_message);
            bytes.push(chat.message_type.into());
        }

        if with_signature {
            write_str(&mut bytes, &self.signature);
        }

        bytes
    }

    /// Digest covered by the sender's signature.
    pub fn signing_hash(&self) -> [u8; 32] {
        hash(&self.to_bytes(false))
    }

    /// Deterministic id: a pure function of every field, signature included.
    pub fn id(&self) -> String {
        short_id(&self.to_bytes(true)).to_string()
    }

    /// Check the signature against `sender_public_key`.
    ///
    /// Mock nodes never call this, they accept every transaction.
    pub fn verify_signature(&self) -> Result<bool, TransactionError> {
        let public_key = public_key_from_hex(&self.sender_public_key)?;
        let bytes = hex::decode(&self.signature).map_err(|_| TransactionError::InvalidSignature)?;
        let signature =
            Signature::from_slice(&bytes).map_err(|_| TransactionError::InvalidSignature)?;

        Ok(verify_signature(&public_key, &self.signing_hash(), &signature))
    }
}

/// A transaction after a node accepted it and stamped the server-side fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedTransaction {
    #[serde(flatten)]
    pub transaction: ChatTransaction,
    pub id: String,
    pub height: u64,
    pub block_timestamp: u64,
    pub fee: u64,
    pub recipient_public_key: String,
    #[serde(default)]
    pub signatures: Vec<String>,
    #[serde(default)]
    pub confirmations: u64,
}

impl Deref for ProcessedTransaction {
    type Target = ChatTransaction;

    fn deref(&self) -> &Self::Target {
        &self.transaction
    }
}
