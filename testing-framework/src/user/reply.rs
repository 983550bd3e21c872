use log::warn;

use chatnet_common::{
    crypto::{decode_message, public_key_from_hex, KeyPair},
    transaction::ProcessedTransaction,
};

/// Transaction received by a simulated user, with its message decrypted
#[derive(Debug, Clone)]
pub struct Reply {
    /// Transaction as stored by the node
    pub transaction: ProcessedTransaction,
    /// Decrypted chat message, `None` for transactions without one
    pub message: Option<String>,
}

impl Reply {
    /// Decrypt `transaction` with the recipient's `key_pair`
    pub fn decode(transaction: ProcessedTransaction, key_pair: &KeyPair) -> Self {
        let message = transaction.chat().and_then(|chat| {
            let decoded = public_key_from_hex(&transaction.sender_public_key).and_then(|sender| {
                decode_message(&chat.message, &chat.own_message, key_pair, &sender)
            });

            match decoded {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!("Cannot decode message of transaction {}: {}", transaction.id, e);
                    None
                }
            }
        });

        Self {
            transaction,
            message,
        }
    }

    /// Decrypted message, empty when there is none
    pub fn text(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    /// Parse the decrypted message as JSON, as rich messages are
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        self.message
            .as_deref()
            .and_then(|text| serde_json::from_str(text).ok())
    }
}
