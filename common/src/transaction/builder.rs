use crate::{
    crypto::{Address, EncodedMessage, KeyPair},
    time::{get_epoch_time, EpochSeconds},
};

use super::{ChatAsset, ChatTransaction, MessageType, TransactionAsset, TransactionType};

fn unsigned(
    key_pair: &KeyPair,
    transaction_type: TransactionType,
    recipient_id: &Address,
    amount: u64,
    asset: TransactionAsset,
    timestamp: EpochSeconds,
) -> ChatTransaction {
    ChatTransaction {
        transaction_type,
        amount,
        sender_id: key_pair.address(),
        sender_public_key: key_pair.public_key_hex(),
        recipient_id: recipient_id.clone(),
        timestamp,
        signature: String::new(),
        asset,
    }
}

/// Sign `transaction` in place with `key_pair`.
pub fn sign_transaction(transaction: &mut ChatTransaction, key_pair: &KeyPair) {
    let signature = key_pair.sign(&transaction.signing_hash());
    transaction.signature = hex::encode(signature.to_bytes());
}

/// Build and sign a chat message carrying an already encrypted payload.
pub fn create_chat_transaction(
    key_pair: &KeyPair,
    recipient_id: &Address,
    message_type: MessageType,
    message: EncodedMessage,
    amount: u64,
) -> ChatTransaction {
    create_chat_transaction_at(
        key_pair,
        recipient_id,
        message_type,
        message,
        amount,
        get_epoch_time(),
    )
}

/// Same as [`create_chat_transaction`] with an explicit client timestamp.
pub fn create_chat_transaction_at(
    key_pair: &KeyPair,
    recipient_id: &Address,
    message_type: MessageType,
    message: EncodedMessage,
    amount: u64,
    timestamp: EpochSeconds,
) -> ChatTransaction {
    let asset = TransactionAsset {
        chat: Some(ChatAsset {
            message: message.message,
            own_message: message.own_message,
            message_type,
        }),
    };

    let mut transaction = unsigned(
        key_pair,
        TransactionType::ChatMessage,
        recipient_id,
        amount,
        asset,
        timestamp,
    );
    sign_transaction(&mut transaction, key_pair);
    transaction
}

/// Build and sign a native token transfer.
pub fn create_send_transaction(
    key_pair: &KeyPair,
    recipient_id: &Address,
    amount: u64,
) -> ChatTransaction {
    let mut transaction = unsigned(
        key_pair,
        TransactionType::Send,
        recipient_id,
        amount,
        TransactionAsset::default(),
        get_epoch_time(),
    );
    sign_transaction(&mut transaction, key_pair);
    transaction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::encode_message;

    #[test]
    fn test_chat_transaction_is_signed() {
        let user = KeyPair::from_passphrase("user");
        let bot = KeyPair::from_passphrase("bot");
        let message = encode_message("/start", &user, &bot.public_key()).unwrap();

        let tx = create_chat_transaction(&user, &bot.address(), MessageType::Chat, message, 0);

        assert_eq!(tx.transaction_type, TransactionType::ChatMessage);
        assert_eq!(tx.sender_id, user.address());
        assert_eq!(tx.recipient_id, bot.address());
        assert!(tx.verify_signature().unwrap());
    }

    #[test]
    fn test_tampered_transaction_fails_verification() {
        let user = KeyPair::from_passphrase("user");
        let bot = KeyPair::from_passphrase("bot");

        let mut tx = create_send_transaction(&user, &bot.address(), 50_000_000);
        assert!(tx.verify_signature().unwrap());

        tx.amount += 1;
        assert!(!tx.verify_signature().unwrap());
    }

    #[test]
    fn test_identical_inputs_give_identical_ids() {
        let user = KeyPair::from_passphrase("user");
        let bot = KeyPair::from_passphrase("bot");
        let message = EncodedMessage {
            message: "00ff".to_string(),
            own_message: "11ee".to_string(),
        };

        let a = create_chat_transaction_at(
            &user,
            &bot.address(),
            MessageType::Rich,
            message.clone(),
            0,
            77,
        );
        let b = create_chat_transaction_at(&user, &bot.address(), MessageType::Rich, message, 0, 77);

        // ed25519 signatures are deterministic, so the whole record matches
        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());
    }
}
