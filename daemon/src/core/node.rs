use log::{debug, info};
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};

use chatnet_common::{
    api::Balance,
    config::{CHAT_MESSAGE_FEE, SEND_FEE},
    crypto::{Address, KeyPair},
    transaction::{ChatTransaction, ProcessedTransaction, TransactionType},
};

use super::{
    counter::ChainCounter,
    error::NodeError,
    events::NodeEventListener,
};
use crate::config::{NodeOptions, HEIGHT_STEP, TIMESTAMP_STEP};

/// Account known to a mock node.
#[derive(Debug, Clone)]
pub struct Account {
    pub address: Address,
    pub key_pair: KeyPair,
    pub public_key: String,
    // Only set once a test mocks it, otherwise reported as zero
    pub balance: Option<Balance>,
}

impl Account {
    pub fn new(key_pair: &KeyPair) -> Self {
        Self {
            address: key_pair.address(),
            public_key: key_pair.public_key_hex(),
            key_pair: key_pair.clone(),
            balance: None,
        }
    }
}

struct NodeState {
    timestamp: ChainCounter,
    height: ChainCounter,
    accounts: HashMap<Address, Account>,
    transactions: HashMap<String, ProcessedTransaction>,
}

/// In-memory ledger simulating one blockchain node.
pub struct MockNode {
    id: String,
    url: String,
    online: AtomicBool,
    state: Mutex<NodeState>,
    events: NodeEventListener,
}

fn fee_for(transaction_type: TransactionType) -> u64 {
    match transaction_type {
        TransactionType::Send => SEND_FEE,
        TransactionType::ChatMessage => CHAT_MESSAGE_FEE,
    }
}

impl MockNode {
    pub fn new<S: Into<String>, U: Into<String>>(id: S, url: U, options: NodeOptions) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            online: AtomicBool::new(options.online),
            state: Mutex::new(NodeState {
                timestamp: ChainCounter::new(options.timestamp, TIMESTAMP_STEP),
                height: ChainCounter::new(options.height, HEIGHT_STEP),
                accounts: HashMap::new(),
                transactions: HashMap::new(),
            }),
            events: NodeEventListener::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Base URL the node is reachable at.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_online(&self, online: bool) {
        if log::log_enabled!(log::Level::Info) {
            info!(
                "Node {} is now {}",
                self.id,
                if online { "online" } else { "offline" }
            );
        }
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Step the mocked chain timestamp and return it.
    pub fn advance_timestamp(&self) -> u64 {
        self.state.lock().timestamp.advance()
    }

    /// Step the mocked chain height and return it.
    pub fn advance_height(&self) -> u64 {
        self.state.lock().height.advance()
    }

    /// Register (or overwrite) the account owning `key_pair`.
    pub fn register_account(&self, key_pair: &KeyPair) -> Address {
        let account = Account::new(key_pair);
        let address = account.address.clone();
        if log::log_enabled!(log::Level::Debug) {
            debug!("Registering account {} on node {}", address, self.id);
        }
        self.state.lock().accounts.insert(address.clone(), account);
        address
    }

    /// Set the balance snapshot reported for a registered account.
    pub fn mock_balance(&self, address: &Address, balance: Balance) -> Result<(), NodeError> {
        let mut state = self.state.lock();
        let account = state
            .accounts
            .get_mut(address)
            .ok_or_else(|| NodeError::AccountNotFound(address.clone(), self.id.clone()))?;
        account.balance = Some(balance);
        Ok(())
    }

    pub fn get_account(&self, address: &Address) -> Option<Account> {
        self.state.lock().accounts.get(address).cloned()
    }

    /// Hex public key of `address`, empty when the account is unknown.
    pub fn get_public_key(&self, address: &Address) -> String {
        self.state
            .lock()
            .accounts
            .get(address)
            .map(|account| account.public_key.clone())
            .unwrap_or_default()
    }

    /// Stored transaction with its confirmations recomputed.
    ///
    /// Reading a known transaction advances the height, so confirmations
    /// grow on every call. Unknown ids leave the counters untouched.
    pub fn get_transaction(&self, id: &str) -> Option<ProcessedTransaction> {
        let mut state = self.state.lock();
        let mut transaction = state.transactions.get(id)?.clone();
        let current_height = state.height.advance();
        transaction.confirmations = current_height.saturating_sub(transaction.height);
        Some(transaction)
    }

    /// Accept an unprocessed transaction into the ledger.
    ///
    /// Listeners waiting on the recipient are notified before the processed
    /// view is returned, which is why it never carries zero confirmations.
    pub fn process_chat_transaction(&self, transaction: ChatTransaction) -> ProcessedTransaction {
        let processed = {
            let mut state = self.state.lock();
            let id = transaction.id();
            let height = state.height.advance();
            let block_timestamp = state.timestamp.advance();
            let fee = fee_for(transaction.transaction_type);
            let recipient_public_key = state
                .accounts
                .get(&transaction.recipient_id)
                .map(|account| account.public_key.clone())
                .unwrap_or_default();

            let processed = ProcessedTransaction {
                transaction,
                id: id.clone(),
                height,
                block_timestamp,
                fee,
                recipient_public_key,
                signatures: Vec::new(),
                confirmations: 0,
            };
            state.transactions.insert(id, processed.clone());
            processed
        };

        if log::log_enabled!(log::Level::Debug) {
            debug!(
                "Node {} processed transaction {} from {} to {} at height {}",
                self.id, processed.id, processed.sender_id, processed.recipient_id, processed.height
            );
        }

        self.events.handle(&processed);

        // Stored just above, the lookup only fails if the map was cleared concurrently
        self.get_transaction(&processed.id).unwrap_or(processed)
    }

    /// Run `handler` on the next transaction addressed to `address`.
    pub fn once<F>(&self, address: &Address, handler: F)
    where
        F: FnOnce(&ProcessedTransaction) + Send + 'static,
    {
        self.events.once(address, handler);
    }

    pub fn events(&self) -> &NodeEventListener {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{START_HEIGHT, START_TIMESTAMP};
    use chatnet_common::{
        crypto::encode_message,
        transaction::{create_chat_transaction_at, create_send_transaction, MessageType},
    };
    use std::sync::Arc;

    fn node() -> MockNode {
        MockNode::new("node", "http://localhost/node", NodeOptions::default())
    }

    fn chat_between(sender: &KeyPair, recipient: &KeyPair, text: &str) -> ChatTransaction {
        let encoded = encode_message(text, sender, &recipient.public_key()).unwrap();
        create_chat_transaction_at(
            sender,
            &recipient.address(),
            MessageType::Chat,
            encoded,
            0,
            1_000,
        )
    }

    #[test]
    fn test_counters_advance_on_every_read() {
        let node = node();
        assert_eq!(node.advance_height(), START_HEIGHT + HEIGHT_STEP);
        assert_eq!(node.advance_height(), START_HEIGHT + 2 * HEIGHT_STEP);
        assert_eq!(node.advance_timestamp(), START_TIMESTAMP + TIMESTAMP_STEP);
    }

    #[test]
    fn test_node_options_are_honored() {
        let node = MockNode::new(
            "custom",
            "http://localhost/custom",
            NodeOptions::default().offline().with_height(10).with_timestamp(100),
        );
        assert!(!node.is_online());
        assert_eq!(node.advance_height(), 10 + HEIGHT_STEP);
        assert_eq!(node.advance_timestamp(), 100 + TIMESTAMP_STEP);
    }

    #[test]
    fn test_online_toggle() {
        let node = node();
        assert!(node.is_online());
        node.set_online(false);
        assert!(!node.is_online());
        node.set_online(true);
        assert!(node.is_online());
    }

    #[test]
    fn test_register_account_overwrites() {
        let node = node();
        let key_pair = KeyPair::from_passphrase("alice");
        let address = node.register_account(&key_pair);
        node.mock_balance(&address, Balance::new(5, 5)).unwrap();

        assert_eq!(node.register_account(&key_pair), address);
        let account = node.get_account(&address).unwrap();
        assert_eq!(account.public_key, key_pair.public_key_hex());
        assert!(account.balance.is_none());
    }

    #[test]
    fn test_public_key_of_unknown_account_is_empty() {
        let node = node();
        let unknown = KeyPair::from_passphrase("nobody").address();
        assert_eq!(node.get_public_key(&unknown), "");
        assert!(node.get_account(&unknown).is_none());
    }

    #[test]
    fn test_mock_balance_requires_account() {
        let node = node();
        let unknown = KeyPair::from_passphrase("nobody").address();
        assert_eq!(
            node.mock_balance(&unknown, Balance::zero()),
            Err(NodeError::AccountNotFound(unknown.clone(), "node".to_string()))
        );
    }

    #[test]
    fn test_process_chat_transaction_enriches() {
        let node = node();
        let alice = KeyPair::from_passphrase("alice");
        let bot = KeyPair::from_passphrase("bot");
        node.register_account(&bot);

        let transaction = chat_between(&alice, &bot, "hello");
        let expected_id = transaction.id();
        let processed = node.process_chat_transaction(transaction);

        assert_eq!(processed.id, expected_id);
        assert_eq!(processed.height, START_HEIGHT + HEIGHT_STEP);
        assert_eq!(processed.block_timestamp, START_TIMESTAMP + TIMESTAMP_STEP);
        assert_eq!(processed.fee, CHAT_MESSAGE_FEE);
        assert_eq!(processed.recipient_public_key, bot.public_key_hex());
        assert!(processed.signatures.is_empty());
        // one height read happens after the transaction was stamped
        assert_eq!(processed.confirmations, HEIGHT_STEP);
    }

    #[test]
    fn test_send_transaction_fee() {
        let node = node();
        let alice = KeyPair::from_passphrase("alice");
        let bot = KeyPair::from_passphrase("bot");

        let processed =
            node.process_chat_transaction(create_send_transaction(&alice, &bot.address(), 10));
        assert_eq!(processed.fee, SEND_FEE);
        // recipient never registered
        assert_eq!(processed.recipient_public_key, "");
    }

    #[test]
    fn test_confirmations_strictly_increase() {
        let node = node();
        let alice = KeyPair::from_passphrase("alice");
        let bot = KeyPair::from_passphrase("bot");
        let processed = node.process_chat_transaction(chat_between(&alice, &bot, "hi"));

        let first = node.get_transaction(&processed.id).unwrap();
        let second = node.get_transaction(&processed.id).unwrap();
        assert!(first.confirmations > processed.confirmations);
        assert!(second.confirmations > first.confirmations);
        assert_eq!(second.confirmations - first.confirmations, HEIGHT_STEP);
    }

    #[test]
    fn test_unknown_transaction_does_not_advance_height() {
        let node = node();
        assert!(node.get_transaction("12345").is_none());
        assert_eq!(node.advance_height(), START_HEIGHT + HEIGHT_STEP);
    }

    #[test]
    fn test_same_transaction_same_id() {
        let alice = KeyPair::from_passphrase("alice");
        let bot = KeyPair::from_passphrase("bot");
        let transaction = chat_between(&alice, &bot, "hi");

        let first = node().process_chat_transaction(transaction.clone());
        let second = node().process_chat_transaction(transaction);
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_listener_sees_stored_transaction() {
        let node = Arc::new(node());
        let alice = KeyPair::from_passphrase("alice");
        let bot = KeyPair::from_passphrase("bot");
        let seen = Arc::new(Mutex::new(None));

        {
            let seen = seen.clone();
            let node_ref = node.clone();
            node.once(&bot.address(), move |tx| {
                // the node lock is free while handlers run
                *seen.lock() = node_ref.get_transaction(&tx.id).map(|stored| stored.id);
            });
        }

        let processed = node.process_chat_transaction(chat_between(&alice, &bot, "hi"));
        assert_eq!(seen.lock().clone(), Some(processed.id));
        // the handler's read advanced the height once more
        assert_eq!(processed.confirmations, 2 * HEIGHT_STEP);
    }
}
