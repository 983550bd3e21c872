//! Test bot wrapper
//!
//! Binds a bot implementation to one or more mock nodes: the bot gets its
//! own key pair, registered as an account on every bound node, and a copy
//! of the bot configured with those nodes' URLs.

use async_trait::async_trait;
use log::info;
use std::{collections::HashMap, sync::Arc};

use chatnet_common::{
    crypto::{Address, KeyPair, PublicKey},
    transaction::ProcessedTransaction,
};
use chatnet_daemon::MockNode;

use crate::{config::HarnessConfig, error::HarnessError};

/// Chat bot under test
///
/// Implementations talk to their node over HTTP like they would in
/// production; the harness only feeds them incoming transactions.
#[async_trait]
pub trait ChatBot: Send + Sync {
    /// Copy of this bot using `key_pair` and talking to `nodes`
    fn copy_with(&self, key_pair: KeyPair, nodes: Vec<String>) -> Arc<dyn ChatBot>;

    /// Key pair the bot signs with
    fn key_pair(&self) -> &KeyPair;

    /// URL of the node the bot currently talks to
    fn node(&self) -> String;

    /// Process one incoming transaction, replying through the node if needed
    async fn handle_transaction(&self, transaction: ProcessedTransaction) -> anyhow::Result<()>;
}

/// Options of [`create_test_bot`]
#[derive(Clone)]
pub struct TestBotOptions {
    nodes: Vec<Arc<MockNode>>,
    passphrase: Option<String>,
}

impl TestBotOptions {
    /// Bind the bot to a single node
    pub fn node(node: Arc<MockNode>) -> Self {
        Self::nodes(vec![node])
    }

    /// Bind the bot to several nodes, the first one being active
    pub fn nodes(nodes: Vec<Arc<MockNode>>) -> Self {
        Self {
            nodes,
            passphrase: None,
        }
    }

    /// Derive the bot key pair from `passphrase` instead of the default one
    pub fn with_passphrase<S: Into<String>>(mut self, passphrase: S) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }
}

/// Bot under test bound to mock nodes
#[derive(Clone)]
pub struct TestBot {
    bot: Arc<dyn ChatBot>,
    nodes: HashMap<String, Arc<MockNode>>,
}

/// Wrap `bot` for testing with the default harness configuration
pub fn create_test_bot(
    bot: &dyn ChatBot,
    options: TestBotOptions,
) -> Result<TestBot, HarnessError> {
    create_test_bot_with_config(bot, options, &HarnessConfig::default())
}

/// Wrap `bot` for testing, falling back to `config` for unset options
pub fn create_test_bot_with_config(
    bot: &dyn ChatBot,
    options: TestBotOptions,
    config: &HarnessConfig,
) -> Result<TestBot, HarnessError> {
    if options.nodes.is_empty() {
        return Err(HarnessError::NoNodes);
    }

    let passphrase = options
        .passphrase
        .unwrap_or_else(|| config.bot_passphrase.clone());
    let key_pair = KeyPair::from_passphrase(&passphrase);

    let mut urls = Vec::with_capacity(options.nodes.len());
    let mut nodes = HashMap::with_capacity(options.nodes.len());
    for node in options.nodes {
        node.register_account(&key_pair);
        urls.push(node.url().to_string());
        nodes.insert(node.url().to_string(), node);
    }

    if log::log_enabled!(log::Level::Info) {
        info!(
            "Test bot {} bound to {} node(s)",
            key_pair.address(),
            urls.len()
        );
    }

    Ok(TestBot {
        bot: bot.copy_with(key_pair, urls),
        nodes,
    })
}

impl TestBot {
    /// Wrapped bot instance
    pub fn bot(&self) -> &Arc<dyn ChatBot> {
        &self.bot
    }

    /// Key pair of the bot
    pub fn key_pair(&self) -> &KeyPair {
        self.bot.key_pair()
    }

    /// Account address of the bot
    pub fn address(&self) -> Address {
        self.bot.key_pair().address()
    }

    /// Public key of the bot
    pub fn public_key(&self) -> PublicKey {
        self.bot.key_pair().public_key()
    }

    /// Mock node the bot currently talks to
    ///
    /// Fails when the bot reports a node it was never bound to.
    pub fn node(&self) -> Result<Arc<MockNode>, HarnessError> {
        let url = self.bot.node();
        self.nodes
            .get(&url)
            .cloned()
            .ok_or(HarnessError::NodeNotBound(url))
    }

    /// Every node the bot is bound to
    pub fn nodes(&self) -> impl Iterator<Item = &Arc<MockNode>> {
        self.nodes.values()
    }

    /// Feed `transaction` to the bot
    pub async fn handle(&self, transaction: ProcessedTransaction) -> anyhow::Result<()> {
        self.bot.handle_transaction(transaction).await
    }
}
