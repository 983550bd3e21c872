// Sample bots used by the end-to-end suites

#![allow(dead_code)]

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::sync::Arc;

use chatnet_common::{
    api::NodeClient,
    config::{from_atomic_units, DEFAULT_BOT_PASSPHRASE},
    crypto::{decode_message, encode_message, public_key_from_hex, KeyPair},
    transaction::{create_chat_transaction, MessageType, ProcessedTransaction},
};
use chatnet_testing_framework::prelude::*;

pub const GREETING: &str = "Hello! I am a test bot, send /help to see what I can do.";

/// Answers `/start` with a greeting, `/whoami` with the sender address,
/// echoes rich messages and thanks for native transfers.
pub struct GreetingBot {
    key_pair: KeyPair,
    nodes: Vec<String>,
    greeting: String,
}

impl GreetingBot {
    pub fn new() -> Self {
        Self::with_greeting(GREETING)
    }

    pub fn with_greeting<S: Into<String>>(greeting: S) -> Self {
        Self {
            key_pair: KeyPair::from_passphrase(DEFAULT_BOT_PASSPHRASE),
            nodes: Vec::new(),
            greeting: greeting.into(),
        }
    }

    fn answer(&self, transaction: &ProcessedTransaction, text: Option<String>) -> String {
        match text {
            None => format!(
                "Thanks for {} ADM",
                from_atomic_units(transaction.amount)
            ),
            Some(text) if text.starts_with("/start") => self.greeting.clone(),
            Some(text) if text.starts_with("/whoami") => transaction.sender_id.to_string(),
            Some(text) => format!("You said: {}", text),
        }
    }
}

#[async_trait]
impl ChatBot for GreetingBot {
    fn copy_with(&self, key_pair: KeyPair, nodes: Vec<String>) -> Arc<dyn ChatBot> {
        Arc::new(Self {
            key_pair,
            nodes,
            greeting: self.greeting.clone(),
        })
    }

    fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    fn node(&self) -> String {
        self.nodes.first().cloned().unwrap_or_default()
    }

    async fn handle_transaction(&self, transaction: ProcessedTransaction) -> anyhow::Result<()> {
        if transaction.recipient_id != self.key_pair.address() {
            return Ok(());
        }

        let client = NodeClient::new(self.node());
        let sender = client
            .get_public_key(&transaction.sender_id)
            .await?
            .ok_or_else(|| anyhow!("Sender {} is unknown", transaction.sender_id))?;
        let sender = public_key_from_hex(&sender)?;

        let (message_type, text) = match transaction.chat() {
            Some(chat) => {
                let text =
                    decode_message(&chat.message, &chat.own_message, &self.key_pair, &sender)
                        .context("Error while decoding incoming message")?;
                match chat.message_type {
                    MessageType::Rich => (MessageType::Rich, text),
                    MessageType::Chat => (MessageType::Chat, self.answer(&transaction, Some(text))),
                }
            }
            None => (MessageType::Chat, self.answer(&transaction, None)),
        };

        let encoded = encode_message(&text, &self.key_pair, &sender)?;
        let reply = create_chat_transaction(
            &self.key_pair,
            &transaction.sender_id,
            message_type,
            encoded,
            0,
        );
        client.process_transaction(&reply).await?;
        Ok(())
    }
}

/// Never answers anything
pub struct SilentBot {
    key_pair: KeyPair,
    nodes: Vec<String>,
}

impl SilentBot {
    pub fn new() -> Self {
        Self {
            key_pair: KeyPair::from_passphrase(DEFAULT_BOT_PASSPHRASE),
            nodes: Vec::new(),
        }
    }
}

#[async_trait]
impl ChatBot for SilentBot {
    fn copy_with(&self, key_pair: KeyPair, nodes: Vec<String>) -> Arc<dyn ChatBot> {
        Arc::new(Self { key_pair, nodes })
    }

    fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    fn node(&self) -> String {
        self.nodes.first().cloned().unwrap_or_default()
    }

    async fn handle_transaction(&self, _: ProcessedTransaction) -> anyhow::Result<()> {
        Ok(())
    }
}

pub async fn start_server() -> MockServer {
    init_test_logging();
    let config = ServerConfig {
        port: 0,
        ..Default::default()
    };
    MockServer::start(config).await.unwrap()
}
