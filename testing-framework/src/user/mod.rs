//! Simulated users
//!
//! Every method of [`UserControls`] enqueues one step on the user's own
//! [`ActionQueue`] and returns immediately, so steps chain fluently and the
//! chain is awaited as a whole:
//!
//! ```rust,ignore
//! let user = create_fake_user("user passphrase");
//! user.interacts_with(&bot)
//!     .sends(Sends::command("start"))
//!     .should_receive(|reply| assert_eq!(reply.text(), "Hello!"))
//!     .await?;
//! ```

mod options;
mod reply;

pub use options::{MessageBody, RichTransferMessage, Sends, Transfer, TransferOptions};
pub use reply::Reply;

use anyhow::{anyhow, Context};
use futures::{
    future::{BoxFuture, FutureExt},
    Future,
};
use log::{debug, error};
use parking_lot::Mutex;
use reqwest::Client;
use std::{future::IntoFuture, sync::Arc};
use tokio::sync::oneshot;

use chatnet_common::{
    api::NodeClient,
    config::to_atomic_units,
    crypto::{encode_message, Address, KeyPair},
    transaction::{
        create_chat_transaction, create_send_transaction, ChatTransaction, MessageType,
    },
};

use crate::{bot::TestBot, config::HarnessConfig, error::HarnessError, queue::ActionQueue};

/// Simulated chat user driving a bot through a mock node
pub struct UserControls {
    key_pair: KeyPair,
    config: HarnessConfig,
    counterpart: Arc<Mutex<Option<TestBot>>>,
    // shared by every step so submissions reuse one connection pool
    http: Client,
    queue: ActionQueue,
}

/// Create a user whose key pair derives from `passphrase`
pub fn create_fake_user(passphrase: &str) -> UserControls {
    create_fake_user_with_config(passphrase, HarnessConfig::default())
}

/// Same as [`create_fake_user`] with explicit harness settings
pub fn create_fake_user_with_config(passphrase: &str, config: HarnessConfig) -> UserControls {
    UserControls {
        key_pair: KeyPair::from_passphrase(passphrase),
        config,
        counterpart: Arc::new(Mutex::new(None)),
        http: Client::new(),
        queue: ActionQueue::new(),
    }
}

// Submit through the node's HTTP surface, then let the bot react in the background
async fn deliver(http: Client, bot: TestBot, transaction: ChatTransaction) -> anyhow::Result<()> {
    let node = bot.node()?;
    let client = NodeClient::with_client(http, node.url());
    let processed = client
        .process_chat(&transaction)
        .await
        .with_context(|| format!("Error while submitting transaction to {}", node.url()))?;

    if log::log_enabled!(log::Level::Debug) {
        debug!(
            "Transaction {} from {} accepted by {}",
            processed.id,
            processed.sender_id,
            node.id()
        );
    }

    // The next step registers its listener as soon as this one returns.
    // Bots reply through the node's HTTP surface and this task yields first,
    // which in practice lets the listener win; a bot writing straight into
    // the node from another thread could still race it.
    tokio::spawn(async move {
        tokio::task::yield_now().await;
        let id = processed.id.clone();
        if let Err(e) = bot.handle(processed).await {
            if log::log_enabled!(log::Level::Error) {
                error!("Bot failed to handle transaction {}: {:#}", id, e);
            }
        }
    });

    Ok(())
}

impl UserControls {
    /// Account address of the user
    pub fn address(&self) -> Address {
        self.key_pair.address()
    }

    /// Key pair of the user
    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    fn current_bot(
        counterpart: &Mutex<Option<TestBot>>,
        key_pair: &KeyPair,
    ) -> Result<TestBot, HarnessError> {
        counterpart
            .lock()
            .clone()
            .ok_or_else(|| HarnessError::NoCounterpart(key_pair.address()))
    }

    /// Register the user on the bot's active node and talk to that bot from now on
    pub fn interacts_with(&self, bot: &TestBot) -> &Self {
        let bot = bot.clone();
        let key_pair = self.key_pair.clone();
        let counterpart = Arc::clone(&self.counterpart);

        self.queue.enqueue(move || async move {
            let node = bot.node()?;
            node.register_account(&key_pair);
            debug!("User {} now talks to bot {}", key_pair.address(), bot.address());
            *counterpart.lock() = Some(bot);
            Ok(())
        });
        self
    }

    /// Send an encrypted chat message to the current bot
    pub fn sends(&self, message: Sends) -> &Self {
        let key_pair = self.key_pair.clone();
        let counterpart = Arc::clone(&self.counterpart);
        let http = self.http.clone();

        self.queue.enqueue(move || async move {
            let bot = Self::current_bot(&counterpart, &key_pair)?;
            let encoded = encode_message(&message.text(), &key_pair, &bot.public_key())?;
            let amount = message.amount().map(to_atomic_units).unwrap_or(0);
            let transaction = create_chat_transaction(
                &key_pair,
                &bot.address(),
                MessageType::Chat,
                encoded,
                amount,
            );

            deliver(http, bot, transaction).await
        });
        self
    }

    /// Transfer tokens to the current bot
    ///
    /// Native transfers move coins on chain and carry no message; any other
    /// token is announced with a rich chat message.
    pub fn transfers(&self, transfer: Transfer, options: TransferOptions) -> &Self {
        let key_pair = self.key_pair.clone();
        let counterpart = Arc::clone(&self.counterpart);
        let http = self.http.clone();

        self.queue.enqueue(move || async move {
            let bot = Self::current_bot(&counterpart, &key_pair)?;

            let transaction = if transfer.is_native() {
                create_send_transaction(
                    &key_pair,
                    &bot.address(),
                    to_atomic_units(transfer.amount()),
                )
            } else {
                let rich = serde_json::to_string(&RichTransferMessage::new(&transfer, &options))?;
                let encoded = encode_message(&rich, &key_pair, &bot.public_key())?;
                create_chat_transaction(&key_pair, &bot.address(), MessageType::Rich, encoded, 0)
            };

            deliver(http, bot, transaction).await
        });
        self
    }

    /// Wait for the next transaction addressed to this user and hand it to `callback`
    ///
    /// Fails with [`HarnessError::NoReply`] once the configured reply timeout
    /// elapses. The listener is registered when this step starts, so the
    /// step must be chained right after the one provoking the reply.
    pub fn should_receive<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(Reply) + Send + 'static,
    {
        let key_pair = self.key_pair.clone();
        let counterpart = Arc::clone(&self.counterpart);
        let timeout = self.config.reply_timeout;

        self.queue.enqueue(move || async move {
            let bot = Self::current_bot(&counterpart, &key_pair)?;
            let node = bot.node()?;
            let address = key_pair.address();

            let (sender, receiver) = oneshot::channel();
            node.once(&address, move |transaction| {
                let _ = sender.send(transaction.clone());
            });

            let transaction = tokio::time::timeout(timeout, receiver)
                .await
                .map_err(|_| HarnessError::NoReply { address, timeout })?
                .map_err(|_| anyhow!("Node dropped the reply listener"))?;

            callback(Reply::decode(transaction, &key_pair));
            Ok(())
        });
        self
    }

    /// Run an arbitrary async step in the chain
    pub fn then<F, Fut>(&self, action: F) -> &Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.queue.enqueue(action);
        self
    }

    /// Resolve once every step enqueued so far has settled
    pub fn completion(&self) -> impl Future<Output = Result<(), HarnessError>> + Send + 'static {
        self.queue.completion()
    }
}

impl<'a> IntoFuture for &'a UserControls {
    type Output = Result<(), HarnessError>;
    type IntoFuture = BoxFuture<'a, Result<(), HarnessError>>;

    fn into_future(self) -> Self::IntoFuture {
        self.completion().boxed()
    }
}
