//! # Chatnet Testing Framework
//!
//! End-to-end harness for chat bots. A test starts a [`MockServer`],
//! creates mock nodes on it, wraps the bot under test with
//! [`create_test_bot`] and drives it through simulated users created with
//! [`create_fake_user`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chatnet_testing_framework::prelude::*;
//!
//! #[tokio::test]
//! async fn test_start_command() -> anyhow::Result<()> {
//!     let server = MockServer::start(ServerConfig::default()).await?;
//!     let node = server.create_node("node", NodeOptions::default());
//!     let bot = create_test_bot(&MyBot::new(), TestBotOptions::node(node))?;
//!
//!     let user = create_fake_user("user passphrase");
//!     user.interacts_with(&bot)
//!         .sends(Sends::command("start"))
//!         .should_receive(|reply| assert_eq!(reply.text(), "Hello!"))
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Design
//!
//! Steps of one user run strictly in order on that user's queue, while
//! distinct users run independently. The first failing step of a chain
//! fails the whole chain.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Bot under test and its wrapper
pub mod bot;

/// Harness settings
pub mod config;

/// Harness errors
pub mod error;

/// Sequential action queue backing every user
pub mod queue;

/// Simulated users
pub mod user;

// Convenient re-exports for common usage
pub mod prelude;

pub use bot::{create_test_bot, create_test_bot_with_config, ChatBot, TestBot, TestBotOptions};
pub use config::HarnessConfig;
pub use error::HarnessError;
pub use queue::ActionQueue;
pub use user::{
    create_fake_user, create_fake_user_with_config, Reply, Sends, Transfer, TransferOptions,
    UserControls,
};

pub use chatnet_daemon::{
    config::{NodeOptions, ServerConfig},
    MockNode, MockServer,
};

/// Route `log` output of tests through env_logger
///
/// Safe to call from every test, only the first call installs the logger.
pub fn init_test_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(true)
        .try_init();
}
