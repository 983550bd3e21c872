//! Everything a bot test usually needs
//!
//! ```rust,ignore
//! use chatnet_testing_framework::prelude::*;
//! ```

pub use crate::{
    bot::{create_test_bot, create_test_bot_with_config, ChatBot, TestBot, TestBotOptions},
    config::HarnessConfig,
    error::HarnessError,
    init_test_logging,
    user::{
        create_fake_user, create_fake_user_with_config, Reply, RichTransferMessage, Sends,
        Transfer, TransferOptions, UserControls,
    },
};

pub use chatnet_common::{
    api::{Balance, NodeClient},
    crypto::{Address, KeyPair},
    transaction::{MessageType, ProcessedTransaction},
};
pub use chatnet_daemon::{
    config::{NodeOptions, ServerConfig},
    MockNode, MockServer,
};

pub use async_trait::async_trait;
pub use std::sync::Arc;
