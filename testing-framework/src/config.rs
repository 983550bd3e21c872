//! Harness configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use chatnet_common::config::DEFAULT_BOT_PASSPHRASE;

/// Default time `should_receive` waits for a reply
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(10);

fn default_reply_timeout() -> Duration {
    DEFAULT_REPLY_TIMEOUT
}

fn default_bot_passphrase() -> String {
    DEFAULT_BOT_PASSPHRASE.to_string()
}

/// Settings shared by test bots and simulated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// How long a `should_receive` step waits before failing
    #[serde(default = "default_reply_timeout")]
    pub reply_timeout: Duration,

    /// Passphrase of test bots created without an explicit one
    #[serde(default = "default_bot_passphrase")]
    pub bot_passphrase: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            bot_passphrase: default_bot_passphrase(),
        }
    }
}

impl HarnessConfig {
    /// Override the reply timeout
    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = timeout;
        self
    }

    /// Override the default bot passphrase
    pub fn with_bot_passphrase<S: Into<String>>(mut self, passphrase: S) -> Self {
        self.bot_passphrase = passphrase.into();
        self
    }
}
