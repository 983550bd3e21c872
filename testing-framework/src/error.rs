//! Errors reported by the harness

use std::{sync::Arc, time::Duration};
use thiserror::Error;

use chatnet_common::crypto::Address;

/// Failure of a harness operation or of a queued user action.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// An earlier action of the chain failed; every later action was skipped.
    #[error("Action #{position} failed: {cause:#}")]
    ActionFailed {
        /// 1-based position of the failing action in its queue
        position: usize,
        /// Error (or panic) raised by the action
        cause: Arc<anyhow::Error>,
    },

    /// The queue worker is gone, usually because the runtime shut down.
    #[error("Action queue is closed")]
    QueueClosed,

    /// No reply reached the user before the configured timeout.
    #[error("No reply for {address} within {timeout:?}")]
    NoReply {
        /// Address that was waiting
        address: Address,
        /// Timeout that elapsed
        timeout: Duration,
    },

    /// The bot is not bound to the node it reports as active.
    #[error("Bot is not bound to node {0}")]
    NodeNotBound(String),

    /// A test bot needs at least one node.
    #[error("A test bot must be bound to at least one node")]
    NoNodes,

    /// A user action needs a bot set with `interacts_with` first.
    #[error("User {0} does not interact with any bot")]
    NoCounterpart(Address),
}
