// One-shot notification registry keyed by recipient address

use log::trace;
use parking_lot::Mutex;
use std::collections::HashMap;

use chatnet_common::{crypto::Address, transaction::ProcessedTransaction};

pub type EventHandler = Box<dyn FnOnce(&ProcessedTransaction) + Send + 'static>;

/// Per-address lists of one-shot handlers.
///
/// Firing takes the whole list for the recipient out of the registry before
/// any handler runs: every handler of that snapshot is invoked once, in
/// registration order, and handlers registered meanwhile wait for the next
/// transaction.
#[derive(Default)]
pub struct NodeEventListener {
    handlers: Mutex<HashMap<Address, Vec<EventHandler>>>,
}

impl NodeEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `handler` for the next transaction addressed to `address`.
    pub fn once<F>(&self, address: &Address, handler: F)
    where
        F: FnOnce(&ProcessedTransaction) + Send + 'static,
    {
        self.handlers
            .lock()
            .entry(address.clone())
            .or_default()
            .push(Box::new(handler));
    }

    /// Deliver `transaction` to the handlers waiting on its recipient.
    ///
    /// Returns how many handlers were invoked.
    pub fn handle(&self, transaction: &ProcessedTransaction) -> usize {
        // the lock is released before handlers run so they can register again
        let snapshot = match self.handlers.lock().remove(&transaction.recipient_id) {
            Some(handlers) => handlers,
            None => return 0,
        };

        let count = snapshot.len();
        if log::log_enabled!(log::Level::Trace) {
            trace!(
                "Delivering transaction {} to {} handler(s) of {}",
                transaction.id,
                count,
                transaction.recipient_id
            );
        }

        for handler in snapshot {
            handler(transaction);
        }

        count
    }

    /// Number of handlers waiting on `address`.
    pub fn pending(&self, address: &Address) -> usize {
        self.handlers
            .lock()
            .get(address)
            .map(Vec::len)
            .unwrap_or(0)
    }
}
