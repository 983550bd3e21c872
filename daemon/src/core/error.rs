use thiserror::Error;

use chatnet_common::crypto::Address;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    #[error("Account {0} is not registered on node {1}")]
    AccountNotFound(Address, String),
}
