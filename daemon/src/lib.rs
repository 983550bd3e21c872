// Mock chat ledger node
//
// In-memory ledger simulator used to drive chat bots end to end, exposed
// over HTTP through `rpc::MockServer`.

extern crate log;

pub mod config;
pub mod core;
pub mod rpc;

pub use crate::core::{Account, MockNode, NodeError, NodeEventListener, NodeRegistry};
pub use rpc::{ApiError, MockServer};
