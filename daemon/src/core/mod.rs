mod counter;
mod error;
mod events;
mod node;
mod registry;

pub use counter::ChainCounter;
pub use error::NodeError;
pub use events::{EventHandler, NodeEventListener};
pub use node::{Account, MockNode};
pub use registry::NodeRegistry;
