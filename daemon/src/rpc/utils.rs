use log::debug;
use std::{collections::HashMap, sync::Arc};

use super::error::ApiError;
use crate::core::{MockNode, NodeRegistry};

pub type QueryParams = HashMap<String, String>;

/// Resolve the node addressed by the request, rejecting unknown or offline nodes.
pub fn active_node(registry: &NodeRegistry, node_id: &str) -> Result<Arc<MockNode>, ApiError> {
    match registry.get(node_id) {
        Some(node) if node.is_online() => Ok(node),
        _ => {
            if log::log_enabled!(log::Level::Debug) {
                debug!("Rejecting request for unavailable node {}", node_id);
            }
            Err(ApiError::NodeUnavailable(node_id.to_string()))
        }
    }
}

/// First of `names` absent from the query, if any.
///
/// Presence only: an empty value still counts as provided.
pub fn require_properties<'a>(query: &QueryParams, names: &[&'a str]) -> Result<(), &'a str> {
    match names.iter().find(|name| !query.contains_key(**name)) {
        Some(name) => Err(*name),
        None => Ok(()),
    }
}
