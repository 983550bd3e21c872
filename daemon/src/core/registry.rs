use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};

use super::node::MockNode;

/// Routing table from node identifier to mock node.
///
/// Shared between the HTTP server and the test creating the nodes.
#[derive(Default)]
pub struct NodeRegistry {
    nodes: RwLock<HashMap<String, Arc<MockNode>>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node` under its id, returning the node it replaced.
    pub fn insert(&self, node: Arc<MockNode>) -> Option<Arc<MockNode>> {
        self.nodes.write().insert(node.id().to_string(), node)
    }

    pub fn get(&self, id: &str) -> Option<Arc<MockNode>> {
        self.nodes.read().get(id).cloned()
    }

    pub fn remove(&self, id: &str) -> Option<Arc<MockNode>> {
        self.nodes.write().remove(id)
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.nodes.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NodeOptions;

    fn node(id: &str) -> Arc<MockNode> {
        Arc::new(MockNode::new(id, format!("http://localhost/{id}"), NodeOptions::default()))
    }

    #[test]
    fn test_insert_and_get() {
        let registry = NodeRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.insert(node("a")).is_none());
        assert!(registry.insert(node("b")).is_none());

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("a").map(|n| n.id().to_string()), Some("a".to_string()));
        assert!(registry.get("c").is_none());
        assert_eq!(registry.ids(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let registry = NodeRegistry::new();
        let first = node("a");
        registry.insert(first.clone());
        let replaced = registry.insert(node("a")).unwrap();

        assert!(Arc::ptr_eq(&first, &replaced));
        assert!(!Arc::ptr_eq(&first, &registry.get("a").unwrap()));
    }

    #[test]
    fn test_remove() {
        let registry = NodeRegistry::new();
        registry.insert(node("a"));
        assert!(registry.remove("a").is_some());
        assert!(registry.remove("a").is_none());
        assert!(registry.get("a").is_none());
    }
}
