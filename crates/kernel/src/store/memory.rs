//! In-memory implementation of MenuStore.
//!
//! Used when no database is configured, and by tests. Insertion order stands
//! in for creation order when sort orders tie.

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{MenuStore, StoreError};
use crate::menu::{ReorderUpdate, apply_reorder};
use crate::models::{CreateMenuNode, MenuNode, UpdateMenuNode};

/// Menu store holding every node in a single locked vector.
#[derive(Default)]
pub struct MemoryMenuStore {
    nodes: RwLock<Vec<MenuNode>>,
}

impl MemoryMenuStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with nodes, kept as given.
    pub fn with_nodes(nodes: Vec<MenuNode>) -> Self {
        Self {
            nodes: RwLock::new(nodes),
        }
    }

    /// Number of stored nodes.
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    /// Whether the store holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[async_trait]
impl MenuStore for MemoryMenuStore {
    async fn list_sorted(&self) -> Result<Vec<MenuNode>> {
        let mut nodes = self.nodes.read().clone();
        nodes.sort_by_key(|n| n.order);
        Ok(nodes)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MenuNode>> {
        Ok(self.nodes.read().iter().find(|n| n.id == id).cloned())
    }

    async fn create(&self, input: CreateMenuNode) -> Result<MenuNode> {
        let node = MenuNode::from_input(input, now());
        self.nodes.write().push(node.clone());
        Ok(node)
    }

    async fn update(&self, id: Uuid, input: UpdateMenuNode) -> Result<Option<MenuNode>> {
        let mut nodes = self.nodes.write();
        let Some(node) = nodes.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };
        node.apply_update(input, now());
        Ok(Some(node.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut nodes = self.nodes.write();
        let Some(pos) = nodes.iter().position(|n| n.id == id) else {
            return Ok(false);
        };
        let removed = nodes.remove(pos);
        let stamp = now();
        for child in nodes.iter_mut().filter(|n| n.parent_id == Some(id)) {
            child.parent_id = removed.parent_id;
            child.changed = stamp;
        }
        Ok(true)
    }

    async fn bulk_reorder(&self, updates: &[ReorderUpdate]) -> Result<(), StoreError> {
        let mut nodes = self.nodes.write();
        apply_reorder(nodes.as_mut_slice(), updates)?;

        let stamp = now();
        for node in nodes.iter_mut() {
            if updates.iter().any(|u| u.id == node.id) {
                node.changed = stamp;
            }
        }
        Ok(())
    }

    async fn health(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
