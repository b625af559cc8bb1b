//! Menu storage abstraction layer.
//!
//! All menu reads and writes go through [`MenuStore`]. The HTTP layer and
//! [`crate::services::menu::MenuService`] never talk to a backend directly,
//! so PostgreSQL and the in-memory store are interchangeable.
//!
//! Concurrent writers are not coordinated: the last write wins.

mod memory;
mod postgres;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryMenuStore;
pub use postgres::PgMenuStore;

use crate::menu::{ReorderError, ReorderUpdate};
use crate::models::{CreateMenuNode, MenuNode, UpdateMenuNode};

/// Errors from operations that can be rejected by the store itself.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Reorder(#[from] ReorderError),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Persistence for menu nodes.
#[async_trait]
pub trait MenuStore: Send + Sync {
    /// All nodes ordered by `order`, ties in creation order.
    async fn list_sorted(&self) -> Result<Vec<MenuNode>>;

    /// Fetch one node.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<MenuNode>>;

    /// Insert a node. Input is assumed validated.
    async fn create(&self, input: CreateMenuNode) -> Result<MenuNode>;

    /// Merge an update into a node. `None` if the node does not exist.
    async fn update(&self, id: Uuid, input: UpdateMenuNode) -> Result<Option<MenuNode>>;

    /// Remove a node; its direct children move to its former parent.
    /// Returns false if the node did not exist.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Apply a reorder batch atomically.
    async fn bulk_reorder(&self, updates: &[ReorderUpdate]) -> Result<(), StoreError>;

    /// Whether the backend is reachable.
    async fn health(&self) -> bool;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}
