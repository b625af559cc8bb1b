//! PostgreSQL implementation of MenuStore.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{MenuStore, StoreError};
use crate::db;
use crate::menu::ReorderUpdate;
use crate::models::{CreateMenuNode, MenuNode, UpdateMenuNode};

/// Menu store backed by the `menu_node` table.
#[derive(Clone)]
pub struct PgMenuStore {
    pool: PgPool,
}

impl PgMenuStore {
    /// Wrap a pool, creating the schema if needed.
    pub async fn new(pool: PgPool) -> Result<Self> {
        MenuNode::ensure_schema(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl MenuStore for PgMenuStore {
    async fn list_sorted(&self) -> Result<Vec<MenuNode>> {
        MenuNode::list_sorted(&self.pool).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MenuNode>> {
        MenuNode::find_by_id(&self.pool, id).await
    }

    async fn create(&self, input: CreateMenuNode) -> Result<MenuNode> {
        MenuNode::create(&self.pool, input).await
    }

    async fn update(&self, id: Uuid, input: UpdateMenuNode) -> Result<Option<MenuNode>> {
        MenuNode::update(&self.pool, id, input).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        MenuNode::delete(&self.pool, id).await
    }

    async fn bulk_reorder(&self, updates: &[ReorderUpdate]) -> Result<(), StoreError> {
        MenuNode::bulk_reorder(&self.pool, updates).await??;
        Ok(())
    }

    async fn health(&self) -> bool {
        db::check_health(&self.pool).await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
