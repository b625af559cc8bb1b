//! Menu node model.
//!
//! Menu nodes are stored flat: each row carries an optional parent reference
//! and a sibling order. The nested navigation tree is derived on every read
//! (see [`crate::menu::build_tree`]) and never persisted.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::menu::{ReorderError, ReorderUpdate};

/// Maximum length of a menu node name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of an icon token, in characters. Matches the column width.
pub const MAX_ICON_LEN: usize = 64;

const COLUMNS: &str = "id, name, url, icon, parent_id, sort_order, is_active, created, changed";

/// Menu node record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MenuNode {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Display label.
    pub name: String,

    /// Navigation target.
    #[serde(default)]
    pub url: Option<String>,

    /// Display token for the icon set used by the frontend.
    #[serde(default)]
    pub icon: Option<String>,

    /// Parent node; `None` means root level.
    #[serde(default)]
    pub parent_id: Option<Uuid>,

    /// Sibling position (lower = earlier). Ties keep input order.
    #[sqlx(rename = "sort_order")]
    #[serde(default)]
    pub order: i32,

    /// Inactive nodes stay in storage but can be filtered out of the tree.
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Unix timestamp when created.
    #[serde(default)]
    pub created: i64,

    /// Unix timestamp when last changed.
    #[serde(default)]
    pub changed: i64,
}

fn default_true() -> bool {
    true
}

/// Input for creating a menu node.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateMenuNode {
    /// Missing is treated like blank so both fail validation the same way.
    #[serde(default)]
    pub name: String,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub parent_id: Option<Uuid>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Input for updating a menu node.
///
/// `parent_id` is doubly optional: absent leaves the parent unchanged,
/// `null` moves the node to the root level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMenuNode {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub icon: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<Uuid>>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Keep an explicit `null` distinguishable from a missing field.
fn double_option<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn check_name(name: &str) -> std::result::Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("name must not be empty".to_string());
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(format!("name must be at most {MAX_NAME_LEN} characters"));
    }
    Ok(())
}

fn check_icon(icon: Option<&str>) -> std::result::Result<(), String> {
    match icon {
        Some(icon) if icon.chars().count() > MAX_ICON_LEN => {
            Err(format!("icon must be at most {MAX_ICON_LEN} characters"))
        }
        _ => Ok(()),
    }
}

impl CreateMenuNode {
    /// Check required fields, returning a message suitable for the client.
    pub fn validate(&self) -> std::result::Result<(), String> {
        check_name(&self.name)?;
        check_icon(self.icon.as_deref())
    }
}

impl UpdateMenuNode {
    /// Check the supplied fields, returning a message suitable for the client.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(name) = &self.name {
            check_name(name)?;
        }
        check_icon(self.icon.as_ref().and_then(Option::as_deref))
    }

    /// Whether this update moves the node away from its `current` parent.
    pub fn changes_parent(&self, current: Option<Uuid>) -> bool {
        matches!(self.parent_id, Some(next) if next != current)
    }
}

impl MenuNode {
    /// Build a new record from create input, stamping id and timestamps.
    pub fn from_input(input: CreateMenuNode, now: i64) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: input.name.trim().to_string(),
            url: input.url,
            icon: input.icon,
            parent_id: input.parent_id,
            order: input.order.unwrap_or(0),
            is_active: input.is_active.unwrap_or(true),
            created: now,
            changed: now,
        }
    }

    /// Merge an update into this record, stamping `changed`.
    pub fn apply_update(&mut self, input: UpdateMenuNode, now: i64) {
        if let Some(name) = input.name {
            self.name = name.trim().to_string();
        }
        if let Some(url) = input.url {
            self.url = url;
        }
        if let Some(icon) = input.icon {
            self.icon = icon;
        }
        if let Some(parent_id) = input.parent_id {
            self.parent_id = parent_id;
        }
        if let Some(order) = input.order {
            self.order = order;
        }
        if let Some(is_active) = input.is_active {
            self.is_active = is_active;
        }
        self.changed = now;
    }

    /// Create the `menu_node` table if it does not exist.
    pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
        sqlx::raw_sql(
            r#"
            CREATE TABLE IF NOT EXISTS menu_node (
                id UUID PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                url TEXT,
                icon VARCHAR(64),
                parent_id UUID,
                sort_order INTEGER NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created BIGINT NOT NULL,
                changed BIGINT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS menu_node_parent_idx ON menu_node (parent_id);
            "#,
        )
        .execute(pool)
        .await
        .context("failed to create menu_node table")?;

        Ok(())
    }

    /// Insert a new menu node.
    pub async fn create(pool: &PgPool, input: CreateMenuNode) -> Result<Self> {
        let node = Self::from_input(input, chrono::Utc::now().timestamp());

        let created = sqlx::query_as::<_, MenuNode>(&format!(
            r#"
            INSERT INTO menu_node ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(node.id)
        .bind(&node.name)
        .bind(&node.url)
        .bind(&node.icon)
        .bind(node.parent_id)
        .bind(node.order)
        .bind(node.is_active)
        .bind(node.created)
        .bind(node.changed)
        .fetch_one(pool)
        .await
        .context("failed to create menu node")?;

        Ok(created)
    }

    /// Find a menu node by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let node = sqlx::query_as::<_, MenuNode>(&format!(
            "SELECT {COLUMNS} FROM menu_node WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch menu node by id")?;

        Ok(node)
    }

    /// All menu nodes ordered by sort order, ties in creation order.
    pub async fn list_sorted(pool: &PgPool) -> Result<Vec<Self>> {
        let nodes = sqlx::query_as::<_, MenuNode>(&format!(
            "SELECT {COLUMNS} FROM menu_node ORDER BY sort_order ASC, created ASC, id ASC"
        ))
        .fetch_all(pool)
        .await
        .context("failed to list menu nodes")?;

        Ok(nodes)
    }

    /// Update a menu node.
    pub async fn update(pool: &PgPool, id: Uuid, input: UpdateMenuNode) -> Result<Option<Self>> {
        let Some(mut node) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        node.apply_update(input, chrono::Utc::now().timestamp());

        let updated = sqlx::query_as::<_, MenuNode>(&format!(
            r#"
            UPDATE menu_node
            SET name = $1, url = $2, icon = $3, parent_id = $4, sort_order = $5,
                is_active = $6, changed = $7
            WHERE id = $8
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&node.name)
        .bind(&node.url)
        .bind(&node.icon)
        .bind(node.parent_id)
        .bind(node.order)
        .bind(node.is_active)
        .bind(node.changed)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to update menu node")?;

        Ok(updated)
    }

    /// Delete a menu node, moving its direct children up to its former parent.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let mut tx = pool.begin().await.context("failed to start transaction")?;

        let parent: Option<Option<Uuid>> =
            sqlx::query_scalar("SELECT parent_id FROM menu_node WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .context("failed to lock menu node for delete")?;

        let Some(parent) = parent else {
            return Ok(false);
        };

        sqlx::query("UPDATE menu_node SET parent_id = $1, changed = $2 WHERE parent_id = $3")
            .bind(parent)
            .bind(chrono::Utc::now().timestamp())
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("failed to re-parent children of deleted menu node")?;

        let result = sqlx::query("DELETE FROM menu_node WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("failed to delete menu node")?;

        tx.commit().await.context("failed to commit menu node delete")?;

        Ok(result.rows_affected() > 0)
    }

    /// Overwrite sibling order for a batch of nodes in a single transaction.
    ///
    /// If any id is missing the transaction is rolled back and the missing
    /// ids are reported; nothing is written.
    pub async fn bulk_reorder(
        pool: &PgPool,
        updates: &[ReorderUpdate],
    ) -> Result<std::result::Result<(), ReorderError>> {
        let mut tx = pool.begin().await.context("failed to start transaction")?;
        let now = chrono::Utc::now().timestamp();
        let mut missing = Vec::new();

        for update in updates {
            let result =
                sqlx::query("UPDATE menu_node SET sort_order = $1, changed = $2 WHERE id = $3")
                    .bind(update.order)
                    .bind(now)
                    .bind(update.id)
                    .execute(&mut *tx)
                    .await
                    .context("failed to reorder menu node")?;

            if result.rows_affected() == 0 && !missing.contains(&update.id) {
                missing.push(update.id);
            }
        }

        if !missing.is_empty() {
            tx.rollback()
                .await
                .context("failed to roll back menu reorder")?;
            return Ok(Err(ReorderError::UnknownIds(missing)));
        }

        tx.commit().await.context("failed to commit menu reorder")?;
        Ok(Ok(()))
    }
}
