//! Bulk sibling reordering.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::MenuNode;

/// A single `(id, order)` pair from a reorder batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderUpdate {
    pub id: Uuid,
    pub order: i32,
}

/// Reorder failures. Any failure leaves every node untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    /// The batch referenced ids that do not exist.
    #[error("unknown menu node ids: {}", join_ids(.0))]
    UnknownIds(Vec<Uuid>),
}

fn join_ids(ids: &[Uuid]) -> String {
    ids.iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Overwrite `order` on every node referenced by `updates`.
///
/// All-or-nothing: when any id is unknown nothing is modified. Order values
/// are not checked for uniqueness; ties are resolved by the tree builder.
/// If the same id appears more than once the last entry wins.
pub fn apply_reorder(nodes: &mut [MenuNode], updates: &[ReorderUpdate]) -> Result<(), ReorderError> {
    let positions: HashMap<Uuid, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id, i))
        .collect();

    let mut missing = Vec::new();
    for update in updates {
        if !positions.contains_key(&update.id) && !missing.contains(&update.id) {
            missing.push(update.id);
        }
    }
    if !missing.is_empty() {
        return Err(ReorderError::UnknownIds(missing));
    }

    for update in updates {
        if let Some(&i) = positions.get(&update.id) {
            nodes[i].order = update.order;
        }
    }

    Ok(())
}
