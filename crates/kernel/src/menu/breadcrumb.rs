//! Ancestor trails for breadcrumb navigation.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::models::MenuNode;

/// Root-first trail ending at `id`.
///
/// Stops at the first dangling parent reference, and at a repeated node when
/// stored data loops. Returns `None` if `id` is not in `nodes`.
pub fn ancestors(id: Uuid, nodes: &[MenuNode]) -> Option<Vec<MenuNode>> {
    let by_id: HashMap<Uuid, &MenuNode> = nodes.iter().rev().map(|n| (n.id, n)).collect();

    let mut current = *by_id.get(&id)?;
    let mut seen = HashSet::from([current.id]);
    let mut trail = vec![current.clone()];

    while let Some(parent) = current.parent_id.and_then(|p| by_id.get(&p).copied()) {
        if !seen.insert(parent.id) {
            break;
        }
        trail.push(parent.clone());
        current = parent;
    }

    trail.reverse();
    Some(trail)
}
