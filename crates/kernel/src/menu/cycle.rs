//! Re-parent cycle detection.

use std::collections::{HashMap, HashSet, VecDeque};

use uuid::Uuid;

use crate::models::MenuNode;

/// Would moving `moving` under `candidate_parent` make it its own ancestor?
///
/// Walks down the moving node's subtree breadth-first. The visited set keeps
/// the walk finite even when stored data already contains a loop.
/// Advisory only: callers check before writing and reject on `true`.
pub fn would_create_cycle(
    candidate_parent: Option<Uuid>,
    moving: Uuid,
    nodes: &[MenuNode],
) -> bool {
    let Some(candidate) = candidate_parent else {
        return false;
    };
    if candidate == moving {
        return true;
    }

    let children = child_index(nodes);
    let mut visited: HashSet<Uuid> = HashSet::from([moving]);
    let mut queue = VecDeque::from([moving]);

    while let Some(current) = queue.pop_front() {
        let Some(kids) = children.get(&current) else {
            continue;
        };
        for &kid in kids {
            if kid == candidate {
                return true;
            }
            if visited.insert(kid) {
                queue.push_back(kid);
            }
        }
    }

    false
}

/// Number of levels below `id`; a leaf has height 0.
///
/// Used to check that moving a whole subtree keeps its deepest node within
/// the nesting limit. Loops in stored data are visited once.
pub fn subtree_height(id: Uuid, nodes: &[MenuNode]) -> usize {
    let children = child_index(nodes);
    let mut visited: HashSet<Uuid> = HashSet::from([id]);
    let mut level = vec![id];
    let mut height = 0;

    loop {
        let next: Vec<Uuid> = level
            .iter()
            .filter_map(|parent| children.get(parent))
            .flatten()
            .copied()
            .filter(|kid| visited.insert(*kid))
            .collect();
        if next.is_empty() {
            return height;
        }
        height += 1;
        level = next;
    }
}

fn child_index(nodes: &[MenuNode]) -> HashMap<Uuid, Vec<Uuid>> {
    let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for node in nodes {
        if let Some(parent) = node.parent_id {
            children.entry(parent).or_default().push(node.id);
        }
    }
    children
}
