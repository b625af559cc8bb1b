//! Tree construction from the flat menu node list.
//!
//! The tree is a derived view: it is rebuilt from the flat records on every
//! read and never cached or persisted.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;
use uuid::Uuid;

use crate::models::MenuNode;

/// Deepest nesting level a menu node may be written at; roots are level 0.
pub const MAX_DEPTH: usize = 32;

/// How a node ended up where it sits in the built forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Root by intent (no parent), or nested under its resolved parent.
    Attached,
    /// Parent reference did not resolve (or looped); promoted to root.
    OrphanedToRoot,
}

/// A menu node with its children populated.
#[derive(Debug, Clone, Serialize)]
pub struct MenuTreeNode {
    #[serde(flatten)]
    pub node: MenuNode,
    pub placement: Placement,
    pub children: Vec<MenuTreeNode>,
}

impl MenuTreeNode {
    /// Number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// Build a forest from an unordered flat list of menu nodes.
///
/// Every input node appears exactly once in the output. Roots and every
/// sibling group are sorted by `order` with ties kept in input order.
/// A node whose parent id is unknown becomes a root tagged
/// [`Placement::OrphanedToRoot`]. Nodes caught in a parent loop (corrupt data)
/// are handled the same way: the first such node in input order is promoted
/// and the loop edge into it is dropped.
pub fn build_tree(items: Vec<MenuNode>) -> Vec<MenuTreeNode> {
    let count = items.len();

    // First occurrence wins for duplicate ids.
    let mut index: HashMap<Uuid, usize> = HashMap::with_capacity(count);
    for (i, item) in items.iter().enumerate() {
        index.entry(item.id).or_insert(i);
    }

    let mut parent_of: Vec<Option<usize>> = Vec::with_capacity(count);
    let mut placement: Vec<Placement> = Vec::with_capacity(count);
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];

    for (i, item) in items.iter().enumerate() {
        match item.parent_id.map(|pid| index.get(&pid).copied()) {
            None => {
                parent_of.push(None);
                placement.push(Placement::Attached);
            }
            Some(Some(p)) if p != i => {
                parent_of.push(Some(p));
                placement.push(Placement::Attached);
                children[p].push(i);
            }
            Some(_) => {
                parent_of.push(None);
                placement.push(Placement::OrphanedToRoot);
            }
        }
    }

    // Anything not reachable from a root sits in or below a parent loop.
    let mut reached = vec![false; count];
    for i in 0..count {
        if parent_of[i].is_none() {
            mark_reachable(i, &children, &mut reached);
        }
    }
    for i in 0..count {
        if reached[i] {
            continue;
        }
        if let Some(p) = parent_of[i].take() {
            children[p].retain(|&c| c != i);
        }
        placement[i] = Placement::OrphanedToRoot;
        mark_reachable(i, &children, &mut reached);
    }

    let mut slots: Vec<Option<MenuNode>> = items.into_iter().map(Some).collect();
    let mut built: Vec<Option<MenuTreeNode>> = (0..count).map(|_| None).collect();
    let mut roots: Vec<MenuTreeNode> = (0..count)
        .filter(|&i| parent_of[i].is_none())
        .filter_map(|i| assemble(i, &mut slots, &mut built, &children, &placement))
        .collect();
    roots.sort_by_key(|n| n.node.order);

    roots
}

fn mark_reachable(start: usize, children: &[Vec<usize>], reached: &mut [bool]) {
    let mut queue = VecDeque::from([start]);
    while let Some(i) = queue.pop_front() {
        if reached[i] {
            continue;
        }
        reached[i] = true;
        queue.extend(children[i].iter().copied().filter(|&c| !reached[c]));
    }
}

/// Build the subtree under `root` bottom-up with an explicit stack, so
/// nesting depth is bounded by the heap rather than the thread stack.
fn assemble(
    root: usize,
    slots: &mut [Option<MenuNode>],
    built: &mut [Option<MenuTreeNode>],
    children: &[Vec<usize>],
    placement: &[Placement],
) -> Option<MenuTreeNode> {
    let mut stack = vec![(root, false)];
    while let Some((i, expanded)) = stack.pop() {
        if !expanded {
            stack.push((i, true));
            stack.extend(children[i].iter().map(|&c| (c, false)));
            continue;
        }
        let Some(node) = slots[i].take() else {
            continue;
        };
        let mut kids: Vec<MenuTreeNode> = children[i]
            .iter()
            .filter_map(|&c| built[c].take())
            .collect();
        // sort_by_key is stable, which keeps input order for equal `order`.
        kids.sort_by_key(|n| n.node.order);

        built[i] = Some(MenuTreeNode {
            node,
            placement: placement[i],
            children: kids,
        });
    }
    built[root].take()
}

/// Ids of roots that were promoted because their parent did not resolve.
pub fn orphans(tree: &[MenuTreeNode]) -> Vec<Uuid> {
    tree.iter()
        .filter(|n| n.placement == Placement::OrphanedToRoot)
        .map(|n| n.node.id)
        .collect()
}

/// Drop inactive nodes together with everything beneath them.
pub fn prune_inactive(mut tree: Vec<MenuTreeNode>) -> Vec<MenuTreeNode> {
    {
        let mut levels: Vec<&mut Vec<MenuTreeNode>> = vec![&mut tree];
        while let Some(level) = levels.pop() {
            level.retain(|n| n.node.is_active);
            levels.extend(level.iter_mut().map(|n| &mut n.children));
        }
    }
    tree
}
