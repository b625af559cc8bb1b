//! Flattening a built tree back into path-annotated entries.

use serde::Serialize;

use super::tree::MenuTreeNode;
use crate::models::MenuNode;

/// One node of a flattened tree.
#[derive(Debug, Clone, Serialize)]
pub struct FlatEntry {
    #[serde(flatten)]
    pub node: MenuNode,
    /// Nesting depth; roots are 0.
    pub depth: usize,
    /// Dotted positional path, e.g. `"0.1"` for the second child of the
    /// first root. Derived from position, not from the stored `order`.
    pub path: String,
}

/// Depth-first pre-order walk of the forest.
pub fn flatten(tree: &[MenuTreeNode]) -> Vec<FlatEntry> {
    let mut out = Vec::new();
    let mut stack: Vec<(&MenuTreeNode, String, usize)> = tree
        .iter()
        .enumerate()
        .rev()
        .map(|(i, root)| (root, i.to_string(), 0))
        .collect();

    while let Some((node, path, depth)) = stack.pop() {
        // Pushed in reverse so the first child is visited next.
        stack.extend(
            node.children
                .iter()
                .enumerate()
                .rev()
                .map(|(i, child)| (child, format!("{path}.{i}"), depth + 1)),
        );
        out.push(FlatEntry {
            node: node.node.clone(),
            depth,
            path,
        });
    }
    out
}
