//! Menu service.
//!
//! Glue between the HTTP routes, the pure tree logic in [`crate::menu`], and
//! a [`MenuStore`]. The tree is rebuilt from the flat records on every read.
//!
//! Re-parent cycle checks run against a snapshot read before the write; a
//! concurrent re-parent landing between the two is not guarded against.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::menu::{
    FlatEntry, MAX_DEPTH, MenuTreeNode, ReorderUpdate, ancestors, build_tree, flatten, orphans,
    prune_inactive, subtree_height, would_create_cycle,
};
use crate::models::{CreateMenuNode, MenuNode, UpdateMenuNode};
use crate::store::MenuStore;

/// Service for reading and editing the navigation menu.
pub struct MenuService {
    store: Arc<dyn MenuStore>,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("menu node {id} not found"))
}

fn parent_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("parent menu node {id} not found"))
}

/// Reject a write that would place a node deeper than [`MAX_DEPTH`].
fn check_depth(depth: usize) -> AppResult<()> {
    if depth > MAX_DEPTH {
        return Err(AppError::Validation(format!(
            "menu nesting may not exceed {MAX_DEPTH} levels below the root"
        )));
    }
    Ok(())
}

impl MenuService {
    /// Create a new MenuService.
    pub fn new(store: Arc<dyn MenuStore>) -> Arc<Self> {
        Arc::new(Self { store })
    }

    /// Build the full menu forest.
    pub async fn tree(&self, active_only: bool) -> AppResult<Vec<MenuTreeNode>> {
        let nodes = self.store.list_sorted().await?;
        let count = nodes.len();
        let tree = build_tree(nodes);

        for id in orphans(&tree) {
            warn!(node_id = %id, "menu node parent missing; promoted to root");
        }
        debug!(nodes = count, roots = tree.len(), "built menu tree");

        Ok(if active_only {
            prune_inactive(tree)
        } else {
            tree
        })
    }

    /// The forest flattened in pre-order with positional paths.
    pub async fn flat(&self, active_only: bool) -> AppResult<Vec<FlatEntry>> {
        Ok(flatten(&self.tree(active_only).await?))
    }

    /// Fetch one node.
    pub async fn get(&self, id: Uuid) -> AppResult<MenuNode> {
        self.store.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    /// Create a node. A supplied parent must exist and leave room for
    /// one more level.
    pub async fn create(&self, input: CreateMenuNode) -> AppResult<MenuNode> {
        input.validate().map_err(AppError::Validation)?;

        if let Some(parent) = input.parent_id {
            let snapshot = self.store.list_sorted().await?;
            let trail = ancestors(parent, &snapshot).ok_or_else(|| parent_not_found(parent))?;
            check_depth(trail.len())?;
        }

        let node = self.store.create(input).await?;
        info!(node_id = %node.id, name = %node.name, "menu node created");
        Ok(node)
    }

    /// Update a node, rejecting re-parents that would create a cycle.
    pub async fn update(&self, id: Uuid, input: UpdateMenuNode) -> AppResult<MenuNode> {
        input.validate().map_err(AppError::Validation)?;

        let existing = self.get(id).await?;

        if input.changes_parent(existing.parent_id)
            && let Some(Some(parent)) = input.parent_id
        {
            let snapshot = self.store.list_sorted().await?;
            if would_create_cycle(Some(parent), id, &snapshot) {
                warn!(node_id = %id, parent_id = %parent, "rejected cyclic re-parent");
                return Err(AppError::Cycle(format!(
                    "moving menu node {id} under {parent} would create a cycle"
                )));
            }
            let trail = ancestors(parent, &snapshot).ok_or_else(|| parent_not_found(parent))?;
            check_depth(trail.len() + subtree_height(id, &snapshot))?;
        }

        let node = self.store.update(id, input).await?.ok_or_else(|| not_found(id))?;
        info!(node_id = %id, "menu node updated");
        Ok(node)
    }

    /// Delete a node. Its children move up to its former parent.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete(id).await? {
            return Err(not_found(id));
        }
        info!(node_id = %id, "menu node deleted");
        Ok(())
    }

    /// Apply a reorder batch, all-or-nothing.
    pub async fn reorder(&self, updates: &[ReorderUpdate]) -> AppResult<()> {
        if updates.is_empty() {
            return Err(AppError::Validation("reorder batch is empty".to_string()));
        }

        // The store checks every id inside its own write, so a batch naming
        // an unknown node is rejected as a whole.
        self.store.bulk_reorder(updates).await?;
        info!(count = updates.len(), "menu reordered");
        Ok(())
    }

    /// Root-first ancestor trail ending at `id`.
    pub async fn breadcrumb(&self, id: Uuid) -> AppResult<Vec<MenuNode>> {
        let nodes = self.store.list_sorted().await?;
        ancestors(id, &nodes).ok_or_else(|| not_found(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::store::MemoryMenuStore;

    fn service() -> Arc<MenuService> {
        MenuService::new(Arc::new(MemoryMenuStore::new()))
    }

    async fn add(svc: &MenuService, name: &str, order: i32, parent: Option<Uuid>) -> MenuNode {
        svc.create(CreateMenuNode {
            name: name.to_string(),
            order: Some(order),
            parent_id: parent,
            ..Default::default()
        })
        .await
        .unwrap()
    }

    fn move_to(parent: Option<Uuid>) -> UpdateMenuNode {
        UpdateMenuNode {
            parent_id: Some(parent),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_validates_name() {
        let err = service()
            .create(CreateMenuNode {
                name: String::new(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_requires_existing_parent() {
        let err = service()
            .create(CreateMenuNode {
                name: "Child".to_string(),
                parent_id: Some(Uuid::now_v7()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn tree_reflects_store() {
        let svc = service();
        let courses = add(&svc, "Courses", 1, None).await;
        add(&svc, "Home", 0, None).await;
        add(&svc, "My Courses", 1, Some(courses.id)).await;
        add(&svc, "All Courses", 0, Some(courses.id)).await;

        let tree = svc.tree(false).await.unwrap();
        assert_eq!(tree[0].node.name, "Home");
        assert_eq!(tree[1].node.name, "Courses");
        assert_eq!(tree[1].children[0].node.name, "All Courses");
        assert_eq!(tree[1].children[1].node.name, "My Courses");

        let flat = svc.flat(false).await.unwrap();
        assert_eq!(flat.len(), 4);
        assert_eq!(flat[3].path, "1.1");
    }

    #[tokio::test]
    async fn active_only_hides_inactive_subtrees() {
        let svc = service();
        let root = add(&svc, "Root", 0, None).await;
        add(&svc, "Child", 0, Some(root.id)).await;
        svc.update(
            root.id,
            UpdateMenuNode {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(svc.tree(true).await.unwrap().is_empty());
        assert_eq!(svc.tree(false).await.unwrap()[0].node_count(), 2);
    }

    #[tokio::test]
    async fn reparent_under_descendant_is_rejected_without_mutation() {
        let svc = service();
        let a = add(&svc, "A", 0, None).await;
        let b = add(&svc, "B", 0, Some(a.id)).await;
        let c = add(&svc, "C", 0, Some(b.id)).await;

        let err = svc.update(a.id, move_to(Some(c.id))).await.unwrap_err();
        assert!(matches!(err, AppError::Cycle(_)));
        assert_eq!(svc.get(a.id).await.unwrap().parent_id, None);

        let err = svc.update(a.id, move_to(Some(a.id))).await.unwrap_err();
        assert!(matches!(err, AppError::Cycle(_)));
    }

    #[tokio::test]
    async fn reparent_to_unrelated_node_and_root() {
        let svc = service();
        let a = add(&svc, "A", 0, None).await;
        let b = add(&svc, "B", 0, Some(a.id)).await;
        let d = add(&svc, "D", 1, None).await;

        let moved = svc.update(b.id, move_to(Some(d.id))).await.unwrap();
        assert_eq!(moved.parent_id, Some(d.id));

        let moved = svc.update(b.id, move_to(None)).await.unwrap();
        assert_eq!(moved.parent_id, None);
    }

    #[tokio::test]
    async fn reparent_to_missing_parent_is_not_found() {
        let svc = service();
        let a = add(&svc, "A", 0, None).await;
        let err = svc
            .update(a.id, move_to(Some(Uuid::now_v7())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_rejects_nesting_past_max_depth() {
        let svc = service();
        let mut parent = add(&svc, "level-0", 0, None).await;
        for level in 1..=MAX_DEPTH {
            parent = add(&svc, &format!("level-{level}"), 0, Some(parent.id)).await;
        }

        let err = svc
            .create(CreateMenuNode {
                name: "too deep".to_string(),
                parent_id: Some(parent.id),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(svc.flat(false).await.unwrap().len(), MAX_DEPTH + 1);
    }

    #[tokio::test]
    async fn reparent_counts_the_moved_subtree_depth() {
        let svc = service();
        let mut deep = add(&svc, "deep-0", 0, None).await;
        for level in 1..MAX_DEPTH {
            deep = add(&svc, &format!("deep-{level}"), 0, Some(deep.id)).await;
        }
        let branch = add(&svc, "branch", 1, None).await;
        add(&svc, "leaf", 0, Some(branch.id)).await;

        // `deep` sits at MAX_DEPTH - 1: the branch fits, its leaf would not.
        let err = svc
            .update(branch.id, move_to(Some(deep.id)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(svc.get(branch.id).await.unwrap().parent_id, None);

        let leaf_only = add(&svc, "single", 2, None).await;
        let moved = svc.update(leaf_only.id, move_to(Some(deep.id))).await.unwrap();
        assert_eq!(moved.parent_id, Some(deep.id));
    }

    #[tokio::test]
    async fn update_and_delete_missing_node() {
        let svc = service();
        let ghost = Uuid::now_v7();
        assert!(matches!(
            svc.update(ghost, UpdateMenuNode::default()).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            svc.delete(ghost).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn reorder_rejects_empty_and_unknown() {
        let svc = service();
        let a = add(&svc, "A", 0, None).await;

        assert!(matches!(
            svc.reorder(&[]).await.unwrap_err(),
            AppError::Validation(_)
        ));

        let err = svc
            .reorder(&[
                ReorderUpdate { id: a.id, order: 3 },
                ReorderUpdate { id: Uuid::now_v7(), order: 4 },
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(svc.get(a.id).await.unwrap().order, 0);
    }

    #[tokio::test]
    async fn reorder_changes_sibling_positions() {
        let svc = service();
        let first = add(&svc, "first", 0, None).await;
        let second = add(&svc, "second", 1, None).await;

        let batch = [
            ReorderUpdate { id: first.id, order: 1 },
            ReorderUpdate { id: second.id, order: 0 },
        ];
        svc.reorder(&batch).await.unwrap();
        let once = svc.tree(false).await.unwrap();
        svc.reorder(&batch).await.unwrap();
        let twice = svc.tree(false).await.unwrap();

        let names = |t: &[MenuTreeNode]| t.iter().map(|n| n.node.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&once), ["second", "first"]);
        assert_eq!(names(&once), names(&twice));
    }

    #[tokio::test]
    async fn delete_reparents_children() {
        let svc = service();
        let top = add(&svc, "top", 0, None).await;
        let mid = add(&svc, "mid", 0, Some(top.id)).await;
        let leaf = add(&svc, "leaf", 0, Some(mid.id)).await;

        svc.delete(mid.id).await.unwrap();

        let tree = svc.tree(false).await.unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children[0].node.id, leaf.id);
    }

    #[tokio::test]
    async fn breadcrumb_trail() {
        let svc = service();
        let top = add(&svc, "Courses", 0, None).await;
        let leaf = add(&svc, "Mine", 0, Some(top.id)).await;

        let trail = svc.breadcrumb(leaf.id).await.unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].id, top.id);

        assert!(matches!(
            svc.breadcrumb(Uuid::now_v7()).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
