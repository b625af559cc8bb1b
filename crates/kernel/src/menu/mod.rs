//! Navigation menu core.
//!
//! Pure transformations over an already-fetched flat list of menu nodes:
//! - Tree construction with stable sibling ordering
//! - Re-parent cycle detection
//! - Bulk reordering and flattening
//! - Ancestor trails for breadcrumbs
//!
//! Nothing here touches storage; see [`crate::store`] for that.

mod breadcrumb;
mod cycle;
mod flatten;
mod reorder;
mod tree;

pub use breadcrumb::ancestors;
pub use cycle::{subtree_height, would_create_cycle};
pub use flatten::{FlatEntry, flatten};
pub use reorder::{ReorderError, ReorderUpdate, apply_reorder};
pub use tree::{MAX_DEPTH, MenuTreeNode, Placement, build_tree, orphans, prune_inactive};
