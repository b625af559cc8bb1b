//! Database models.

pub mod menu_node;

pub use menu_node::{CreateMenuNode, MenuNode, UpdateMenuNode};
