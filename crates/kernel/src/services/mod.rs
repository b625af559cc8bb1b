//! Kernel services.
//!
//! Services sit between the HTTP routes and storage, applying validation
//! and the rules that keep the menu hierarchy consistent.

pub mod menu;

pub use menu::MenuService;
