//! Campus test utilities.
//!
//! Helpers for integration testing: menu node fixtures, request payload
//! builders, and assertion utilities for JSON responses.

use serde_json::{Value as JsonValue, json};
use uuid::Uuid;

/// Create a root-level test menu node with default values.
pub fn test_menu_node(name: &str) -> TestMenuNode {
    TestMenuNode {
        id: Uuid::now_v7(),
        name: name.to_string(),
        url: None,
        icon: None,
        parent_id: None,
        order: 0,
        is_active: true,
    }
}

/// A menu node builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestMenuNode {
    pub id: Uuid,
    pub name: String,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub parent_id: Option<Uuid>,
    pub order: i32,
    pub is_active: bool,
}

impl TestMenuNode {
    /// Set a custom ID.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Nest under a parent.
    pub fn under(mut self, parent: &TestMenuNode) -> Self {
        self.parent_id = Some(parent.id);
        self
    }

    /// Point at a parent id that may not exist.
    pub fn with_parent_id(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Set the sibling order.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Set the navigation target.
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    /// Set the icon token.
    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    /// Mark as inactive.
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Full record as stored, suitable for deserializing into the kernel model.
    pub fn to_json(&self) -> JsonValue {
        json!({
            "id": self.id,
            "name": self.name,
            "url": self.url,
            "icon": self.icon,
            "parent_id": self.parent_id,
            "order": self.order,
            "is_active": self.is_active,
        })
    }

    /// Body for the create endpoint (no id; the kernel assigns one).
    pub fn create_payload(&self) -> JsonValue {
        json!({
            "name": self.name,
            "url": self.url,
            "icon": self.icon,
            "parent_id": self.parent_id,
            "order": self.order,
            "is_active": self.is_active,
        })
    }
}

/// Body for the reorder endpoint.
pub fn reorder_payload(updates: &[(Uuid, i32)]) -> JsonValue {
    json!({
        "updates": updates
            .iter()
            .map(|(id, order)| json!({"id": id, "order": order}))
            .collect::<Vec<_>>()
    })
}

/// Assertion helpers for JSON content.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a JSON array of objects has these `name` values, in order.
    pub fn names(value: &Value, expected: &[&str]) {
        let actual: Vec<&str> = value
            .as_array()
            .map(|items| items.iter().filter_map(|i| i["name"].as_str()).collect())
            .unwrap_or_default();
        assert_eq!(actual, expected, "name mismatch in: {value}");
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }
}
