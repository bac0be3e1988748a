//! Catalog item models.

use serde::{Deserialize, Serialize};

/// One immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub text: String,
}

impl Item {
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// An item as returned over the wire, stamped with its selection membership
/// at the time the window was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub id: u64,
    pub text: String,
    pub is_selected: bool,
}

impl ItemView {
    /// Build a wire item from a catalog entry.
    pub fn from_item(item: &Item, is_selected: bool) -> Self {
        Self {
            id: item.id,
            text: item.text.clone(),
            is_selected,
        }
    }
}
