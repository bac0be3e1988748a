//! Window and state payloads exchanged between client and server.

use super::item::ItemView;
use serde::{Deserialize, Serialize};

/// Query parameters for `GET /api/items`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ItemsQuery {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
}

/// One window of the filtered view plus the size of the whole view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsPage {
    pub items: Vec<ItemView>,
    pub total: usize,
}

/// Startup snapshot: first canonical page, catalog size, and the full
/// selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub items: Vec<ItemView>,
    pub total: usize,
    pub selected_ids: Vec<u64>,
}

/// Request payload for `POST /api/state`.
///
/// Absent fields leave the corresponding sub-state untouched.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorted: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<Vec<u64>>,
}

impl UpdateStateRequest {
    pub fn sorted(ids: Vec<u64>) -> Self {
        Self {
            sorted: Some(ids),
            selected: None,
        }
    }

    pub fn selected(ids: Vec<u64>) -> Self {
        Self {
            sorted: None,
            selected: Some(ids),
        }
    }
}

/// Acknowledgement returned by `POST /api/state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAck {
    pub message: String,
}

impl UpdateAck {
    pub fn updated() -> Self {
        Self {
            message: "State updated".to_string(),
        }
    }
}
