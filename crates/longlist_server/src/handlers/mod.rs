//! HTTP request handlers.

/// Window endpoint (`GET /api/items`).
pub mod items;
pub(crate) mod normalize;
/// State snapshot and update endpoints (`/api/state`).
pub mod state;
