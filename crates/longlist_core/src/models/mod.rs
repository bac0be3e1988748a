//! Data models for catalog items and API payloads.

/// Catalog items and their wire representation.
pub mod item;
/// Request/response payloads for the window and state endpoints.
pub mod state;
