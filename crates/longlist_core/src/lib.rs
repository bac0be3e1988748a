//! Core domain library for LongList (catalog, canonical order, selection, windows).

/// Immutable item catalog with id-indexed lookup.
pub mod catalog;
/// Configuration loading and defaults.
pub mod config;
/// Protocol constants shared by the server and client crates.
pub mod constants;
/// Application error types (domain/storage).
pub mod error;
/// Case-insensitive substring filtering over the canonical order.
pub mod filter;
/// Data models for API requests and responses.
pub mod models;
/// Canonical ordering of catalog ids.
pub mod order;
/// Whole-set replacement selection state.
pub mod selection;
/// Lock-guarded store composing catalog, order, and selection into windows.
pub mod store;

pub use catalog::Catalog;
pub use config::Config;
pub use constants::{
    DEFAULT_CLIENT_SERVER_URL, DEFAULT_PAGE_LIMIT, DEFAULT_PORT, INITIAL_STATE_LIMIT,
    MAX_PAGE_LIMIT, SEARCH_PAGE_LIMIT,
};
pub use error::AppError;
pub use store::ListStore;
