//! Shared constants used across LongList crates.
//!
//! Page sizes are part of the wire protocol: clients and servers must agree on
//! them for incremental loading to line up.

/// Default API port for LongList.
pub const DEFAULT_PORT: u16 = 38412;

/// Default number of items seeded into the catalog at startup.
pub const DEFAULT_CATALOG_SIZE: usize = 1_000_000;

/// Default label prefix; item `n` is labelled `"{prefix} {n}"`.
pub const DEFAULT_ITEM_LABEL_PREFIX: &str = "Item";

/// Default maximum request body accepted by the API layer.
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 1024 * 1024;

/// Page size used by `GetItems` when no `limit` is supplied, and by
/// incremental loads on the client.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Page size of the first fetch after a settled, non-empty search.
pub const SEARCH_PAGE_LIMIT: usize = 40;

/// Number of canonical items returned by `GetState`.
pub const INITIAL_STATE_LIMIT: usize = 20;

/// Upper bound applied to client-supplied `limit` values.
pub const MAX_PAGE_LIMIT: usize = 1_000;

/// Fixed row height of the list renderer, in layout units.
pub const ROW_HEIGHT: f32 = 45.0;

/// Fixed viewport height of the list renderer, in layout units.
pub const VIEWPORT_HEIGHT: f32 = 600.0;

/// More data is requested once the visible range is within this many rows of
/// the end of the loaded buffer.
pub const LOAD_MORE_THRESHOLD_ROWS: usize = 5;

/// Quiet interval before a typed search query settles, in milliseconds.
pub const SEARCH_DEBOUNCE_MS: u64 = 500;

/// Default base URL for CLI/API clients.
pub const DEFAULT_CLIENT_SERVER_URL: &str = "http://localhost:38412";
