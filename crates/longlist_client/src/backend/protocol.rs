//! Protocol types for the client backend worker.

use longlist_core::models::state::{ItemsPage, StateSnapshot, UpdateStateRequest};

/// Monotonic tag identifying which query a fetch belongs to.
///
/// The controller bumps it on every settled query change; responses carrying
/// an older generation are discarded.
pub type Generation = u64;

/// Commands issued by the controller for the backend worker to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCmd {
    /// Fetch `[offset, offset + limit)` of the filtered view for `query`.
    FetchWindow {
        generation: Generation,
        offset: usize,
        limit: usize,
        query: String,
    },
    /// Fetch the startup snapshot (empty-query first page plus selection).
    FetchState { generation: Generation },
    /// Send a reorder and/or selection replacement. Fire-and-forget.
    UpdateState { request: UpdateStateRequest },
}

/// Which command an error event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorSource {
    Window,
    State,
    Update,
}

/// Events produced by the backend worker and polled by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    /// A window fetch completed.
    WindowLoaded {
        generation: Generation,
        offset: usize,
        page: ItemsPage,
    },
    /// A state snapshot fetch completed.
    StateLoaded {
        generation: Generation,
        snapshot: StateSnapshot,
    },
    /// The server acknowledged an update.
    StateUpdated,
    /// A command failed. `generation` is set for fetches, `None` for updates.
    Error {
        source: CoreErrorSource,
        generation: Option<Generation>,
        message: String,
    },
}
