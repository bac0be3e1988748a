//! Client side of LongList: transports, the backend worker, and the headless
//! list controller that drives a virtualized render surface.

/// Transport seam (`ListApi`) with HTTP and in-process implementations.
pub mod api;
/// Backend worker + protocol types used by the controller and headless tests.
pub mod backend;
pub mod buffer;
pub mod controller;
pub mod debounce;
pub mod drag;

pub use api::{ClientError, HttpApi, ListApi, LocalApi};
pub use backend::{spawn_backend, BackendHandle, CoreCmd, CoreErrorSource, CoreEvent};
pub use buffer::{LoadedBuffer, Row};
pub use controller::{ControllerStats, ListController};
pub use debounce::{SearchDebouncer, SEARCH_DEBOUNCE};
