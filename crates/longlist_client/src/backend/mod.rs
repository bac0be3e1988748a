//! Backend worker wiring for the client.
//!
//! This module exposes the command/event protocol plus the worker spawn helper
//! used by [`ListController`](crate::controller::ListController).

mod protocol;
mod worker;

pub use protocol::{CoreCmd, CoreErrorSource, CoreEvent, Generation};
pub use worker::{spawn_backend, BackendHandle};
