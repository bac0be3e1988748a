//! Root crate facade for LongList: the list store, its HTTP server, and the
//! headless client.

pub use longlist_client::{
    api, backend, buffer, controller, debounce, drag, spawn_backend, HttpApi, ListApi,
    ListController, LocalApi,
};
pub use longlist_server::{
    config, create_app, handlers, models, serve_router, AppError, AppState, Catalog, Config,
    EmbeddedServer, HttpError, ListStore,
};
