//! HTTP server wiring for LongList (API routes, handlers, and shared state).

/// Embedded server helper for in-process clients and tests.
pub mod embedded;
/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers for the item window and state endpoints.
pub mod handlers;

pub use embedded::EmbeddedServer;
pub use error::HttpError;
pub use longlist_core::{config, models, AppError, Catalog, Config, ListStore, DEFAULT_PORT};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ListStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Construct shared application state, seeding the catalog from `config`.
    ///
    /// # Returns
    /// A new [`AppState`] with identity order and an empty selection.
    pub fn new(config: Config) -> Self {
        let store = Arc::new(ListStore::from_config(&config));
        Self::with_store(config, store)
    }

    /// Construct shared application state around an existing store.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `store`: Shared list store (also usable in-process by other callers).
    ///
    /// # Returns
    /// A new [`AppState`] wired to the provided store.
    pub fn with_store(config: Config, store: Arc<ListStore>) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware.
///
/// CORS admits loopback origins on `config.port` unless
/// `allow_public_access` is set.
pub fn create_app(state: AppState, allow_public_access: bool) -> Router {
    let origin_port = state.config.port;
    build_router(state, cors_layer(allow_public_access, origin_port))
}

/// Parse a `BIND` override, falling back to loopback on `port`.
fn parse_bind_override(raw: Option<&str>, port: u16) -> SocketAddr {
    let loopback = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port);
    let Some(raw) = raw else {
        return loopback;
    };
    raw.trim().parse().unwrap_or_else(|err| {
        tracing::warn!("Ignoring BIND='{}' ({}); using {}", raw, err, loopback);
        loopback
    })
}

/// Resolve the listen address from `BIND` and the configured port.
///
/// Without `allow_public_access` a non-loopback address keeps its port but is
/// pinned to `127.0.0.1`.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    let bind = std::env::var("BIND").ok();
    restrict_to_loopback(
        parse_bind_override(bind.as_deref(), config.port),
        allow_public_access,
    )
}

fn restrict_to_loopback(addr: SocketAddr, allow_public_access: bool) -> SocketAddr {
    if allow_public_access || addr.ip().is_loopback() {
        return addr;
    }
    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        addr
    );
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), addr.port())
}

fn cors_layer(allow_public_access: bool, origin_port: u16) -> CorsLayer {
    let methods = [Method::GET, Method::POST];
    if allow_public_access {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }
    let origins: Vec<HeaderValue> = ["localhost", "127.0.0.1"]
        .iter()
        .filter_map(|host| {
            HeaderValue::from_str(&format!("http://{}:{}", host, origin_port)).ok()
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(methods)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let body_limit = state.config.max_request_size;
    Router::new()
        .route("/api/items", get(handlers::items::get_items))
        .route(
            "/api/state",
            get(handlers::state::get_state).post(handlers::state::update_state),
        )
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors)
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                )),
        )
}

/// Serve the API on `listener` until `shutdown_signal` resolves.
///
/// CORS origins use the port the listener actually bound, so port 0 works.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    allow_public_access: bool,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let origin_port = listener
        .local_addr()
        .map_or(state.config.port, |addr| addr.port());
    let app = build_router(state, cors_layer(allow_public_access, origin_port));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
