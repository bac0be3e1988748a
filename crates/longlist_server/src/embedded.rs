//! In-process API server for client harnesses and integration tests.
//!
//! The listener is bound on the caller's thread so bind failures surface from
//! [`EmbeddedServer::start`] directly; only serving runs on the background
//! thread.

use crate::{resolve_bind_address, serve_router, AppState};
use longlist_core::{Config, ListStore};
use std::io;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::sync::oneshot;
use tracing::{info, warn};

/// A running API server sharing its [`ListStore`] with the embedding process.
///
/// Dropping the handle stops the server and joins its thread.
pub struct EmbeddedServer {
    store: Arc<ListStore>,
    addr: SocketAddr,
    used_fallback: bool,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

/// Bind `requested`, or an auto-assigned port on the same IP if it is taken.
///
/// # Returns
/// The listener and whether the fallback port was used.
fn bind_listener(requested: SocketAddr) -> io::Result<(TcpListener, bool)> {
    match TcpListener::bind(requested) {
        Ok(listener) => Ok((listener, false)),
        Err(err) if err.kind() == io::ErrorKind::AddrInUse => {
            warn!("{} is in use; binding an auto-assigned port", requested);
            let listener = TcpListener::bind(SocketAddr::new(requested.ip(), 0))?;
            Ok((listener, true))
        }
        Err(err) => Err(err),
    }
}

impl EmbeddedServer {
    /// Serve an existing `store` with the limits and port from `config`.
    ///
    /// # Errors
    /// Returns an error if the socket, runtime, or server thread cannot be
    /// created.
    pub fn start_with_store(
        config: Config,
        store: Arc<ListStore>,
        allow_public: bool,
    ) -> io::Result<Self> {
        Self::start(AppState::with_store(config, store), allow_public)
    }

    /// Start serving `state` on a background thread.
    ///
    /// Binds `BIND` or `127.0.0.1:PORT`; a port already in use falls back to
    /// an auto-assigned one (see [`used_fallback`](Self::used_fallback)).
    ///
    /// # Errors
    /// Returns an error if the socket, runtime, or server thread cannot be
    /// created.
    pub fn start(state: AppState, allow_public: bool) -> io::Result<Self> {
        let requested = resolve_bind_address(&state.config, allow_public);
        let (listener, used_fallback) = bind_listener(requested)?;
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let store = Arc::clone(&state.store);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let thread = thread::Builder::new()
            .name("longlist-embedded-server".into())
            .spawn(move || {
                let served = runtime.block_on(async move {
                    let listener = tokio::net::TcpListener::from_std(listener)?;
                    let shutdown = async {
                        let _ = shutdown_rx.await;
                    };
                    serve_router(listener, state, allow_public, shutdown).await
                });
                if let Err(err) = served {
                    warn!("embedded server stopped: {}", err);
                }
            })?;

        info!(
            catalog = store.catalog().len(),
            fallback = used_fallback,
            "embedded API listening on http://{}",
            addr
        );
        Ok(Self {
            store,
            addr,
            used_fallback,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    /// Store served by this instance.
    pub fn store(&self) -> &Arc<ListStore> {
        &self.store
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL for API clients, e.g. `http://127.0.0.1:38412`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Whether the requested port was taken and an auto port was used.
    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }
}

impl Drop for EmbeddedServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}
