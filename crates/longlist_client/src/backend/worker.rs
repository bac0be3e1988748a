//! Background worker thread for list service access.

use crate::api::ListApi;
use crate::backend::{CoreCmd, CoreErrorSource, CoreEvent, Generation};
use crossbeam_channel::{unbounded, Receiver, Sender};
use longlist_core::config::env_flag_enabled;
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

/// Handle for sending commands to, and receiving events from, the backend worker.
pub struct BackendHandle {
    pub cmd_tx: Sender<CoreCmd>,
    pub evt_rx: Receiver<CoreEvent>,
}

fn send_error(
    evt_tx: &Sender<CoreEvent>,
    source: CoreErrorSource,
    generation: Option<Generation>,
    message: String,
) {
    let _ = evt_tx.send(CoreEvent::Error {
        source,
        generation,
        message,
    });
}

fn log_fetch_perf(enabled: bool, op: &str, started: Instant, items: usize) {
    if !enabled {
        return;
    }
    info!(
        target: "longlist_client::backend_perf",
        op = op,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        items = items,
        "backend fetch perf"
    );
}

fn handle_command<A: ListApi>(
    api: &A,
    evt_tx: &Sender<CoreEvent>,
    perf_log_enabled: bool,
    cmd: CoreCmd,
) {
    match cmd {
        CoreCmd::FetchWindow {
            generation,
            offset,
            limit,
            query,
        } => {
            let started = Instant::now();
            match api.get_items(offset, limit, &query) {
                Ok(page) => {
                    log_fetch_perf(perf_log_enabled, "window", started, page.items.len());
                    let _ = evt_tx.send(CoreEvent::WindowLoaded {
                        generation,
                        offset,
                        page,
                    });
                }
                Err(err) => {
                    warn!("backend window fetch failed: {}", err);
                    send_error(
                        evt_tx,
                        CoreErrorSource::Window,
                        Some(generation),
                        format!("Failed to fetch items: {}", err),
                    );
                }
            }
        }
        CoreCmd::FetchState { generation } => {
            let started = Instant::now();
            match api.get_state() {
                Ok(snapshot) => {
                    log_fetch_perf(perf_log_enabled, "state", started, snapshot.items.len());
                    let _ = evt_tx.send(CoreEvent::StateLoaded {
                        generation,
                        snapshot,
                    });
                }
                Err(err) => {
                    warn!("backend state fetch failed: {}", err);
                    send_error(
                        evt_tx,
                        CoreErrorSource::State,
                        Some(generation),
                        format!("Failed to fetch initial data: {}", err),
                    );
                }
            }
        }
        CoreCmd::UpdateState { request } => match api.update_state(&request) {
            Ok(()) => {
                let _ = evt_tx.send(CoreEvent::StateUpdated);
            }
            Err(err) => {
                warn!("backend state update failed: {}", err);
                send_error(
                    evt_tx,
                    CoreErrorSource::Update,
                    None,
                    format!("Failed to update state: {}", err),
                );
            }
        },
    }
}

/// Spawn the backend worker thread that performs blocking service calls.
///
/// All I/O stays off the caller's thread; the worker replies with
/// [`CoreEvent`] values that the controller polls. Commands run one at a time
/// in the order they were sent, and nothing is retried.
///
/// # Returns
/// A [`BackendHandle`] containing the command sender and event receiver.
///
/// # Panics
/// Panics if the worker thread cannot be spawned.
pub fn spawn_backend<A: ListApi>(api: A) -> BackendHandle {
    let (cmd_tx, cmd_rx) = unbounded();
    let (evt_tx, evt_rx) = unbounded();

    thread::Builder::new()
        .name("longlist-client-backend".to_string())
        .spawn(move || {
            let perf_log_enabled = env_flag_enabled("LONGLIST_CLIENT_PERF_LOG");
            for cmd in cmd_rx.iter() {
                handle_command(&api, &evt_tx, perf_log_enabled, cmd);
            }
        })
        .expect("spawn backend worker");

    BackendHandle { cmd_tx, evt_rx }
}
