//! Client list controller.
//!
//! Owns the loaded buffer, the search debouncer, and the local selection, and
//! talks to the list service only through the backend worker. It is a
//! single-threaded state machine: the host loop feeds it input (`set_query`,
//! `on_visible_range`, `toggle_selection`, `hover_drag`), calls `tick` for the
//! debounce timer, and calls `poll_events` to apply worker responses.
//!
//! Failures are fail-silent: they are logged, counted, and clear `loading` so
//! the surface stays interactive, but nothing is retried and optimistic
//! reorders are not rolled back.

use crate::backend::{BackendHandle, CoreCmd, CoreErrorSource, CoreEvent, Generation};
use crate::buffer::{LoadedBuffer, Row};
use crate::debounce::SearchDebouncer;
use crate::drag::apply_hover;
use crossbeam_channel::{RecvTimeoutError, TryRecvError};
use longlist_core::constants::{DEFAULT_PAGE_LIMIT, SEARCH_PAGE_LIMIT};
use longlist_core::models::item::ItemView;
use longlist_core::models::state::UpdateStateRequest;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Counters for diagnostics; none of them affect behavior.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ControllerStats {
    pub fetches_sent: u64,
    pub updates_sent: u64,
    pub stale_responses_discarded: u64,
    pub errors: u64,
}

pub struct ListController {
    backend: BackendHandle,
    buffer: LoadedBuffer,
    debouncer: SearchDebouncer,
    raw_query: String,
    active_query: String,
    generation: Generation,
    selected: BTreeSet<u64>,
    last_error: Option<String>,
    stats: ControllerStats,
}

impl ListController {
    /// Create a controller and issue the startup `GetState` fetch.
    pub fn new(backend: BackendHandle) -> Self {
        Self::with_debouncer(backend, SearchDebouncer::default())
    }

    /// Create a controller with a custom debounce interval.
    pub fn with_debouncer(backend: BackendHandle, debouncer: SearchDebouncer) -> Self {
        let mut controller = Self {
            backend,
            buffer: LoadedBuffer::default(),
            debouncer,
            raw_query: String::new(),
            active_query: String::new(),
            generation: 0,
            selected: BTreeSet::new(),
            last_error: None,
            stats: ControllerStats::default(),
        };
        controller.reload();
        controller
    }

    /// Record a raw keystroke update of the search box.
    ///
    /// Only restarts the debounce timer; nothing is fetched until the value
    /// settles in [`tick`](Self::tick).
    pub fn set_query(&mut self, raw: impl Into<String>, now: Instant) {
        let raw = raw.into();
        self.raw_query.clone_from(&raw);
        self.debouncer.update(raw, now);
    }

    /// Advance the debounce timer.
    ///
    /// # Returns
    /// `true` if the settled query changed and a reload was issued.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(query) => {
                self.active_query = query;
                self.reload();
                true
            }
            None => false,
        }
    }

    /// Reset the buffer and fetch the first page of the active query.
    ///
    /// Bumps the generation so responses to earlier requests are discarded,
    /// and forgets errors recorded for them.
    fn reload(&mut self) {
        self.generation += 1;
        self.last_error = None;
        self.buffer.reset();
        self.buffer.begin_loading();
        let cmd = if self.active_query.is_empty() {
            CoreCmd::FetchState {
                generation: self.generation,
            }
        } else {
            CoreCmd::FetchWindow {
                generation: self.generation,
                offset: 0,
                limit: SEARCH_PAGE_LIMIT,
                query: self.active_query.clone(),
            }
        };
        debug!(
            generation = self.generation,
            query = %self.active_query,
            "reloading list"
        );
        self.send_fetch(cmd);
    }

    fn send_fetch(&mut self, cmd: CoreCmd) {
        if self.backend.cmd_tx.send(cmd).is_err() {
            self.buffer.finish_loading();
            self.record_error("backend unavailable".to_string());
            return;
        }
        self.stats.fetches_sent = self.stats.fetches_sent.saturating_add(1);
    }

    fn send_update(&mut self, request: UpdateStateRequest) {
        if self
            .backend
            .cmd_tx
            .send(CoreCmd::UpdateState { request })
            .is_err()
        {
            self.record_error("backend unavailable".to_string());
            return;
        }
        self.stats.updates_sent = self.stats.updates_sent.saturating_add(1);
    }

    fn record_error(&mut self, message: String) {
        warn!("{}", message);
        self.stats.errors = self.stats.errors.saturating_add(1);
        self.last_error = Some(message);
    }

    /// Request the next incremental page unless one is pending or the buffer
    /// is complete.
    ///
    /// # Returns
    /// `true` if a fetch was issued.
    pub fn request_more(&mut self) -> bool {
        let Some(request) = self.buffer.request_more(DEFAULT_PAGE_LIMIT) else {
            return false;
        };
        self.send_fetch(CoreCmd::FetchWindow {
            generation: self.generation,
            offset: request.offset,
            limit: request.limit,
            query: self.active_query.clone(),
        });
        true
    }

    /// Report the last visible row index of the render surface; loads more
    /// when it is near the end of the buffer.
    pub fn on_visible_range(&mut self, visible_stop: usize) -> bool {
        if self.buffer.should_load_more(visible_stop) {
            self.request_more()
        } else {
            false
        }
    }

    /// Select or deselect one item and send the whole resulting selection.
    ///
    /// The loaded row is updated immediately, before the server acknowledges.
    pub fn toggle_selection(&mut self, id: u64, is_selected: bool) {
        if is_selected {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }
        self.buffer.set_selected(id, is_selected);
        let ids = self.selected.iter().copied().collect();
        self.send_update(UpdateStateRequest::selected(ids));
    }

    /// Apply a drag hover of `dragged_id` over row `destination`.
    ///
    /// # Returns
    /// `true` if the buffer changed and a reorder was sent.
    pub fn hover_drag(&mut self, dragged_id: u64, destination: usize) -> bool {
        match apply_hover(&mut self.buffer, dragged_id, destination) {
            Some(request) => {
                self.send_update(request);
                true
            }
            None => false,
        }
    }

    /// Apply every worker event that is ready.
    ///
    /// # Returns
    /// Number of events applied (including discarded stale ones).
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.backend.evt_rx.try_recv() {
                Ok(event) => {
                    self.apply_event(event);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.buffer.is_loading() {
                        self.buffer.finish_loading();
                        self.record_error("backend disconnected".to_string());
                    }
                    break;
                }
            }
        }
        applied
    }

    /// Block until no fetch is in flight or `timeout` elapses.
    ///
    /// # Returns
    /// `true` if the controller is idle.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.buffer.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.backend.evt_rx.recv_timeout(remaining) {
                Ok(event) => self.apply_event(event),
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => {
                    self.buffer.finish_loading();
                    self.record_error("backend disconnected".to_string());
                }
            }
        }
        self.poll_events();
        true
    }

    fn is_stale(&mut self, generation: Generation) -> bool {
        if generation == self.generation {
            return false;
        }
        self.stats.stale_responses_discarded = self.stats.stale_responses_discarded.saturating_add(1);
        debug!(
            stale = generation,
            current = self.generation,
            "discarding response for superseded query"
        );
        true
    }

    /// Append a page, stamping each row from the local selection set.
    fn append_page(&mut self, items: Vec<ItemView>, total: usize) {
        let selected = &self.selected;
        self.buffer.append(items.into_iter().map(|mut item| {
            item.is_selected = selected.contains(&item.id);
            item
        }));
        self.buffer.set_total(total);
        self.buffer.finish_loading();
    }

    fn apply_event(&mut self, event: CoreEvent) {
        match event {
            CoreEvent::WindowLoaded {
                generation,
                offset,
                page,
            } => {
                if self.is_stale(generation) {
                    return;
                }
                if offset != self.buffer.len() {
                    self.stats.stale_responses_discarded =
                        self.stats.stale_responses_discarded.saturating_add(1);
                    debug!(
                        offset,
                        loaded = self.buffer.len(),
                        "discarding non-contiguous window"
                    );
                    self.buffer.finish_loading();
                    return;
                }
                self.append_page(page.items, page.total);
            }
            CoreEvent::StateLoaded {
                generation,
                snapshot,
            } => {
                if self.is_stale(generation) {
                    return;
                }
                self.selected = snapshot.selected_ids.into_iter().collect();
                self.append_page(snapshot.items, snapshot.total);
            }
            CoreEvent::StateUpdated => {
                debug!("state update acknowledged");
            }
            CoreEvent::Error {
                source: CoreErrorSource::Update,
                message,
                ..
            } => {
                // Updates are fire-and-forget; a pending fetch is unaffected.
                self.record_error(message);
            }
            CoreEvent::Error {
                generation,
                message,
                ..
            } => {
                if generation.is_some_and(|generation| self.is_stale(generation)) {
                    return;
                }
                self.record_error(message);
                self.buffer.finish_loading();
            }
        }
    }

    pub fn buffer(&self) -> &LoadedBuffer {
        &self.buffer
    }

    pub fn row_count(&self) -> usize {
        self.buffer.row_count()
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.buffer.row(index)
    }

    pub fn is_loading(&self) -> bool {
        self.buffer.is_loading()
    }

    /// Latest raw (unsettled) query text.
    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    /// Settled query the buffer currently reflects.
    pub fn active_query(&self) -> &str {
        &self.active_query
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_selected(&self, id: u64) -> bool {
        self.selected.contains(&id)
    }

    /// Local selection in ascending id order.
    pub fn selected_ids(&self) -> Vec<u64> {
        self.selected.iter().copied().collect()
    }

    /// Most recent error since the last reload.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn stats(&self) -> &ControllerStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests;
