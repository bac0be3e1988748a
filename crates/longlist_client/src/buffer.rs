//! Client-side loaded buffer: the materialized prefix of the active view.
//!
//! `buffer[i]` is always the item at global position `i` of the active view.
//! The buffer only grows by appending the next contiguous window, and is
//! cleared whenever the active query changes. A single `loading` flag keeps at
//! most one fetch in flight for the buffer.

use longlist_core::constants::{LOAD_MORE_THRESHOLD_ROWS, ROW_HEIGHT, VIEWPORT_HEIGHT};
use longlist_core::models::item::ItemView;
use std::ops::Range;

/// One renderable row of the list surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row<'a> {
    Item(&'a ItemView),
    /// Trailing "loading" row shown while more data remains.
    Placeholder,
}

/// Window request produced by [`LoadedBuffer::request_more`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Default)]
pub struct LoadedBuffer {
    items: Vec<ItemView>,
    total: usize,
    loading: bool,
}

impl LoadedBuffer {
    /// Drop every loaded item.
    ///
    /// `total` is kept until the next response replaces it, so the surface
    /// keeps showing a loading row while the reload is in flight.
    pub fn reset(&mut self) {
        self.items.clear();
    }

    /// Extend the buffer with the next contiguous slice of the active view.
    ///
    /// Contiguity is the caller's responsibility; no gap check is performed.
    pub fn append(&mut self, items: impl IntoIterator<Item = ItemView>) {
        self.items.extend(items);
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = total;
    }

    /// Mark a fetch as in flight (used for full reloads).
    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Clear the in-flight marker after a response or failure.
    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    /// Plan the next incremental fetch.
    ///
    /// # Returns
    /// `None` if a fetch is already pending or the buffer already holds the
    /// whole view. Otherwise marks the buffer as loading and returns the
    /// window to request.
    pub fn request_more(&mut self, page_size: usize) -> Option<PageRequest> {
        if self.loading || self.items.len() >= self.total {
            return None;
        }
        self.loading = true;
        Some(PageRequest {
            offset: self.items.len(),
            limit: page_size,
        })
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.items.len() < self.total
    }

    pub fn items(&self) -> &[ItemView] {
        &self.items
    }

    /// Ids of the loaded items, in buffer order.
    pub fn ids(&self) -> Vec<u64> {
        self.items.iter().map(|item| item.id).collect()
    }

    /// Number of rows the render surface exposes: one trailing placeholder
    /// while more data remains.
    pub fn row_count(&self) -> usize {
        if self.has_more() {
            self.items.len() + 1
        } else {
            self.items.len()
        }
    }

    /// Row at `index`, or `None` past the render surface.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        match self.items.get(index) {
            Some(item) => Some(Row::Item(item)),
            None if index < self.row_count() => Some(Row::Placeholder),
            None => None,
        }
    }

    /// Whether a visible range ending at `visible_stop` is close enough to the
    /// end of the buffer to request more data.
    pub fn should_load_more(&self, visible_stop: usize) -> bool {
        self.has_more() && visible_stop >= self.items.len().saturating_sub(LOAD_MORE_THRESHOLD_ROWS)
    }

    /// Rows intersecting the viewport at `scroll_offset`, clamped to the
    /// render surface.
    pub fn visible_rows(&self, scroll_offset: f32) -> Range<usize> {
        let row_count = self.row_count();
        let offset = scroll_offset.max(0.0);
        let start = ((offset / ROW_HEIGHT).floor() as usize).min(row_count);
        let stop = (((offset + VIEWPORT_HEIGHT) / ROW_HEIGHT).ceil() as usize).min(row_count);
        start..stop
    }

    /// Update the selection flag of the loaded item with `id`.
    ///
    /// # Returns
    /// `false` if no loaded item has that id.
    pub fn set_selected(&mut self, id: u64, is_selected: bool) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.is_selected = is_selected;
                true
            }
            None => false,
        }
    }

    /// Current buffer index of the item with `id`.
    pub fn index_of(&self, id: u64) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Move one item from `from` to `to`; other items keep relative order.
    ///
    /// Both indices must be within the loaded rows.
    pub(crate) fn move_item(&mut self, from: usize, to: usize) {
        let item = self.items.remove(from);
        self.items.insert(to, item);
    }
}
