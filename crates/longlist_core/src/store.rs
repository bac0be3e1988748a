//! Window service over the catalog, canonical order, and selection.
//!
//! Canonical order and selection are guarded together by one `RwLock`: every
//! mutation runs read-compute-install under the write lock, and window reads
//! take the read lock, so a reader never observes a half-applied update.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::constants::INITIAL_STATE_LIMIT;
use crate::error::AppError;
use crate::filter::window_ids;
use crate::models::item::ItemView;
use crate::models::state::{ItemsPage, StateSnapshot, UpdateStateRequest};
use crate::order::CanonicalOrder;
use crate::selection::SelectionSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Debug)]
struct ListState {
    order: CanonicalOrder,
    selection: SelectionSet,
}

/// Owned, lock-guarded list state shared by all request handlers.
#[derive(Debug)]
pub struct ListStore {
    catalog: Arc<Catalog>,
    state: RwLock<ListState>,
}

impl ListStore {
    /// Create a store with identity order and an empty selection.
    pub fn new(catalog: Catalog) -> Self {
        let order = CanonicalOrder::identity(&catalog);
        Self {
            catalog: Arc::new(catalog),
            state: RwLock::new(ListState {
                order,
                selection: SelectionSet::default(),
            }),
        }
    }

    /// Seed the catalog described by `config` and wrap it in a store.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Catalog::seeded(
            config.catalog_size,
            &config.item_label_prefix,
        ))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, ListState>, AppError> {
        self.state
            .read()
            .map_err(|_| AppError::StorageMessage("list state lock is poisoned".to_string()))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, ListState>, AppError> {
        self.state
            .write()
            .map_err(|_| AppError::StorageMessage("list state lock is poisoned".to_string()))
    }

    fn resolve(&self, ids: &[u64], selection: &SelectionSet) -> Vec<ItemView> {
        ids.iter()
            .filter_map(|&id| self.catalog.get(id))
            .map(|item| ItemView::from_item(item, selection.contains(item.id)))
            .collect()
    }

    /// Read one window of the filtered view.
    ///
    /// # Arguments
    /// - `offset`: First position of the filtered view to return.
    /// - `limit`: Maximum number of items; must be positive.
    /// - `query`: Search term; empty means no filtering.
    ///
    /// # Returns
    /// Up to `limit` items stamped with selection membership, plus the size of
    /// the whole filtered view. Offsets past the end yield no items.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] for a zero `limit`, or a storage error
    /// if the state lock is poisoned.
    pub fn get_window(
        &self,
        offset: usize,
        limit: usize,
        query: &str,
    ) -> Result<ItemsPage, AppError> {
        if limit == 0 {
            return Err(AppError::BadRequest("limit must be positive".to_string()));
        }
        let state = self.read_state()?;
        let (ids, total) = window_ids(state.order.as_slice(), &self.catalog, query, offset, limit);
        Ok(ItemsPage {
            items: self.resolve(&ids, &state.selection),
            total,
        })
    }

    /// Startup snapshot: the first canonical page, the catalog size, and the
    /// full selection, read under one lock without a filter pass.
    pub fn get_initial_state(&self) -> Result<StateSnapshot, AppError> {
        let state = self.read_state()?;
        let order = state.order.as_slice();
        let head = &order[..INITIAL_STATE_LIMIT.min(order.len())];
        Ok(StateSnapshot {
            items: self.resolve(head, &state.selection),
            total: self.catalog.len(),
            selected_ids: state.selection.sorted_ids(),
        })
    }

    /// Pin `moved_ids` to the front of the canonical order.
    ///
    /// # Errors
    /// Returns [`AppError::UnknownId`] or [`AppError::DuplicateId`] for
    /// invalid input; the order is unchanged in that case.
    pub fn apply_reorder(&self, moved_ids: &[u64]) -> Result<(), AppError> {
        let mut state = self.write_state()?;
        state.order.apply_reorder(moved_ids, &self.catalog)?;
        debug!(moved = moved_ids.len(), "canonical order updated");
        Ok(())
    }

    /// Replace the whole selection.
    pub fn replace_selection(&self, ids: &[u64]) -> Result<(), AppError> {
        let mut state = self.write_state()?;
        state.selection.replace(ids.iter().copied());
        debug!(selected = state.selection.len(), "selection replaced");
        Ok(())
    }

    /// Apply an `UpdateState` command atomically.
    ///
    /// Both sub-updates are applied under one write lock. If `sorted` is
    /// rejected, `selected` is not applied either.
    pub fn update_state(&self, request: &UpdateStateRequest) -> Result<(), AppError> {
        let mut state = self.write_state()?;
        if let Some(moved_ids) = request.sorted.as_deref() {
            state.order.apply_reorder(moved_ids, &self.catalog)?;
        }
        if let Some(selected) = request.selected.as_deref() {
            state.selection.replace(selected.iter().copied());
        }
        debug!(
            sorted = request.sorted.as_ref().map(Vec::len),
            selected = request.selected.as_ref().map(Vec::len),
            "state updated"
        );
        Ok(())
    }

    /// Snapshot of the full canonical order.
    pub fn canonical_order(&self) -> Result<Vec<u64>, AppError> {
        Ok(self.read_state()?.order.as_slice().to_vec())
    }

    /// Snapshot of the selection in ascending id order.
    pub fn selected_ids(&self) -> Result<Vec<u64>, AppError> {
        Ok(self.read_state()?.selection.sorted_ids())
    }
}
