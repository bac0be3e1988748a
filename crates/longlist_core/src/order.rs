//! Canonical order of catalog ids.
//!
//! A reorder pins the supplied ids to the front of the order, in the supplied
//! order, and appends every other id afterwards in its previous relative
//! order. The order is always a permutation of the catalog ids.

use crate::catalog::Catalog;
use crate::error::AppError;
use std::collections::HashSet;

/// Authoritative global sequence of all catalog ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalOrder {
    ids: Vec<u64>,
}

impl CanonicalOrder {
    /// Seed the identity order from the catalog.
    pub fn identity(catalog: &Catalog) -> Self {
        Self {
            ids: catalog.ids().collect(),
        }
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Compute the order that [`apply_reorder`](Self::apply_reorder) would
    /// install, without installing it.
    ///
    /// # Errors
    /// - [`AppError::UnknownId`] if an id is not in the catalog.
    /// - [`AppError::DuplicateId`] if an id appears more than once.
    pub fn reordered(&self, moved_ids: &[u64], catalog: &Catalog) -> Result<Vec<u64>, AppError> {
        let mut moved = HashSet::with_capacity(moved_ids.len());
        for &id in moved_ids {
            if !catalog.contains(id) {
                return Err(AppError::UnknownId(id));
            }
            if !moved.insert(id) {
                return Err(AppError::DuplicateId(id));
            }
        }

        let mut next = Vec::with_capacity(self.ids.len());
        next.extend_from_slice(moved_ids);
        next.extend(self.ids.iter().copied().filter(|id| !moved.contains(id)));
        Ok(next)
    }

    /// Move `moved_ids` to the front of the order.
    ///
    /// The order is left untouched when validation fails.
    pub fn apply_reorder(&mut self, moved_ids: &[u64], catalog: &Catalog) -> Result<(), AppError> {
        self.ids = self.reordered(moved_ids, catalog)?;
        Ok(())
    }
}
