//! Immutable item catalog.
//!
//! The catalog is built once at startup and only read afterwards. Lookups by id
//! go through an index map, and every label is lowercased once at build time so
//! substring filtering does not re-fold case on each request.

use crate::error::AppError;
use crate::models::item::Item;
use std::collections::{HashMap, HashSet};

/// Read-only set of `(id, text)` pairs.
#[derive(Debug)]
pub struct Catalog {
    items: Vec<Item>,
    lowered: Vec<String>,
    index_by_id: HashMap<u64, usize>,
}

impl Catalog {
    /// Build a catalog of `size` items with ids `1..=size` and labels
    /// `"{label_prefix} {id}"`.
    pub fn seeded(size: usize, label_prefix: &str) -> Self {
        let items = (1..=size as u64)
            .map(|id| Item::new(id, format!("{} {}", label_prefix, id)))
            .collect();
        Self::build(items)
    }

    /// Build a catalog from explicit items.
    ///
    /// # Errors
    /// Returns [`AppError::DuplicateId`] if two items share an id.
    pub fn from_items(items: Vec<Item>) -> Result<Self, AppError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(AppError::DuplicateId(item.id));
            }
        }
        Ok(Self::build(items))
    }

    fn build(items: Vec<Item>) -> Self {
        let lowered = items.iter().map(|item| item.text.to_lowercase()).collect();
        let index_by_id = items
            .iter()
            .enumerate()
            .map(|(index, item)| (item.id, index))
            .collect();
        Self {
            items,
            lowered,
            index_by_id,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.index_by_id.contains_key(&id)
    }

    /// Resolve an id to its item in O(1).
    pub fn get(&self, id: u64) -> Option<&Item> {
        self.index_by_id.get(&id).map(|&index| &self.items[index])
    }

    /// Catalog ids in insertion order (the identity canonical order).
    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.items.iter().map(|item| item.id)
    }

    /// Whether the item's label contains `needle_lower`.
    ///
    /// `needle_lower` must already be lowercased. Unknown ids never match.
    pub fn label_contains(&self, id: u64, needle_lower: &str) -> bool {
        self.index_by_id
            .get(&id)
            .map(|&index| self.lowered[index].contains(needle_lower))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_catalog_labels_items_by_id() {
        let catalog = Catalog::seeded(3, "Item");
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(catalog.get(2).map(|item| item.text.as_str()), Some("Item 2"));
        assert!(catalog.get(0).is_none());
        assert!(catalog.get(4).is_none());
    }

    #[test]
    fn from_items_rejects_duplicate_ids() {
        let err = Catalog::from_items(vec![Item::new(1, "a"), Item::new(1, "b")])
            .expect_err("duplicate ids must be rejected");
        assert_eq!(err, AppError::DuplicateId(1));
    }

    #[test]
    fn label_contains_is_case_insensitive_for_non_ascii_labels() {
        let catalog = Catalog::from_items(vec![
            Item::new(10, "Элемент 10"),
            Item::new(20, "Alpha"),
        ])
        .expect("catalog");
        assert!(catalog.label_contains(10, "элемент"));
        assert!(catalog.label_contains(20, "alp"));
        assert!(!catalog.label_contains(20, "beta"));
        assert!(!catalog.label_contains(99, "alpha"));
    }
}
