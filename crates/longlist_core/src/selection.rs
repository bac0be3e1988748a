//! Selection state, replaced wholesale by every selection command.

use std::collections::HashSet;

/// Set of selected item ids.
///
/// Ids that are not in the catalog are stored as given; they never match a
/// window item and so have no visible effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: HashSet<u64>,
}

impl SelectionSet {
    /// Replace the whole selection with `ids`.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = u64>) {
        self.ids = ids.into_iter().collect();
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in ascending order.
    pub fn sorted_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}
