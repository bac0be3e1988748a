//! Filter engine: order-preserving, case-insensitive substring filtering.
//!
//! The filtered view is derived on every call from the current canonical order
//! and is never cached across mutations. An empty query is the identity filter.

use crate::catalog::Catalog;

/// Lowercase a query for matching against [`Catalog::label_contains`].
///
/// # Returns
/// `None` for the empty query (identity filter).
fn normalize_query(query: &str) -> Option<String> {
    if query.is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

/// Compute the full filtered view for `query`.
///
/// # Returns
/// Ids from `order` whose label contains `query` case-insensitively, in
/// `order`'s relative order. For an empty query, `order` unchanged.
pub fn filter_ids(order: &[u64], catalog: &Catalog, query: &str) -> Vec<u64> {
    match normalize_query(query) {
        None => order.to_vec(),
        Some(needle) => order
            .iter()
            .copied()
            .filter(|&id| catalog.label_contains(id, &needle))
            .collect(),
    }
}

/// Slice `[offset, offset + limit)` of the filtered view without
/// materializing the whole view.
///
/// # Returns
/// The ids in the window plus the total size of the filtered view. Windows
/// past the end are empty but still report the correct total.
pub fn window_ids(
    order: &[u64],
    catalog: &Catalog,
    query: &str,
    offset: usize,
    limit: usize,
) -> (Vec<u64>, usize) {
    let end = offset.saturating_add(limit);
    match normalize_query(query) {
        None => {
            let total = order.len();
            let start = offset.min(total);
            let stop = end.min(total);
            (order[start..stop].to_vec(), total)
        }
        Some(needle) => {
            let mut window = Vec::with_capacity(limit.min(order.len()));
            let mut total = 0usize;
            for &id in order {
                if !catalog.label_contains(id, &needle) {
                    continue;
                }
                if total >= offset && total < end {
                    window.push(id);
                }
                total += 1;
            }
            (window, total)
        }
    }
}
