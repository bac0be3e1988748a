//! Shared normalization helpers for window query parameters.

use longlist_core::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use longlist_core::models::state::ItemsQuery;

/// Window parameters with protocol defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct WindowParams {
    pub offset: usize,
    pub limit: usize,
    pub search: String,
}

/// Apply defaults and the upper limit bound.
///
/// A zero `limit` is passed through so the store can reject it.
pub(super) fn normalize_window_query(query: ItemsQuery) -> WindowParams {
    WindowParams {
        offset: query.offset.unwrap_or(0),
        limit: query.limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT),
        search: query.search.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_protocol_defaults() {
        let params = normalize_window_query(ItemsQuery::default());
        assert_eq!(
            params,
            WindowParams {
                offset: 0,
                limit: DEFAULT_PAGE_LIMIT,
                search: String::new(),
            }
        );
    }

    #[test]
    fn oversized_limit_is_capped_and_search_is_kept_verbatim() {
        let params = normalize_window_query(ItemsQuery {
            offset: Some(60),
            limit: Some(50_000),
            search: Some(" Item ".to_string()),
        });
        assert_eq!(params.offset, 60);
        assert_eq!(params.limit, MAX_PAGE_LIMIT);
        assert_eq!(params.search, " Item ");
    }
}
