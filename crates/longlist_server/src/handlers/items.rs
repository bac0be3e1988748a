//! Window HTTP handler.

use super::normalize::normalize_window_query;
use crate::{error::HttpError, models::state::*, AppState};
use axum::{
    extract::{Query, State},
    Json,
};

/// Return one window of the filtered view.
///
/// # Arguments
/// - `state`: Application state.
/// - `query`: `offset`, `limit`, and `search` query parameters.
///
/// # Returns
/// `{items, total}` as JSON.
///
/// # Errors
/// Returns 400 for a zero `limit`.
pub async fn get_items(
    State(state): State<AppState>,
    Query(query): Query<ItemsQuery>,
) -> Result<Json<ItemsPage>, HttpError> {
    let params = normalize_window_query(query);
    let page = state
        .store
        .get_window(params.offset, params.limit, &params.search)?;
    tracing::debug!(
        offset = params.offset,
        limit = params.limit,
        returned = page.items.len(),
        total = page.total,
        "window served"
    );
    Ok(Json(page))
}
