//! State snapshot and update HTTP handlers.

use crate::{error::HttpError, models::state::*, AppState};
use axum::{extract::State, Json};

/// Return the startup snapshot.
///
/// # Returns
/// The first canonical page, the catalog size, and the full selection.
pub async fn get_state(State(state): State<AppState>) -> Result<Json<StateSnapshot>, HttpError> {
    Ok(Json(state.store.get_initial_state()?))
}

/// Apply a reorder and/or selection replacement.
///
/// # Arguments
/// - `state`: Application state.
/// - `req`: Optional `sorted` and `selected` id lists.
///
/// # Returns
/// An acknowledgement message.
///
/// # Errors
/// Returns 400 if `sorted` names an unknown or duplicated id; nothing is
/// applied in that case.
pub async fn update_state(
    State(state): State<AppState>,
    Json(req): Json<UpdateStateRequest>,
) -> Result<Json<UpdateAck>, HttpError> {
    if let Err(err) = state.store.update_state(&req) {
        tracing::warn!("rejected state update: {}", err);
        return Err(err.into());
    }
    Ok(Json(UpdateAck::updated()))
}
