//! Drag reorder translation: local hover gestures become global reorder
//! commands.
//!
//! A hover moves the dragged item inside the buffer immediately, before any
//! network exchange, and then the whole buffer's id order is sent as the new
//! front of the canonical order. The local move is never rolled back if that
//! send fails; the buffer and the server may diverge until the next reset.

use crate::buffer::LoadedBuffer;
use longlist_core::models::state::UpdateStateRequest;

/// Apply a hover event to the buffer.
///
/// # Arguments
/// - `buffer`: Loaded buffer to mutate optimistically.
/// - `dragged_id`: Catalog id of the item being dragged.
/// - `destination`: Row index the item is hovering over.
///
/// # Returns
/// The reorder command to send, or `None` when the hover is a no-op: the
/// dragged item is not loaded, it already sits at `destination`, or
/// `destination` is not a loaded row.
pub fn apply_hover(
    buffer: &mut LoadedBuffer,
    dragged_id: u64,
    destination: usize,
) -> Option<UpdateStateRequest> {
    let current = buffer.index_of(dragged_id)?;
    if current == destination || destination >= buffer.len() {
        return None;
    }
    buffer.move_item(current, destination);
    Some(UpdateStateRequest::sorted(buffer.ids()))
}
