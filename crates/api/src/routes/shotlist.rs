//! Route definitions for the `/shotlists` resource.
//!
//! Also mounts shotlist-scoped item routes under `/shotlists/{id}/items`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{shotlist, shotlist_item};
use crate::state::AppState;

/// Routes mounted at `/shotlists`.
///
/// ```text
/// GET    /{id}                -> get_by_id (with items and schedule)
/// PUT    /{id}                -> update
/// DELETE /{id}                -> delete
///
/// GET    /{id}/items          -> shotlist_item::list_by_shotlist
/// POST   /{id}/items          -> shotlist_item::create
/// PUT    /{id}/items/reorder  -> shotlist_item::reorder
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(shotlist::get_by_id)
                .put(shotlist::update)
                .delete(shotlist::delete),
        )
        .route(
            "/{id}/items",
            get(shotlist_item::list_by_shotlist).post(shotlist_item::create),
        )
        .route("/{id}/items/reorder", put(shotlist_item::reorder))
}
