//! Route definitions for the `/shotlist-items` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::shotlist_item;
use crate::state::AppState;

/// Headroom for multipart boundaries and part headers on top of the file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Routes mounted at `/shotlist-items`.
///
/// ```text
/// GET    /{id}                  -> get_by_id
/// PUT    /{id}                  -> update
/// DELETE /{id}                  -> delete (compacts later items)
/// POST   /{id}/toggle-complete  -> toggle_complete
/// POST   /{id}/reference-image  -> upload_reference_image (multipart)
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(shotlist_item::get_by_id)
                .put(shotlist_item::update)
                .delete(shotlist_item::delete),
        )
        .route("/{id}/toggle-complete", post(shotlist_item::toggle_complete))
        .route(
            "/{id}/reference-image",
            post(shotlist_item::upload_reference_image).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
            )),
        )
}
