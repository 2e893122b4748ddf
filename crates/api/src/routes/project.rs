//! Route definitions for the `/projects` resource.
//!
//! Also mounts project-scoped shotlist routes under `/projects/{id}/shotlists`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{project, shotlist};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                -> list (?client_id=&limit=&offset=)
/// POST   /                -> create
/// GET    /{id}            -> get_by_id (with shotlists)
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
///
/// GET    /{id}/shotlists  -> shotlist::list_by_project
/// POST   /{id}/shotlists  -> shotlist::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route(
            "/{id}/shotlists",
            get(shotlist::list_by_project).post(shotlist::create),
        )
}
