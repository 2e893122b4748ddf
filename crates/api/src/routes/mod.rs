pub mod auth;
pub mod client;
pub mod health;
pub mod project;
pub mod shotlist;
pub mod shotlist_item;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// All `/api/v1` routes.
///
/// ```text
/// /auth            -> auth::router()
/// /clients         -> client::router()
/// /projects        -> project::router()
/// /shotlists       -> shotlist::router()
/// /shotlist-items  -> shotlist_item::router()
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/clients", client::router())
        .nest("/projects", project::router())
        .nest("/shotlists", shotlist::router())
        .nest("/shotlist-items", shotlist_item::router(config.max_upload_bytes))
}
