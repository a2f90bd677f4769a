//! Route definitions for the HTTP API.

pub mod collection;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the complete router: health plus CRUD routes per collection.
pub fn build_router(state: &AppState) -> Router {
    state
        .collections()
        .iter()
        .cloned()
        .fold(Router::new().merge(health::routes()), |router, collection| {
            router.merge(collection::routes(collection))
        })
}
