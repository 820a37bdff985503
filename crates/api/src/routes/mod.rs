pub mod health;
pub mod resources;
pub mod sections;
pub mod session;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(session::routes())
        .merge(sections::routes())
        .merge(resources::routes())
        .merge(users::routes())
        .with_state(state)
}
