pub mod health;
pub mod statistics;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /videos                    list (tab, q, page), create
/// /videos/{id}               get, soft remove
/// /videos/{id}/intents       apply a lifecycle intent
/// /statistics                type breakdown and yearly achievements
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/videos", videos::router())
        .nest("/statistics", statistics::router())
}
