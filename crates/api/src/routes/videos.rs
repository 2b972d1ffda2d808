//! Route definitions for tracked videos.
//!
//! Registered under `/videos`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

/// Video routes, registered as `/videos`.
///
/// ```text
/// GET    /                 list_videos
/// POST   /                 create_video
/// GET    /{id}             get_video
/// DELETE /{id}             remove_video
/// POST   /{id}/intents     apply_intent
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(videos::list_videos).post(videos::create_video))
        .route("/{id}", get(videos::get_video).delete(videos::remove_video))
        .route("/{id}/intents", post(videos::apply_intent))
}
