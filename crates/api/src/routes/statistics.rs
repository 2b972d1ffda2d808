use axum::routing::get;
use axum::Router;

use crate::handlers::statistics;
use crate::state::AppState;

/// Statistics routes, registered as `/statistics`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(statistics::get_statistics))
}
