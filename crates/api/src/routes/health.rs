use std::collections::BTreeMap;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use watchtrack_db::repositories::VideoRepo;

use crate::state::AppState;

/// Liveness plus a cheap look at the watch list.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database cannot be queried.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Tracked videos per status; empty when the database is down.
    pub videos: BTreeMap<String, i64>,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let counts = match VideoRepo::count_by_status(&state.pool).await {
        Ok(rows) => Some(rows.into_iter().collect::<BTreeMap<_, _>>()),
        Err(error) => {
            tracing::warn!(%error, "Health check could not count videos");
            None
        }
    };
    let db_healthy = counts.is_some();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        videos: counts.unwrap_or_default(),
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
