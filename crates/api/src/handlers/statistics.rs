use axum::extract::State;
use axum::Json;

use watchtrack_core::statistics::{load_statistics, Statistics};

use crate::response::DataResponse;
use crate::state::AppState;

/// GET /statistics
///
/// Never fails: a store error is logged and yields empty statistics.
pub async fn get_statistics(State(state): State<AppState>) -> Json<DataResponse<Statistics>> {
    let stats = load_statistics(&state.store, chrono::Utc::now()).await;
    Json(DataResponse { data: stats })
}
