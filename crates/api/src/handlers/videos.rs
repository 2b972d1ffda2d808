//! Handlers for tracked videos: the list window, add-video, and lifecycle
//! intents.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use watchtrack_core::error::CoreError;
use watchtrack_core::lifecycle::Intent;
use watchtrack_core::listing::{derive_window, ListQuery, StatusTab};
use watchtrack_core::store::{self, VideoStore};
use watchtrack_core::types::DbId;
use watchtrack_core::video::NewVideo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Request types
-------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
pub struct ListVideosParams {
    pub tab: Option<String>,
    pub q: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct IntentRequest {
    pub intent: Intent,
}

/* --------------------------------------------------------------------------
Handlers
-------------------------------------------------------------------------- */

/// GET /videos
///
/// Fetch the tab from the store, then apply search and paging. Malformed
/// query strings get the usual JSON error body.
pub async fn list_videos(
    State(state): State<AppState>,
    params: Result<Query<ListVideosParams>, QueryRejection>,
) -> AppResult<Response> {
    let Query(params) = params.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let tab: StatusTab = match params.tab.as_deref() {
        Some(raw) => raw.parse()?,
        None => StatusTab::default(),
    };
    let query = ListQuery::from_parts(tab, params.q.as_deref(), params.page);

    let videos = state
        .store
        .list(tab.status_filter(), tab.sort_order())
        .await?;
    let window = derive_window(&videos, &query);

    Ok(Json(DataResponse { data: window }).into_response())
}

/// POST /videos
///
/// Add a video to the watch list as `todo`.
pub async fn create_video(
    State(state): State<AppState>,
    Json(input): Json<NewVideo>,
) -> AppResult<impl IntoResponse> {
    let input = input.validated()?;
    let video = state.store.create(&input).await?;
    tracing::info!(video_id = video.id, title = %video.title, "Video added");
    Ok((StatusCode::CREATED, Json(DataResponse { data: video })))
}

/// GET /videos/{id}
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let video = state
        .store
        .find(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Video", id }))?;
    Ok(Json(DataResponse { data: video }))
}

/// POST /videos/{id}/intents
///
/// Run a lifecycle intent and persist the result. A boundary outcome is a
/// successful response with nothing written.
pub async fn apply_intent(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(request): Json<IntentRequest>,
) -> AppResult<impl IntoResponse> {
    let result = store::apply_intent(&state.store, id, request.intent, chrono::Utc::now()).await?;
    Ok(Json(DataResponse { data: result }))
}

/// DELETE /videos/{id}
///
/// Soft removal: the video is marked `done` and drops out of the active tabs.
pub async fn remove_video(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let result = store::apply_intent(&state.store, id, Intent::Remove, chrono::Utc::now()).await?;
    Ok(Json(DataResponse { data: result }))
}
