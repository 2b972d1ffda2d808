//! The abstract store capability the lifecycle and list code depend on.
//!
//! Implemented over PostgreSQL by `watchtrack_db::store::PgVideoStore`.
//! Implementations report every backend error as
//! [`CoreError::StoreFailure`] and never retry on their own.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CoreError;
use crate::lifecycle::{self, Intent, Outcome};
use crate::listing::SortOrder;
use crate::statistics::VideoSummary;
use crate::types::{DbId, Timestamp};
use crate::video::{NewVideo, ProgressPatch, Video, VideoStatus};

#[async_trait]
pub trait VideoStore: Send + Sync {
    /// List videos, optionally restricted to one status.
    async fn list(
        &self,
        status: Option<VideoStatus>,
        order: SortOrder,
    ) -> Result<Vec<Video>, CoreError>;

    async fn find(&self, id: DbId) -> Result<Option<Video>, CoreError>;

    /// Insert a validated video as `todo` with `current = 0`. The store
    /// assigns the id.
    async fn create(&self, input: &NewVideo) -> Result<Video, CoreError>;

    /// Write only the fields set in `patch`. Last writer wins.
    async fn apply_patch(&self, id: DbId, patch: &ProgressPatch) -> Result<Video, CoreError>;

    async fn summaries(&self) -> Result<Vec<VideoSummary>, CoreError>;
}

/// A lifecycle intent after it has been persisted.
#[derive(Debug, Clone, Serialize)]
pub struct IntentResult {
    pub video: Video,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Load a video, run `intent` through the lifecycle engine and persist the
/// changed fields.
///
/// Boundary outcomes are returned without a write.
pub async fn apply_intent<S>(
    store: &S,
    id: DbId,
    intent: Intent,
    now: Timestamp,
) -> Result<IntentResult, CoreError>
where
    S: VideoStore + ?Sized,
{
    let video = store
        .find(id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Video", id })?;

    let outcome = lifecycle::apply(&video, intent, now)?;
    let video = match outcome.transition() {
        Some(transition) => {
            let patch = transition.patch();
            tracing::debug!(video_id = id, %intent, ?patch, "Persisting lifecycle transition");
            store.apply_patch(id, &patch).await?
        }
        None => {
            tracing::debug!(video_id = id, %intent, "Lifecycle boundary reached, nothing to write");
            video
        }
    };

    Ok(IntentResult { video, outcome })
}

#[async_trait]
impl<T> VideoStore for std::sync::Arc<T>
where
    T: VideoStore + ?Sized,
{
    async fn list(
        &self,
        status: Option<VideoStatus>,
        order: SortOrder,
    ) -> Result<Vec<Video>, CoreError> {
        (**self).list(status, order).await
    }

    async fn find(&self, id: DbId) -> Result<Option<Video>, CoreError> {
        (**self).find(id).await
    }

    async fn create(&self, input: &NewVideo) -> Result<Video, CoreError> {
        (**self).create(input).await
    }

    async fn apply_patch(&self, id: DbId, patch: &ProgressPatch) -> Result<Video, CoreError> {
        (**self).apply_patch(id, patch).await
    }

    async fn summaries(&self) -> Result<Vec<VideoSummary>, CoreError> {
        (**self).summaries().await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
