//! [`VideoStore`] over PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;
use watchtrack_core::error::CoreError;
use watchtrack_core::listing::SortOrder;
use watchtrack_core::statistics::VideoSummary;
use watchtrack_core::store::VideoStore;
use watchtrack_core::types::DbId;
use watchtrack_core::video::{NewVideo, ProgressPatch, Video, VideoStatus};

use crate::repositories::VideoRepo;

/// Adapts [`VideoRepo`] to the domain store trait.
#[derive(Debug, Clone)]
pub struct PgVideoStore {
    pool: PgPool,
}

impl PgVideoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Log a database error and turn it into a store failure.
fn store_failure(operation: &'static str, error: sqlx::Error) -> CoreError {
    tracing::error!(operation, %error, "Video store call failed");
    CoreError::StoreFailure(format!("{operation} failed: {error}"))
}

#[async_trait]
impl VideoStore for PgVideoStore {
    async fn list(
        &self,
        status: Option<VideoStatus>,
        order: SortOrder,
    ) -> Result<Vec<Video>, CoreError> {
        let rows = VideoRepo::list(&self.pool, status.map(VideoStatus::as_str), order)
            .await
            .map_err(|e| store_failure("list videos", e))?;
        rows.into_iter().map(Video::try_from).collect()
    }

    async fn find(&self, id: DbId) -> Result<Option<Video>, CoreError> {
        VideoRepo::find_by_id(&self.pool, id)
            .await
            .map_err(|e| store_failure("find video", e))?
            .map(Video::try_from)
            .transpose()
    }

    async fn create(&self, input: &NewVideo) -> Result<Video, CoreError> {
        let row = VideoRepo::create(&self.pool, input)
            .await
            .map_err(|e| store_failure("create video", e))?;
        Video::try_from(row)
    }

    async fn apply_patch(&self, id: DbId, patch: &ProgressPatch) -> Result<Video, CoreError> {
        let row = VideoRepo::update_progress(&self.pool, id, patch)
            .await
            .map_err(|e| store_failure("update video progress", e))?
            .ok_or(CoreError::NotFound { entity: "Video", id })?;
        Video::try_from(row)
    }

    async fn summaries(&self) -> Result<Vec<VideoSummary>, CoreError> {
        let rows = VideoRepo::list_summaries(&self.pool)
            .await
            .map_err(|e| store_failure("list video summaries", e))?;
        rows.into_iter().map(VideoSummary::try_from).collect()
    }
}
