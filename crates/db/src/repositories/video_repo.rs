//! Repository for the `videos` table.

use sqlx::PgPool;
use watchtrack_core::listing::SortOrder;
use watchtrack_core::types::DbId;
use watchtrack_core::video::{NewVideo, ProgressPatch, VideoStatus, DEFAULT_AREA};

use crate::models::video::{VideoRow, VideoSummaryRow};

/// Column list for videos queries.
const COLUMNS: &str = "id, title, image, total, current, status, video_type, area, \
    created_at, finished_at, loop_count";

/// Provides list, create and progress-update operations for videos.
pub struct VideoRepo;

impl VideoRepo {
    /// List videos, optionally filtered by status.
    ///
    /// `FinishedAtDesc` puts unfinished (soft-removed) rows last and breaks
    /// ties by id so paging over the result is stable.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        order: SortOrder,
    ) -> Result<Vec<VideoRow>, sqlx::Error> {
        let order_by = match order {
            SortOrder::CreatedAtDesc => "created_at DESC, id DESC",
            SortOrder::FinishedAtDesc => "finished_at DESC NULLS LAST, id DESC",
        };
        let query = format!(
            "SELECT {COLUMNS} FROM videos
             WHERE ($1::TEXT IS NULL OR status = $1)
             ORDER BY {order_by}"
        );
        sqlx::query_as::<_, VideoRow>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Find a video by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<VideoRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, VideoRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new video as `todo` with nothing watched. The id comes from
    /// the table's identity sequence.
    pub async fn create(pool: &PgPool, input: &NewVideo) -> Result<VideoRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos (title, image, total, current, status, video_type, area)
             VALUES ($1, $2, $3, 0, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VideoRow>(&query)
            .bind(&input.title)
            .bind(&input.image)
            .bind(input.total)
            .bind(VideoStatus::Todo.as_str())
            .bind(input.video_type.as_str())
            .bind(input.area.as_deref().unwrap_or(DEFAULT_AREA))
            .fetch_one(pool)
            .await
    }

    /// Write the fields set in `patch`; unset fields keep their stored
    /// value. Returns `None` if no row has the given id.
    pub async fn update_progress(
        pool: &PgPool,
        id: DbId,
        patch: &ProgressPatch,
    ) -> Result<Option<VideoRow>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET
                status = COALESCE($2, status),
                current = COALESCE($3, current),
                finished_at = COALESCE($4, finished_at),
                loop_count = COALESCE($5, loop_count)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VideoRow>(&query)
            .bind(id)
            .bind(patch.status.map(VideoStatus::as_str))
            .bind(patch.current)
            .bind(patch.finished_at)
            .bind(patch.loop_count)
            .fetch_optional(pool)
            .await
    }

    /// Number of tracked videos per status, as `(status, count)` pairs.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM videos GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await
    }

    /// Narrow projection for statistics.
    pub async fn list_summaries(pool: &PgPool) -> Result<Vec<VideoSummaryRow>, sqlx::Error> {
        sqlx::query_as::<_, VideoSummaryRow>(
            "SELECT id, video_type, created_at, finished_at FROM videos ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }
}
