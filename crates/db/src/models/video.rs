//! Video row models.

use sqlx::FromRow;
use watchtrack_core::error::CoreError;
use watchtrack_core::statistics::VideoSummary;
use watchtrack_core::types::{DbId, Timestamp};
use watchtrack_core::video::Video;

/// A row from the `videos` table. Enum columns are raw text here and
/// parsed on conversion into [`Video`].
#[derive(Debug, Clone, FromRow)]
pub struct VideoRow {
    pub id: DbId,
    pub title: String,
    pub image: Option<String>,
    pub total: i32,
    pub current: i32,
    pub status: String,
    pub video_type: String,
    pub area: Option<String>,
    pub created_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub loop_count: Option<i32>,
}

impl TryFrom<VideoRow> for Video {
    type Error = CoreError;

    /// Rows that parse but break the status/counter invariants are reported
    /// as [`CoreError::Internal`]; the lifecycle engine cannot work from them.
    fn try_from(row: VideoRow) -> Result<Self, Self::Error> {
        let video = Video {
            id: row.id,
            title: row.title,
            image: row.image,
            total: row.total,
            current: row.current,
            status: row.status.parse()?,
            video_type: row.video_type.parse()?,
            area: row.area,
            created_at: row.created_at,
            finished_at: row.finished_at,
            loop_count: row.loop_count,
        };
        video.check_invariants().map_err(|e| {
            tracing::error!(video_id = video.id, error = %e, "Stored video is inconsistent");
            CoreError::Internal(format!("Stored video {} is inconsistent", video.id))
        })?;
        Ok(video)
    }
}

/// Projection used by the statistics screen.
#[derive(Debug, Clone, FromRow)]
pub struct VideoSummaryRow {
    pub id: DbId,
    pub video_type: String,
    pub created_at: Timestamp,
    pub finished_at: Option<Timestamp>,
}

impl TryFrom<VideoSummaryRow> for VideoSummary {
    type Error = CoreError;

    fn try_from(row: VideoSummaryRow) -> Result<Self, Self::Error> {
        Ok(VideoSummary {
            id: row.id,
            video_type: row.video_type.parse()?,
            created_at: row.created_at,
            finished_at: row.finished_at,
        })
    }
}
