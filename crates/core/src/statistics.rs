//! Viewing statistics: per-type breakdown and yearly achievements.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::store::VideoStore;
use crate::types::{DbId, Timestamp};
use crate::video::VideoType;

/// The columns statistics need; a narrow projection of a video row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub id: DbId,
    #[serde(rename = "type")]
    pub video_type: VideoType,
    pub created_at: Timestamp,
    pub finished_at: Option<Timestamp>,
}

/// Chart order of the breakdown slices.
pub const BREAKDOWN_ORDER: [VideoType; 4] = [
    VideoType::Anime,
    VideoType::Tv,
    VideoType::Movie,
    VideoType::Documentary,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSlice {
    #[serde(rename = "type")]
    pub video_type: VideoType,
    pub count: usize,
    /// Share of all videos, 0-100, two decimals.
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Achievements {
    pub year: i32,
    pub added_this_year: usize,
    pub finished_this_year: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub breakdown: Vec<TypeSlice>,
    pub achievements: Achievements,
}

impl Statistics {
    pub fn compute(videos: &[VideoSummary], now: Timestamp) -> Self {
        let total = videos.len();
        let breakdown = BREAKDOWN_ORDER
            .into_iter()
            .map(|video_type| {
                let count = videos.iter().filter(|v| v.video_type == video_type).count();
                TypeSlice {
                    video_type,
                    count,
                    percentage: percentage(count, total),
                }
            })
            .collect();

        let year = now.year();
        let achievements = Achievements {
            year,
            added_this_year: videos.iter().filter(|v| v.created_at.year() == year).count(),
            finished_this_year: videos
                .iter()
                .filter(|v| v.finished_at.is_some_and(|at| at.year() == year))
                .count(),
        };

        Self {
            total,
            breakdown,
            achievements,
        }
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

/// Load statistics from the store. Statistics are not critical: a store
/// failure is logged and yields empty statistics for the year.
pub async fn load_statistics<S>(store: &S, now: Timestamp) -> Statistics
where
    S: VideoStore + ?Sized,
{
    match store.summaries().await {
        Ok(summaries) => Statistics::compute(&summaries, now),
        Err(error) => {
            tracing::warn!(%error, "Failed to load video summaries, showing empty statistics");
            Statistics::compute(&[], now)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
