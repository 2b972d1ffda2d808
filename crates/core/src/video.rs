//! The `Video` entity, its status and type enumerations, and create-time
//! validation.
//!
//! Values here mirror the text stored in the `videos.status` and
//! `videos.video_type` columns; the repository layer converts rows into
//! these types and rejects anything it does not recognise.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a video title (characters).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Smallest episode/segment count a video may have.
pub const MIN_TOTAL: i32 = 1;

/// Largest episode/segment count accepted by the add-video flow.
pub const MAX_TOTAL: i32 = 9999;

/// Maximum length of an area tag.
pub const MAX_AREA_LENGTH: usize = 64;

/// Area assigned when the caller does not pick one.
pub const DEFAULT_AREA: &str = "japan";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Watch status of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    /// Added but not started.
    Todo,
    /// At least one unit watched, not all of them.
    Doing,
    /// Finished, or soft-removed from the active views.
    Done,
}

impl VideoStatus {
    pub const ALL: [VideoStatus; 3] = [VideoStatus::Todo, VideoStatus::Doing, VideoStatus::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            VideoStatus::Todo => "todo",
            VideoStatus::Doing => "doing",
            VideoStatus::Done => "done",
        }
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VideoStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid video status '{s}'. Must be one of: todo, doing, done"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Type
// ---------------------------------------------------------------------------

/// Kind of title being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VideoType {
    #[default]
    Anime,
    Movie,
    Documentary,
    #[serde(rename = "TV")]
    Tv,
}

impl VideoType {
    pub const ALL: [VideoType; 4] = [
        VideoType::Anime,
        VideoType::Movie,
        VideoType::Documentary,
        VideoType::Tv,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VideoType::Anime => "Anime",
            VideoType::Movie => "Movie",
            VideoType::Documentary => "Documentary",
            VideoType::Tv => "TV",
        }
    }

    /// Name of one countable unit of this type.
    pub fn unit_label(self) -> &'static str {
        match self {
            VideoType::Anime => "episode",
            VideoType::Movie | VideoType::Documentary | VideoType::Tv => "segment",
        }
    }

    /// Single-unit types may be finished directly without stepping through
    /// their segments.
    pub fn is_single_unit(self) -> bool {
        matches!(self, VideoType::Movie | VideoType::Documentary)
    }
}

impl fmt::Display for VideoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VideoType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid video type '{s}'. Must be one of: Anime, Movie, Documentary, TV"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A tracked title. The store owns the record; callers hold a cached copy
/// that may be stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: DbId,
    pub title: String,
    pub image: Option<String>,
    pub total: i32,
    pub current: i32,
    pub status: VideoStatus,
    #[serde(rename = "type")]
    pub video_type: VideoType,
    pub area: Option<String>,
    pub created_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub loop_count: Option<i32>,
}

impl Video {
    /// A `done` video that was never watched to the end.
    pub fn is_removed(&self) -> bool {
        self.status == VideoStatus::Done && self.finished_at.is_none()
    }

    /// Short progress text for list cells.
    pub fn progress_label(&self) -> String {
        match self.status {
            VideoStatus::Todo => "not started".to_string(),
            VideoStatus::Doing => format!(
                "watching, at {} {} {}",
                self.video_type.unit_label(),
                self.current,
                self.total_label()
            ),
            VideoStatus::Done => "finished".to_string(),
        }
    }

    /// Total length, e.g. `of 12 episodes`.
    pub fn total_label(&self) -> String {
        let unit = self.video_type.unit_label();
        if self.total == 1 {
            format!("of 1 {unit}")
        } else {
            format!("of {} {unit}s", self.total)
        }
    }

    /// Check the status/counter invariants.
    pub fn check_invariants(&self) -> Result<(), CoreError> {
        if self.total < MIN_TOTAL {
            return Err(CoreError::Validation(format!(
                "Video {} has total {} (must be at least {MIN_TOTAL})",
                self.id, self.total
            )));
        }
        if self.current < 0 || self.current > self.total {
            return Err(CoreError::Validation(format!(
                "Video {} has current {} outside 0..={}",
                self.id, self.current, self.total
            )));
        }
        match self.status {
            VideoStatus::Todo if self.current != 0 => Err(CoreError::Validation(format!(
                "Video {} is todo but current is {}",
                self.id, self.current
            ))),
            VideoStatus::Doing if self.current == 0 || self.current >= self.total => {
                Err(CoreError::Validation(format!(
                    "Video {} is doing but current {} is not strictly between 0 and {}",
                    self.id, self.current, self.total
                )))
            }
            _ => Ok(()),
        }
    }

    /// Return a copy with the given progress fields overwritten.
    pub fn with_patch(&self, patch: &ProgressPatch) -> Video {
        let mut next = self.clone();
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(current) = patch.current {
            next.current = current;
        }
        if let Some(finished_at) = patch.finished_at {
            next.finished_at = Some(finished_at);
        }
        if let Some(loop_count) = patch.loop_count {
            next.loop_count = Some(loop_count);
        }
        next
    }
}

/// The subset of progress fields a transition changed.
///
/// `None` means "leave the stored value alone". Transitions never clear a
/// timestamp, so `finished_at` has no way to express `NULL`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressPatch {
    pub status: Option<VideoStatus>,
    pub current: Option<i32>,
    pub finished_at: Option<Timestamp>,
    pub loop_count: Option<i32>,
}

impl ProgressPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.current.is_none()
            && self.finished_at.is_none()
            && self.loop_count.is_none()
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Input for the add-video flow.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVideo {
    pub title: String,
    pub total: i32,
    #[serde(rename = "type", default)]
    pub video_type: VideoType,
    pub area: Option<String>,
    pub image: Option<String>,
}

impl NewVideo {
    pub fn new(title: impl Into<String>, total: i32, video_type: VideoType) -> Self {
        Self {
            title: title.into(),
            total,
            video_type,
            area: None,
            image: None,
        }
    }

    /// Validate the input and return a normalised copy: trimmed title,
    /// default area, blank image dropped.
    pub fn validated(&self) -> Result<NewVideo, CoreError> {
        let title = self.title.trim();
        validate_title(title)?;
        validate_total(self.total)?;

        let area = match self.area.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_AREA.to_string(),
            Some(area) if area.chars().count() > MAX_AREA_LENGTH => {
                return Err(CoreError::Validation(format!(
                    "Area exceeds maximum length of {MAX_AREA_LENGTH} characters"
                )));
            }
            Some(area) => area.to_string(),
        };

        let image = self
            .image
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        Ok(NewVideo {
            title: title.to_string(),
            total: self.total,
            video_type: self.video_type,
            area: Some(area),
            image,
        })
    }
}

/// Validate a video title: non-empty after trimming, bounded length.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Video title must not be empty".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Video title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate the episode/segment count given at creation.
pub fn validate_total(total: i32) -> Result<(), CoreError> {
    if (MIN_TOTAL..=MAX_TOTAL).contains(&total) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Total must be between {MIN_TOTAL} and {MAX_TOTAL}, got {total}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
