//! Progress lifecycle engine.
//!
//! Computes the next `(status, current, finished_at, loop_count)` for a video
//! given a user intent. The engine is pure: it reads no clock and writes
//! nothing. Persisting the result is the caller's job (compute, then write).
//!
//! Transition rules:
//! - `start_watching`: `todo` -> `doing` at 1, or straight to `done` when
//!   the video has a single unit.
//! - `advance`: `doing` -> `doing` at `current + 1`, or `done` on reaching
//!   `total`. Clamped at `total`; a `done` video reports a boundary.
//! - `mark_finished`: `doing` at `total`, or any unfinished single-unit
//!   video -> `done` with `loop_count = 1`.
//! - `remove`: any -> `done` without touching `finished_at`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;
use crate::video::{ProgressPatch, Video, VideoStatus};

// ---------------------------------------------------------------------------
// Intents
// ---------------------------------------------------------------------------

/// A user-triggered lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    StartWatching,
    Advance,
    MarkFinished,
    Remove,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::StartWatching => "start_watching",
            Intent::Advance => "advance",
            Intent::MarkFinished => "mark_finished",
            Intent::Remove => "remove",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Intent::StartWatching => "start watching",
            Intent::Advance => "advance",
            Intent::MarkFinished => "mark finished",
            Intent::Remove => "remove",
        }
    }

    fn rejected(self, status: VideoStatus) -> CoreError {
        CoreError::InvalidTransition {
            intent: self.verb(),
            status: status.as_str(),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// State and outcomes
// ---------------------------------------------------------------------------

/// The lifecycle-owned fields of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    pub status: VideoStatus,
    pub current: i32,
    pub finished_at: Option<Timestamp>,
    pub loop_count: Option<i32>,
}

impl ProgressState {
    pub fn of(video: &Video) -> Self {
        Self {
            status: video.status,
            current: video.current,
            finished_at: video.finished_at,
            loop_count: video.loop_count,
        }
    }
}

/// A legal state change, before and after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub intent: Intent,
    pub before: ProgressState,
    pub after: ProgressState,
}

impl Transition {
    /// The fields that differ between `before` and `after`.
    pub fn patch(&self) -> ProgressPatch {
        let (before, after) = (&self.before, &self.after);
        ProgressPatch {
            status: (after.status != before.status).then_some(after.status),
            current: (after.current != before.current).then_some(after.current),
            finished_at: if after.finished_at != before.finished_at {
                after.finished_at
            } else {
                None
            },
            loop_count: if after.loop_count != before.loop_count {
                after.loop_count
            } else {
                None
            },
        }
    }

    /// Whether this transition completed the video.
    pub fn finished(&self) -> bool {
        self.before.finished_at.is_none() && self.after.finished_at.is_some()
    }
}

/// Result of applying an intent that passed its precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The intent produced a new state that should be persisted.
    Applied(Transition),
    /// The intent hit a limit and nothing changed.
    BoundaryReached { intent: Intent, state: ProgressState },
}

impl Outcome {
    pub fn transition(&self) -> Option<&Transition> {
        match self {
            Outcome::Applied(transition) => Some(transition),
            Outcome::BoundaryReached { .. } => None,
        }
    }

    /// The state after the intent, whether or not anything changed.
    pub fn state(&self) -> ProgressState {
        match self {
            Outcome::Applied(transition) => transition.after,
            Outcome::BoundaryReached { state, .. } => *state,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Apply `intent` to `video` at time `now`.
///
/// Returns [`CoreError::InvalidTransition`] when the intent's precondition is
/// not met. Limits that are expected in normal use (advancing a finished
/// video, removing a video twice) come back as
/// [`Outcome::BoundaryReached`] instead.
pub fn apply(video: &Video, intent: Intent, now: Timestamp) -> Result<Outcome, CoreError> {
    let before = ProgressState::of(video);
    let total = video.total.max(1);

    let after = match (intent, before.status) {
        (Intent::StartWatching, VideoStatus::Todo) => {
            if total == 1 {
                finished(before, total, now)
            } else {
                ProgressState {
                    status: VideoStatus::Doing,
                    current: 1,
                    ..before
                }
            }
        }
        (Intent::StartWatching, status) => return Err(intent.rejected(status)),

        (Intent::Advance, VideoStatus::Doing) => {
            let next = before.current.saturating_add(1).clamp(1, total);
            if next >= total {
                finished(before, total, now)
            } else {
                ProgressState {
                    current: next,
                    ..before
                }
            }
        }
        (Intent::Advance, VideoStatus::Done) => {
            return Ok(Outcome::BoundaryReached {
                intent,
                state: before,
            })
        }
        (Intent::Advance, status) => return Err(intent.rejected(status)),

        (Intent::MarkFinished, VideoStatus::Doing) if before.current >= total => ProgressState {
            loop_count: Some(1),
            ..finished(before, total, now)
        },
        (Intent::MarkFinished, VideoStatus::Todo | VideoStatus::Doing)
            if video.video_type.is_single_unit() =>
        {
            ProgressState {
                loop_count: Some(1),
                ..finished(before, total, now)
            }
        }
        (Intent::MarkFinished, status) => return Err(intent.rejected(status)),

        (Intent::Remove, VideoStatus::Done) => {
            return Ok(Outcome::BoundaryReached {
                intent,
                state: before,
            })
        }
        (Intent::Remove, _) => ProgressState {
            status: VideoStatus::Done,
            ..before
        },
    };

    Ok(Outcome::Applied(Transition {
        intent,
        before,
        after,
    }))
}

fn finished(before: ProgressState, total: i32, now: Timestamp) -> ProgressState {
    ProgressState {
        status: VideoStatus::Done,
        current: total,
        finished_at: before.finished_at.or(Some(now)),
        ..before
    }
}

// ---------------------------------------------------------------------------
// Local episode draft
// ---------------------------------------------------------------------------

/// Result of moving an [`EpisodeDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved(i32),
    BoundaryReached(i32),
}

/// Scratch episode counter for the "go back one / forward one" controls.
///
/// Lives only on the client, floors at 1 and caps at `total`. It is never
/// persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeDraft {
    value: i32,
    total: i32,
}

impl EpisodeDraft {
    pub fn new(video: &Video) -> Self {
        let total = video.total.max(1);
        Self {
            value: video.current.clamp(1, total),
            total,
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn decrement(&mut self) -> Step {
        if self.value <= 1 {
            return Step::BoundaryReached(self.value);
        }
        self.value -= 1;
        Step::Moved(self.value)
    }

    pub fn increment(&mut self) -> Step {
        if self.value >= self.total {
            return Step::BoundaryReached(self.value);
        }
        self.value += 1;
        Step::Moved(self.value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;
    use crate::video::tests::sample;
    use crate::video::VideoType;

    fn now() -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn step(video: &Video, intent: Intent) -> Video {
        match apply(video, intent, now()).unwrap() {
            Outcome::Applied(t) => video.with_patch(&t.patch()),
            Outcome::BoundaryReached { .. } => video.clone(),
        }
    }

    // -- start_watching ------------------------------------------------------

    #[test]
    fn start_watching_moves_to_doing_at_one() {
        let video = step(&sample(1, "Alpha", 12), Intent::StartWatching);
        assert_eq!(video.status, VideoStatus::Doing);
        assert_eq!(video.current, 1);
        assert!(video.finished_at.is_none());
    }

    #[test]
    fn start_watching_single_unit_finishes_in_one_step() {
        let outcome = apply(&sample(1, "Alpha", 1), Intent::StartWatching, now()).unwrap();
        let transition = outcome.transition().copied().unwrap();
        assert_eq!(transition.after.status, VideoStatus::Done);
        assert_eq!(transition.after.current, 1);
        assert_eq!(transition.after.finished_at, Some(now()));
        assert!(transition.finished());
    }

    #[test]
    fn start_watching_rejected_unless_todo() {
        let doing = step(&sample(1, "Alpha", 12), Intent::StartWatching);
        assert_matches!(
            apply(&doing, Intent::StartWatching, now()),
            Err(CoreError::InvalidTransition { status: "doing", .. })
        );
    }

    // -- advance -------------------------------------------------------------

    #[test]
    fn advance_flips_to_done_exactly_at_total() {
        let mut video = step(&sample(1, "Alpha", 5), Intent::StartWatching);
        for expected in 2..5 {
            video = step(&video, Intent::Advance);
            assert_eq!(video.current, expected);
            assert_eq!(video.status, VideoStatus::Doing);
            assert!(video.finished_at.is_none());
        }
        video = step(&video, Intent::Advance);
        assert_eq!(video.current, 5);
        assert_eq!(video.status, VideoStatus::Done);
        assert_eq!(video.finished_at, Some(now()));
    }

    #[test]
    fn current_never_exceeds_total() {
        for total in 1..=15 {
            let mut video = step(&sample(1, "Alpha", total), Intent::StartWatching);
            for _ in 0..(total * 3) {
                video = step(&video, Intent::Advance);
                assert!(video.current >= 0 && video.current <= video.total);
            }
            assert_eq!(video.status, VideoStatus::Done);
            assert_eq!(video.current, total);
        }
    }

    #[test]
    fn advance_on_done_reports_boundary() {
        let done = step(&sample(1, "Alpha", 1), Intent::StartWatching);
        assert_matches!(
            apply(&done, Intent::Advance, now()),
            Ok(Outcome::BoundaryReached {
                intent: Intent::Advance,
                ..
            })
        );
    }

    #[test]
    fn advance_on_todo_is_invalid() {
        assert_matches!(
            apply(&sample(1, "Alpha", 3), Intent::Advance, now()),
            Err(CoreError::InvalidTransition { status: "todo", .. })
        );
    }

    #[test]
    fn advance_patch_only_carries_counter() {
        let video = step(&sample(1, "Alpha", 5), Intent::StartWatching);
        let outcome = apply(&video, Intent::Advance, now()).unwrap();
        let patch = outcome.transition().unwrap().patch();
        assert_eq!(
            patch,
            ProgressPatch {
                current: Some(2),
                ..Default::default()
            }
        );
    }

    // -- mark_finished -------------------------------------------------------

    #[test]
    fn mark_finished_single_unit_from_todo() {
        let mut movie = sample(1, "Heat", 1);
        movie.video_type = VideoType::Movie;
        let video = step(&movie, Intent::MarkFinished);
        assert_eq!(video.status, VideoStatus::Done);
        assert_eq!(video.current, 1);
        assert_eq!(video.loop_count, Some(1));
        assert_eq!(video.finished_at, Some(now()));
    }

    #[test]
    fn mark_finished_rejected_mid_series() {
        let video = step(&sample(1, "Alpha", 12), Intent::StartWatching);
        assert_matches!(
            apply(&video, Intent::MarkFinished, now()),
            Err(CoreError::InvalidTransition { .. })
        );
    }

    #[test]
    fn mark_finished_rejected_when_done() {
        let mut doc = sample(1, "Planet", 2);
        doc.video_type = VideoType::Documentary;
        let done = step(&doc, Intent::MarkFinished);
        assert_matches!(
            apply(&done, Intent::MarkFinished, now()),
            Err(CoreError::InvalidTransition { status: "done", .. })
        );
    }

    // -- remove --------------------------------------------------------------

    #[test]
    fn remove_is_idempotent() {
        let doing = step(&sample(1, "Alpha", 12), Intent::StartWatching);
        let once = step(&doing, Intent::Remove);
        let twice = step(&once, Intent::Remove);
        assert_eq!(once, twice);
        assert_eq!(once.status, VideoStatus::Done);
        assert!(once.finished_at.is_none());
        assert!(once.is_removed());
    }

    #[test]
    fn remove_keeps_finish_time_of_watched_video() {
        let done = step(&sample(1, "Alpha", 1), Intent::StartWatching);
        let removed = step(&done, Intent::Remove);
        assert_eq!(removed.finished_at, Some(now()));
        assert!(!removed.is_removed());
    }

    // -- draft ---------------------------------------------------------------

    #[test]
    fn draft_floors_at_one_and_caps_at_total() {
        let mut video = sample(1, "Alpha", 3);
        video.status = VideoStatus::Doing;
        video.current = 2;
        let mut draft = EpisodeDraft::new(&video);
        assert_eq!(draft.decrement(), Step::Moved(1));
        assert_eq!(draft.decrement(), Step::BoundaryReached(1));
        assert_eq!(draft.increment(), Step::Moved(2));
        assert_eq!(draft.increment(), Step::Moved(3));
        assert_eq!(draft.increment(), Step::BoundaryReached(3));
        assert_eq!(video.current, 2);
    }
}
