//! List controller: the single owner of a screen's cached video list.
//!
//! All mutations of the cached list go through this type:
//! - fetch responses via [`VideoListController::reconcile`]
//! - optimistic updates via [`VideoListController::apply_optimistic`] and
//!   [`VideoListController::revert`]
//!
//! Every refresh is tagged with a [`RefreshTicket`]. Only the most recently
//! issued ticket may replace the list, so a slow response to an earlier
//! refresh can never overwrite a newer one.

use serde::Serialize;

use crate::error::CoreError;
use crate::lifecycle::{self, Intent, Outcome, Transition};
use crate::listing::{derive_window, ListQuery, ListWindow, StatusTab};
use crate::store::VideoStore;
use crate::types::{DbId, Timestamp};
use crate::video::{NewVideo, Video};

/// Every action a list screen can issue.
#[derive(Debug, Clone)]
pub enum Command {
    /// Switch to a tab and fetch it.
    List(StatusTab),
    /// Manual pull-to-refresh.
    Refresh,
    Search(String),
    LoadMore,
    Create(NewVideo),
    Lifecycle { id: DbId, intent: Intent },
}

/// Result of a [`Command`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    Listed { matched: usize, has_more: bool },
    Created { video: Video },
    Updated { video: Video, transition: Transition },
    Unchanged { video: Video, intent: Intent },
}

impl Response {
    /// Short human-readable message for a transient notification.
    pub fn notice(&self) -> Option<String> {
        match self {
            Response::Listed { .. } => None,
            Response::Created { video } => Some(format!("Added \"{}\" to your watch list", video.title)),
            Response::Updated { video, transition } => match transition.intent {
                Intent::Remove => Some(format!("Removed \"{}\"", video.title)),
                _ if transition.finished() => Some(format!("Finished \"{}\"", video.title)),
                Intent::StartWatching => Some(format!("Started \"{}\"", video.title)),
                Intent::Advance | Intent::MarkFinished => None,
            },
            Response::Unchanged { video, intent } => match intent {
                Intent::Advance => Some(format!(
                    "Already at the last {} of \"{}\"",
                    video.video_type.unit_label(),
                    video.title
                )),
                _ => Some(format!("\"{}\" is already off the list", video.title)),
            },
        }
    }
}

/// Proof that a refresh was issued, handed back on reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
    tab: StatusTab,
}

impl RefreshTicket {
    pub fn tab(&self) -> StatusTab {
        self.tab
    }
}

/// Explicit state container for one list screen.
pub struct VideoListController<S> {
    store: S,
    videos: Vec<Video>,
    query: ListQuery,
    issued: u64,
    clock: fn() -> Timestamp,
}

impl<S: VideoStore> VideoListController<S> {
    pub fn new(store: S, tab: StatusTab) -> Self {
        Self {
            store,
            videos: Vec::new(),
            query: ListQuery::new(tab),
            issued: 0,
            clock: chrono::Utc::now,
        }
    }

    /// Replace the time source used for `finished_at`.
    pub fn with_clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// The rendered window for the current query.
    pub fn window(&self) -> ListWindow<'_> {
        derive_window(&self.videos, &self.query)
    }

    // -- refresh -------------------------------------------------------------

    /// Issue a new refresh ticket for the current tab and go back to the
    /// first page. Any ticket issued before it becomes stale.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.query.reset();
        self.issued += 1;
        RefreshTicket {
            generation: self.issued,
            tab: self.query.tab(),
        }
    }

    /// Apply the response to a refresh.
    ///
    /// Returns `Ok(true)` if the list was replaced and `Ok(false)` if the
    /// ticket was stale and the response was dropped. A failed fetch leaves
    /// the list at its last known good value.
    pub fn reconcile(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<Video>, CoreError>,
    ) -> Result<bool, CoreError> {
        if ticket.generation != self.issued || ticket.tab != self.query.tab() {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.issued,
                tab = %ticket.tab,
                "Dropping stale refresh response"
            );
            return Ok(false);
        }

        match result {
            Ok(videos) => {
                tracing::debug!(tab = %ticket.tab, count = videos.len(), "Video list refreshed");
                self.videos = videos;
                Ok(true)
            }
            Err(error) => {
                tracing::warn!(tab = %ticket.tab, %error, "Video list refresh failed");
                Err(error)
            }
        }
    }

    /// Fetch the current tab and reconcile.
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        let ticket = self.begin_refresh();
        let result = self
            .store
            .list(ticket.tab.status_filter(), ticket.tab.sort_order())
            .await;
        self.reconcile(ticket, result).map(|_| ())
    }

    /// Refresh after a write. A failure here is logged, not returned: the
    /// write's own result is what the caller needs.
    async fn refresh_after_write(&mut self) {
        if let Err(error) = self.refresh().await {
            tracing::warn!(%error, "Refresh after write failed, keeping local list");
        }
    }

    // -- optimistic updates --------------------------------------------------

    /// Replace the cached copy of `video` and return the previous one.
    /// Videos not in the cached list are ignored.
    pub fn apply_optimistic(&mut self, video: Video) -> Option<Video> {
        let slot = self.videos.iter_mut().find(|v| v.id == video.id)?;
        Some(std::mem::replace(slot, video))
    }

    /// Undo an optimistic update.
    pub fn revert(&mut self, previous: Video) {
        self.apply_optimistic(previous);
    }

    // -- dispatch ------------------------------------------------------------

    pub async fn dispatch(&mut self, command: Command) -> Result<Response, CoreError> {
        match command {
            Command::List(tab) => {
                self.query.set_tab(tab);
                self.refresh().await?;
                Ok(self.listed())
            }
            Command::Refresh => {
                self.query.reset();
                self.refresh().await?;
                Ok(self.listed())
            }
            Command::Search(text) => {
                self.query.set_search(text);
                Ok(self.listed())
            }
            Command::LoadMore => {
                if self.window().has_more {
                    self.query.load_more();
                }
                Ok(self.listed())
            }
            Command::Create(input) => self.create(input).await,
            Command::Lifecycle { id, intent } => self.run_intent(id, intent).await,
        }
    }

    fn listed(&self) -> Response {
        let window = self.window();
        Response::Listed {
            matched: window.matched,
            has_more: window.has_more,
        }
    }

    async fn create(&mut self, input: NewVideo) -> Result<Response, CoreError> {
        let input = input.validated()?;
        let video = self.store.create(&input).await?;
        tracing::info!(video_id = video.id, title = %video.title, "Video added");
        self.refresh_after_write().await;
        Ok(Response::Created { video })
    }

    /// Compute, apply optimistically, persist, then refresh. On a store
    /// failure the optimistic copy is reverted before the error is returned.
    async fn run_intent(&mut self, id: DbId, intent: Intent) -> Result<Response, CoreError> {
        let video = self
            .videos
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or(CoreError::NotFound { entity: "Video", id })?;

        let transition = match lifecycle::apply(&video, intent, (self.clock)())? {
            Outcome::Applied(transition) => transition,
            Outcome::BoundaryReached { .. } => {
                return Ok(Response::Unchanged { video, intent });
            }
        };

        let patch = transition.patch();
        let previous = self.apply_optimistic(video.with_patch(&patch));

        match self.store.apply_patch(id, &patch).await {
            Ok(saved) => {
                tracing::info!(video_id = id, %intent, status = %saved.status, "Lifecycle transition saved");
                self.apply_optimistic(saved.clone());
                self.refresh_after_write().await;
                Ok(Response::Updated {
                    video: saved,
                    transition,
                })
            }
            Err(error) => {
                tracing::warn!(video_id = id, %intent, %error, "Lifecycle transition failed, reverting");
                if let Some(previous) = previous {
                    self.revert(previous);
                }
                self.refresh_after_write().await;
                Err(error)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
