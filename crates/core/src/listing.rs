//! List presentation pipeline: status tab -> fuzzy search -> page window.
//!
//! Everything here is synchronous and pure. For the same base list and the
//! same [`ListQuery`], [`derive_window`] always returns the same window.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::search::TitleMatcher;
use crate::video::{Video, VideoStatus};

/// Number of items added to the window per page.
pub const PAGE_SIZE: usize = 20;

// ---------------------------------------------------------------------------
// Tabs and sorting
// ---------------------------------------------------------------------------

/// The list partitions offered by the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTab {
    #[default]
    All,
    Todo,
    Doing,
    Done,
}

/// Server-side ordering for a list fetch. Always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    CreatedAtDesc,
    FinishedAtDesc,
}

impl StatusTab {
    pub const ALL: [StatusTab; 4] = [
        StatusTab::All,
        StatusTab::Todo,
        StatusTab::Doing,
        StatusTab::Done,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusTab::All => "all",
            StatusTab::Todo => "todo",
            StatusTab::Doing => "doing",
            StatusTab::Done => "done",
        }
    }

    /// Equality predicate for the fetch; `None` for the "all" tab.
    pub fn status_filter(self) -> Option<VideoStatus> {
        match self {
            StatusTab::All => None,
            StatusTab::Todo => Some(VideoStatus::Todo),
            StatusTab::Doing => Some(VideoStatus::Doing),
            StatusTab::Done => Some(VideoStatus::Done),
        }
    }

    pub fn sort_order(self) -> SortOrder {
        match self {
            StatusTab::Done => SortOrder::FinishedAtDesc,
            StatusTab::All | StatusTab::Todo | StatusTab::Doing => SortOrder::CreatedAtDesc,
        }
    }

    /// Only the finished list is searchable.
    pub fn supports_search(self) -> bool {
        self == StatusTab::Done
    }
}

impl fmt::Display for StatusTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusTab {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusTab::ALL
            .into_iter()
            .find(|tab| tab.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid tab '{s}'. Must be one of: all, todo, doing, done"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Query state
// ---------------------------------------------------------------------------

/// The `(tab, search text, page)` triple a list screen renders from.
///
/// Changing the tab or the search text, or resetting, always puts the page
/// back to 1. [`ListQuery::load_more`] is the only way to grow the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    tab: StatusTab,
    search: String,
    page: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(StatusTab::default())
    }
}

impl ListQuery {
    pub fn new(tab: StatusTab) -> Self {
        Self {
            tab,
            search: String::new(),
            page: 1,
        }
    }

    /// Build a query from raw request parameters. Page 0 is read as 1.
    pub fn from_parts(tab: StatusTab, search: Option<&str>, page: Option<usize>) -> Self {
        let mut query = Self::new(tab);
        if let Some(search) = search {
            query.search = search.to_string();
        }
        query.page = page.unwrap_or(1).max(1);
        query
    }

    pub fn tab(&self) -> StatusTab {
        self.tab
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Switch tabs. The search text is cleared since not every tab uses it.
    pub fn set_tab(&mut self, tab: StatusTab) {
        self.tab = tab;
        self.search.clear();
        self.page = 1;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    /// Back to the first page, as on a manual refresh.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn load_more(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    /// The search text that actually applies on this tab, if any.
    fn effective_search(&self) -> Option<&str> {
        let search = self.search.trim();
        (self.tab.supports_search() && !search.is_empty()).then_some(search)
    }
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// What the list renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListWindow<'a> {
    pub items: Vec<&'a Video>,
    /// Number of items that passed search, before windowing.
    pub matched: usize,
    pub page: usize,
    pub has_more: bool,
}

/// Derive the rendered window from an already tab-filtered list.
pub fn derive_window<'a>(videos: &'a [Video], query: &ListQuery) -> ListWindow<'a> {
    let searched: Vec<&'a Video> = match query.effective_search() {
        Some(search) => TitleMatcher::default()
            .rank(videos.iter().map(|v| v.title.as_str()), search)
            .into_iter()
            .map(|hit| &videos[hit.index])
            .collect(),
        None => videos.iter().collect(),
    };

    let page = query.page.max(1);
    let limit = page.saturating_mul(PAGE_SIZE);
    let matched = searched.len();
    let items: Vec<&'a Video> = searched.into_iter().take(limit).collect();

    ListWindow {
        has_more: matched > items.len(),
        items,
        matched,
        page,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::tests::sample;

    fn titled(titles: &[&str]) -> Vec<Video> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| sample(i as i64 + 1, t, 12))
            .collect()
    }

    fn numbered(count: usize) -> Vec<Video> {
        (0..count)
            .map(|i| sample(i as i64 + 1, &format!("Video {i}"), 12))
            .collect()
    }

    fn titles<'a>(window: &ListWindow<'a>) -> Vec<&'a str> {
        window.items.iter().map(|v| v.title.as_str()).collect()
    }

    // -- search --------------------------------------------------------------

    #[test]
    fn empty_search_keeps_original_order() {
        let videos = titled(&["Alpha", "Beta"]);
        let window = derive_window(&videos, &ListQuery::from_parts(StatusTab::Done, Some(""), None));
        assert_eq!(titles(&window), vec!["Alpha", "Beta"]);
        assert!(!window.has_more);
    }

    #[test]
    fn search_filters_on_done_tab() {
        let videos = titled(&["Alpha", "Beta"]);
        let window =
            derive_window(&videos, &ListQuery::from_parts(StatusTab::Done, Some("Alph"), None));
        assert_eq!(titles(&window), vec!["Alpha"]);
        assert_eq!(window.matched, 1);
    }

    #[test]
    fn search_is_ignored_outside_done_tab() {
        let videos = titled(&["Alpha", "Beta"]);
        let window =
            derive_window(&videos, &ListQuery::from_parts(StatusTab::Todo, Some("Alph"), None));
        assert_eq!(titles(&window), vec!["Alpha", "Beta"]);
    }

    // -- pagination ----------------------------------------------------------

    #[test]
    fn first_page_of_45_has_more() {
        let videos = numbered(45);
        let window = derive_window(&videos, &ListQuery::new(StatusTab::Todo));
        assert_eq!(window.items.len(), 20);
        assert!(window.has_more);
        assert_eq!(window.matched, 45);
    }

    #[test]
    fn third_page_of_45_is_complete() {
        let videos = numbered(45);
        let window =
            derive_window(&videos, &ListQuery::from_parts(StatusTab::Todo, None, Some(3)));
        assert_eq!(window.items.len(), 45);
        assert!(!window.has_more);
    }

    #[test]
    fn exact_multiple_of_page_size_has_no_more() {
        let videos = numbered(40);
        let window =
            derive_window(&videos, &ListQuery::from_parts(StatusTab::Todo, None, Some(2)));
        assert_eq!(window.items.len(), 40);
        assert!(!window.has_more);
    }

    #[test]
    fn page_zero_reads_as_first_page() {
        let videos = numbered(25);
        let window =
            derive_window(&videos, &ListQuery::from_parts(StatusTab::Todo, None, Some(0)));
        assert_eq!(window.page, 1);
        assert_eq!(window.items.len(), 20);
    }

    #[test]
    fn empty_list_yields_empty_window() {
        let window = derive_window(&[], &ListQuery::new(StatusTab::Done));
        assert!(window.items.is_empty());
        assert!(!window.has_more);
    }

    // -- query state ---------------------------------------------------------

    #[test]
    fn changing_search_resets_page() {
        let mut query = ListQuery::new(StatusTab::Done);
        query.load_more();
        query.load_more();
        assert_eq!(query.page(), 3);
        query.set_search("stone");
        assert_eq!(query.page(), 1);
        query.load_more();
        query.set_search("");
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn changing_tab_clears_search_and_page() {
        let mut query = ListQuery::new(StatusTab::Done);
        query.set_search("stone");
        query.load_more();
        query.set_tab(StatusTab::Doing);
        assert_eq!(query.search(), "");
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn done_tab_sorts_by_finish_time() {
        assert_eq!(StatusTab::Done.sort_order(), SortOrder::FinishedAtDesc);
        assert_eq!(StatusTab::All.sort_order(), SortOrder::CreatedAtDesc);
        assert_eq!(StatusTab::All.status_filter(), None);
        assert_eq!("doing".parse::<StatusTab>().unwrap(), StatusTab::Doing);
    }
}
