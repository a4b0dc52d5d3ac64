#![forbid(unsafe_code)]

//! Paging through a fixed list of remote documents.

use scrim_core::ElementId;

use crate::config::PagerConfig;
use crate::page::Page;

/// Class of the control that steps back.
pub const PREV_CLASS: &str = "prev";
/// Class of the control that steps forward.
pub const NEXT_CLASS: &str = "next";

/// Current position in the page list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerState {
    urls: Vec<String>,
    index: usize,
}

impl PagerState {
    /// Start at the configured page, clamped into range.
    pub fn new(config: &PagerConfig) -> Self {
        let mut state = Self {
            urls: config.urls.clone(),
            index: 0,
        };
        state.index = state.clamp(config.start_index);
        state
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn current_url(&self) -> Option<&str> {
        self.url_at(self.index)
    }

    pub fn url_at(&self, index: usize) -> Option<&str> {
        self.urls.get(index).map(String::as_str)
    }

    /// Clamp `index` into `[0, len - 1]`.
    pub fn clamp(&self, index: usize) -> usize {
        index.min(self.urls.len().saturating_sub(1))
    }

    pub fn prev_index(&self) -> usize {
        self.index.saturating_sub(1)
    }

    pub fn next_index(&self) -> usize {
        self.clamp(self.index.saturating_add(1))
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.urls.len()
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = self.clamp(index);
    }
}

/// Pager control elements inside the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerControls {
    pub prev: ElementId,
    pub next: ElementId,
}

impl PagerControls {
    /// Hide the control that would step past either end.
    pub fn sync(&self, page: &mut dyn Page, state: &PagerState) {
        page.set_displayed(self.prev, !state.is_first());
        page.set_displayed(self.next, !state.is_last());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pager(start: usize) -> PagerState {
        PagerState::new(&PagerConfig::new(["/a.html", "/b.html", "/c.html"]).start_index(start))
    }

    #[test]
    fn test_starts_at_configured_page() {
        let state = pager(1);
        assert_eq!(state.index(), 1);
        assert_eq!(state.current_url(), Some("/b.html"));
        assert!(!state.is_first());
        assert!(!state.is_last());
    }

    #[test]
    fn test_neighbors_clamp_at_ends() {
        let first = pager(0);
        assert!(first.is_first());
        assert_eq!(first.prev_index(), 0);
        assert_eq!(first.next_index(), 1);

        let last = pager(2);
        assert!(last.is_last());
        assert_eq!(last.next_index(), 2);
    }

    #[test]
    fn edge_start_index_out_of_range_is_clamped() {
        assert_eq!(pager(10).index(), 2);
    }

    #[test]
    fn edge_set_index_clamps() {
        let mut state = pager(0);
        state.set_index(99);
        assert_eq!(state.index(), 2);
    }
}
