//! # Page Navigation
//!
//! Current page plus a single back pointer. This is deliberately not a
//! stack: the UI is only two levels deep, so "back" returns to the previous
//! page once and then resets the pointer to the landing page.
//!
//! ```text
//! Account ──auth──▶ Lists ──open──▶ Search ──open──▶ FilmDetails
//!                     ▲               ▲                  │
//!                     │               └──────back────────┘
//!                     └──back── (from any non-root page, second time)
//! ```

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Account,
    Lists,
    FilmDetails,
    Search,
}

impl Page {
    /// Where authentication lands and where the back pointer resets to.
    pub const LANDING: Page = Page::Lists;

    /// Root pages have nowhere to go back to.
    pub fn is_root(&self) -> bool {
        matches!(self, Page::Account | Page::Lists)
    }
}

/// Outcome of a back request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Back {
    /// Already on a root page. The caller decides what that means (quit prompt).
    AtRoot,
    /// Moved to the given page.
    Moved(Page),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: Page,
    previous: Page,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: Page::Account,
            previous: Page::Account,
        }
    }

    pub fn current(&self) -> Page {
        self.current
    }

    pub fn previous(&self) -> Page {
        self.previous
    }

    /// Successful authentication: no meaningful "back" afterwards.
    pub fn authenticated(&mut self) {
        self.current = Page::LANDING;
        self.previous = Page::LANDING;
        debug!("Navigation: authenticated, now on {:?}", self.current);
    }

    /// Open a page on top of the current one.
    ///
    /// Re-opening the page already shown leaves the back pointer alone.
    pub fn open(&mut self, page: Page) {
        if page != self.current {
            self.previous = self.current;
            self.current = page;
        }
        debug!(
            "Navigation: open {:?} (back -> {:?})",
            self.current, self.previous
        );
    }

    pub fn back(&mut self) -> Back {
        if self.current.is_root() {
            return Back::AtRoot;
        }
        self.current = self.previous;
        self.previous = Page::LANDING;
        debug!("Navigation: back to {:?}", self.current);
        Back::Moved(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_account() {
        let nav = Navigator::new();
        assert_eq!(nav.current(), Page::Account);
        assert_eq!(nav.clone().back(), Back::AtRoot);
    }

    #[test]
    fn test_authenticated_lands_on_lists_with_no_back() {
        let mut nav = Navigator::new();
        nav.authenticated();
        assert_eq!(nav.current(), Page::Lists);
        assert_eq!(nav.previous(), Page::Lists);
        assert_eq!(nav.back(), Back::AtRoot);
    }

    #[test]
    fn test_back_is_one_level_only() {
        let mut nav = Navigator::new();
        nav.authenticated();
        nav.open(Page::Search);
        nav.open(Page::FilmDetails);

        assert_eq!(nav.back(), Back::Moved(Page::Search));
        // Second back goes to the landing page, never to FilmDetails again.
        assert_eq!(nav.back(), Back::Moved(Page::Lists));
        assert_eq!(nav.back(), Back::AtRoot);
    }

    #[test]
    fn test_details_from_lists_returns_to_lists() {
        let mut nav = Navigator::new();
        nav.authenticated();
        nav.open(Page::FilmDetails);
        assert_eq!(nav.previous(), Page::Lists);
        assert_eq!(nav.back(), Back::Moved(Page::Lists));
    }

    #[test]
    fn test_reopening_current_page_keeps_back_pointer() {
        let mut nav = Navigator::new();
        nav.authenticated();
        nav.open(Page::FilmDetails);
        nav.back();
        nav.open(Page::Search);
        nav.open(Page::Search);
        assert_eq!(nav.previous(), Page::Lists);
        assert_eq!(nav.back(), Back::Moved(Page::Lists));
    }
}
