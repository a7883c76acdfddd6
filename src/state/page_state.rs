/// Page state definitions for tracking crawl progress
///
/// This module defines all possible states a URL can be in during the crawl.
use std::fmt;

/// Represents the current state of a URL in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// URL was found in a page's links but has not been queued yet
    Discovered,

    /// URL has been claimed by the frontier and is waiting to be fetched
    Queued,

    /// URL is currently being fetched
    Fetching,

    // ===== Terminal States =====
    /// Fetch succeeded, the content hash was new, and the page was persisted
    SavedNew,

    /// Fetch succeeded but the content hash was already seen; nothing
    /// persisted, links still followed
    SavedDuplicate,

    /// Fetch, processing, or persistence failed
    Failed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::SavedNew | Self::SavedDuplicate | Self::Failed)
    }

    /// Returns true if the URL may still be processed
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true for the saved states, which trigger link classification
    /// and further enqueues
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::SavedNew | Self::SavedDuplicate)
    }

    /// String form used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Queued => "queued",
            Self::Fetching => "fetching",
            Self::SavedNew => "saved_new",
            Self::SavedDuplicate => "saved_duplicate",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
