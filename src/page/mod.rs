//! Content indexing for the current page load
//!
//! This module turns the live document into matchable state:
//! - PageSnapshot: visible elements plus the flattened page text, extracted
//!   from the tab with an injected script
//! - TextIndex: text fragments (exact element text and 3-word phrases)
//!   mapped to their owning elements
//! - PageState: the per-page-load arena holding snapshot, index and the
//!   active highlight records

pub mod index;
pub mod snapshot;

pub use index::TextIndex;
pub use snapshot::{ElementSummary, PageSnapshot, VisibleElement};

use crate::highlight::HighlightSet;

/// Mutable scan state for one page load.
///
/// Owned by the session behind a mutex; rebuilding the index replaces the
/// previous one and drops every highlight record, and navigation resets the
/// whole thing. Nothing in here survives a page reload.
#[derive(Debug, Default)]
pub struct PageState {
    snapshot: Option<PageSnapshot>,
    index: TextIndex,
    highlights: HighlightSet,
}

impl PageState {
    /// Install a fresh snapshot, rebuilding the index and invalidating all
    /// highlight records tracked for the previous snapshot.
    pub fn install(&mut self, snapshot: PageSnapshot) {
        self.index = TextIndex::build(&snapshot.elements);
        self.highlights.clear();
        self.snapshot = Some(snapshot);
    }

    /// Clear everything (used on navigation)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> Option<&PageSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn index(&self) -> &TextIndex {
        &self.index
    }

    pub fn highlights(&self) -> &HighlightSet {
        &self.highlights
    }

    pub fn highlights_mut(&mut self) -> &mut HighlightSet {
        &mut self.highlights
    }
}
