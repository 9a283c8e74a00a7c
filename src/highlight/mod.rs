//! Highlight decoration lifecycle
//!
//! Per highlight index the state machine is a toggle:
//! UNHIGHLIGHTED -> HIGHLIGHTED -> UNHIGHLIGHTED. The `HighlightSet` tracks
//! at most one record per index; removal is additionally backed by a
//! document-wide sweep so DeactivateAll stays correct even when tracking
//! state and DOM state have drifted.

pub mod decorate;

pub use decorate::{CdpDecorator, Decorator};

use crate::error::{LensError, Result};
use crate::locator::{locate, PatternDescriptor};
use crate::page::PageState;
use indexmap::IndexMap;

/// Bookkeeping for one active highlight
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightRecord {
    /// Position of the pattern in the classifier's result list
    pub index: usize,

    /// Position of the decorated element in the snapshot
    pub element: usize,

    /// CSS path the decoration was applied through
    pub css_path: String,

    /// The pattern this highlight represents
    pub pattern: PatternDescriptor,
}

/// Sparse, insertion-ordered set of active highlights.
///
/// An index with no active highlight is simply absent; at most one record
/// exists per index at any time.
#[derive(Debug, Clone, Default)]
pub struct HighlightSet {
    records: IndexMap<usize, HighlightRecord>,
}

impl HighlightSet {
    pub fn insert(&mut self, record: HighlightRecord) {
        self.records.insert(record.index, record);
    }

    pub fn remove(&mut self, index: usize) -> Option<HighlightRecord> {
        self.records.shift_remove(&index)
    }

    pub fn get(&self, index: usize) -> Option<&HighlightRecord> {
        self.records.get(&index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.records.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &HighlightRecord> {
        self.records.values()
    }
}

/// Drives the highlight lifecycle against a [`Decorator`]
pub struct Highlighter<'a, D: Decorator> {
    decorator: &'a D,
}

impl<'a, D: Decorator> Highlighter<'a, D> {
    pub fn new(decorator: &'a D) -> Self {
        Self { decorator }
    }

    /// Highlight one pattern. No-op when the index is already active.
    ///
    /// Runs the matching cascade; on success decorates the element, scrolls
    /// it into view and records the highlight. On a miss, shows a transient
    /// notice naming the pattern type and records nothing.
    pub fn activate(&self, state: &mut PageState, index: usize, pattern: &PatternDescriptor) -> Result<bool> {
        if state.highlights().contains(index) {
            log::debug!("Highlight {} already active", index);
            return Ok(true);
        }

        let snapshot = state
            .snapshot()
            .ok_or_else(|| LensError::PageNotIndexed("scan the page before adding highlights".to_string()))?;

        let resolved = locate(pattern, state.index(), &snapshot.elements)
            .map(|m| (m.element, snapshot.elements[m.element].css_path.clone()));

        let Some((element, css_path)) = resolved else {
            self.notify_unmatched(pattern)?;
            return Ok(false);
        };

        if !self.decorator.apply(&css_path, index, pattern)? {
            // The element left the DOM between snapshot and decoration
            log::debug!("Element at {} no longer present", css_path);
            self.notify_unmatched(pattern)?;
            return Ok(false);
        }

        state.highlights_mut().insert(HighlightRecord {
            index,
            element,
            css_path,
            pattern: pattern.clone(),
        });

        Ok(true)
    }

    /// Remove one highlight. No-op when the index is not active.
    pub fn deactivate(&self, state: &mut PageState, index: usize) -> Result<bool> {
        match state.highlights_mut().remove(index) {
            Some(record) => {
                self.decorator.clear(&record.css_path, index)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Clear everything, then highlight each pattern in list order.
    /// Returns the number of patterns successfully highlighted.
    pub fn activate_all(&self, state: &mut PageState, patterns: &[PatternDescriptor]) -> Result<usize> {
        self.deactivate_all(state)?;

        let mut highlighted = 0;
        for (index, pattern) in patterns.iter().enumerate() {
            if self.activate(state, index, pattern)? {
                highlighted += 1;
            }
        }

        if highlighted > 0 {
            self.decorator
                .notify(&format!("Highlighted {} dark patterns on this page.", highlighted))?;
        }

        Ok(highlighted)
    }

    /// Remove every highlight marker anywhere in the document and reset
    /// tracking. The sweep is document-wide rather than record-driven, so it
    /// also removes markers the tracking state has lost sight of.
    pub fn deactivate_all(&self, state: &mut PageState) -> Result<()> {
        let swept = self.decorator.sweep()?;
        if swept > 0 {
            log::debug!("Swept {} highlight markers", swept);
        }
        state.highlights_mut().clear();
        Ok(())
    }

    fn notify_unmatched(&self, pattern: &PatternDescriptor) -> Result<()> {
        self.decorator
            .notify(&format!("Could not locate \"{}\" element on page.", pattern.pattern_type))
    }
}
