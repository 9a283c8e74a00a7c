//! Scan orchestration: snapshot the page, classify its text, report patterns

use crate::browser::BrowserSession;
use crate::classify::GeminiClassifier;
use crate::error::{LensError, Result};
use crate::locator::PatternDescriptor;
use serde::Serialize;

/// Outcome of one page scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// URL the scanned snapshot was taken from
    pub page_url: String,

    /// Detected patterns, in classifier order. Highlight indexes refer to
    /// positions in this list.
    pub patterns: Vec<PatternDescriptor>,
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Scan the current page for dark patterns.
///
/// Rebuilds the snapshot and text index, then sends the flattened visible
/// text to the classifier. The index rebuilt here is the one subsequent
/// highlight requests match against, so descriptors and index always come
/// from the same page load.
pub async fn scan_page(session: &BrowserSession, classifier: &GeminiClassifier) -> Result<ScanReport> {
    session.refresh_page()?;

    let (full_text, page_url) = {
        let state = session.page_state()?;
        let snapshot = state
            .snapshot()
            .ok_or_else(|| LensError::SnapshotFailed("snapshot missing after page refresh".to_string()))?;
        (snapshot.full_text.clone(), snapshot.page_url.clone())
    };

    log::info!("Scanning {} ({} chars of visible text)", page_url, full_text.len());

    let patterns = classifier.classify(&full_text).await?;

    Ok(ScanReport { page_url, patterns })
}
