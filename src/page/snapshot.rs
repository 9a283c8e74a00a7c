use crate::error::{LensError, Result};
use headless_chrome::Tab;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One visible element recorded by the extraction script.
///
/// An element qualifies when its computed style is neither `display: none`
/// nor `visibility: hidden`, it has non-zero rendered width and height, and
/// its trimmed text content is non-empty. The predicate lives in
/// `extract_visible.js`; matching recall depends on it, so keep the two in
/// sync with the tests that pin it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisibleElement {
    /// Trimmed text content of the element
    pub text: String,

    /// Lowercase tag name
    pub tag: String,

    /// Element id attribute, if any
    #[serde(default)]
    pub id: Option<String>,

    /// Element class list
    #[serde(default)]
    pub classes: Vec<String>,

    /// nth-child CSS path, stable for the lifetime of the page load
    pub css_path: String,
}

impl VisibleElement {
    pub fn new(tag: impl Into<String>, text: impl Into<String>, css_path: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            css_path: css_path.into(),
        }
    }

    /// Builder method: set the id attribute
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder method: set the class list
    pub fn with_classes(mut self, classes: Vec<String>) -> Self {
        self.classes = classes;
        self
    }
}

/// Diagnostic view of one indexed element
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ElementSummary {
    pub text: String,
    pub tag: String,
}

/// Visible-text snapshot of one page load
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    /// URL the snapshot was taken from
    pub page_url: String,

    /// Flattened visible text of the whole page (sent to the classifier)
    pub full_text: String,

    /// Every element passing the visibility predicate, in document order
    #[serde(default)]
    pub elements: Vec<VisibleElement>,
}

impl PageSnapshot {
    /// Extract the snapshot from a browser tab
    pub fn from_tab(tab: &Arc<Tab>) -> Result<Self> {
        let js_code = include_str!("extract_visible.js");

        let result = tab
            .evaluate(js_code, false)
            .map_err(|e| LensError::SnapshotFailed(format!("Failed to execute extraction script: {}", e)))?;

        let json_value = result
            .value
            .ok_or_else(|| LensError::SnapshotFailed("No value returned from extraction script".to_string()))?;

        // The script returns a JSON string, so parse it as a string first
        let json_str: String = serde_json::from_value(json_value)
            .map_err(|e| LensError::SnapshotFailed(format!("Failed to get JSON string: {}", e)))?;

        let snapshot: PageSnapshot = serde_json::from_str(&json_str)
            .map_err(|e| LensError::SnapshotFailed(format!("Failed to parse snapshot JSON: {}", e)))?;

        Ok(snapshot)
    }

    /// Build a snapshot directly from elements (unit tests)
    pub fn for_tests(elements: Vec<VisibleElement>) -> Self {
        let full_text = elements.iter().map(|e| e.text.as_str()).collect::<Vec<_>>().join("\n");
        Self {
            page_url: "http://localhost/test".to_string(),
            full_text,
            elements,
        }
    }

    /// Diagnostic manifest of the indexed elements
    pub fn manifest(&self) -> Vec<ElementSummary> {
        self.elements
            .iter()
            .map(|e| ElementSummary { text: e.text.clone(), tag: e.tag.clone() })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_deserialization() {
        let json = r#"{
            "pageUrl": "https://example.com",
            "fullText": "Only 2 items left!",
            "elements": [
                {"text": "Only 2 items left!", "tag": "p", "id": null, "classes": ["stock"], "cssPath": "body > p:nth-child(1)"}
            ]
        }"#;

        let snapshot: PageSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.page_url, "https://example.com");
        assert_eq!(snapshot.elements.len(), 1);
        assert_eq!(snapshot.elements[0].tag, "p");
        assert_eq!(snapshot.elements[0].classes, vec!["stock".to_string()]);
        assert_eq!(snapshot.elements[0].css_path, "body > p:nth-child(1)");
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let element = VisibleElement::new("div", "Some text", "body > div:nth-child(2)")
            .with_id("container")
            .with_classes(vec!["promo".to_string()]);

        let json = serde_json::to_string(&element).unwrap();
        let deserialized: VisibleElement = serde_json::from_str(&json).unwrap();
        assert_eq!(element, deserialized);
    }

    #[test]
    fn test_manifest() {
        let snapshot = PageSnapshot::for_tests(vec![
            VisibleElement::new("p", "first", "body > p:nth-child(1)"),
            VisibleElement::new("span", "second", "body > span:nth-child(2)"),
        ]);

        let manifest = snapshot.manifest();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest[0], ElementSummary { text: "first".to_string(), tag: "p".to_string() });
        assert_eq!(manifest[1].tag, "span");
    }
}
