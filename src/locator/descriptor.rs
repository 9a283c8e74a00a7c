use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Sentinel the classifier emits when it has no selector hint
pub const NO_SELECTOR: &str = "N/A";

/// One detected dark pattern, as returned by the classifier.
///
/// Produced externally and treated as read-only input; the locator never
/// mutates it and never assumes the quoted text is present verbatim on the
/// page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct PatternDescriptor {
    /// The exact text the classifier flagged
    pub text: String,

    /// Dark pattern category (e.g. "Urgency", "Misdirection")
    #[serde(rename = "type")]
    pub pattern_type: String,

    /// How the pattern manipulates the user
    pub description: String,

    /// CSS selector hint, or "N/A" when the classifier has none
    #[serde(default = "default_selector")]
    pub selector: String,
}

fn default_selector() -> String {
    NO_SELECTOR.to_string()
}

impl PatternDescriptor {
    pub fn new(text: impl Into<String>, pattern_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pattern_type: pattern_type.into(),
            description: description.into(),
            selector: default_selector(),
        }
    }

    /// Builder method: set the selector hint
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    /// The selector hint, if the classifier provided a usable one
    pub fn selector_hint(&self) -> Option<&str> {
        let trimmed = self.selector.trim();
        if trimmed.is_empty() || trimmed == NO_SELECTOR {
            None
        } else {
            Some(trimmed)
        }
    }
}
