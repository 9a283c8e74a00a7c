use crate::error::{LensError, Result};
use crate::locator::PatternDescriptor;
use headless_chrome::Tab;
use serde_json::{json, Value};
use std::sync::Arc;

/// DOM side effects of the highlight lifecycle.
///
/// Seam between the lifecycle state machine and the live page, so the
/// lifecycle can be tested without a browser.
pub trait Decorator {
    /// Attach the marker and tooltip to the element at `css_path` and scroll
    /// it into view. Returns false when the element can no longer be
    /// re-addressed (it left the DOM since the snapshot).
    fn apply(&self, css_path: &str, index: usize, pattern: &PatternDescriptor) -> Result<bool>;

    /// Remove the marker and tooltip for one highlight index. A node at the
    /// recorded path that does not carry this index's marker is left alone.
    fn clear(&self, css_path: &str, index: usize) -> Result<()>;

    /// Remove every highlight marker anywhere in the document, returning the
    /// number of decorated elements swept
    fn sweep(&self) -> Result<usize>;

    /// Show a transient, auto-dismissing notice to the user
    fn notify(&self, message: &str) -> Result<()>;
}

const APPLY_JS: &str = include_str!("apply_highlight.js");
const REMOVE_JS: &str = include_str!("remove_highlight.js");
const SWEEP_JS: &str = include_str!("sweep_highlights.js");
const NOTICE_JS: &str = include_str!("show_notice.js");
const PAGE_CSS: &str = include_str!("page_styles.css");

/// Decorator that evaluates JavaScript on a CDP tab
pub struct CdpDecorator {
    tab: Arc<Tab>,
}

impl CdpDecorator {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab }
    }

    /// Invoke one of the bundled page functions with JSON-encoded arguments
    fn call(&self, source: &str, args: &[Value]) -> Result<Value> {
        let rendered: Vec<String> = args.iter().map(Value::to_string).collect();
        let expression = format!("{}({})", source.trim(), rendered.join(", "));

        let result = self
            .tab
            .evaluate(&expression, false)
            .map_err(|e| LensError::EvaluationFailed(e.to_string()))?;

        Ok(result.value.unwrap_or(Value::Null))
    }
}

impl Decorator for CdpDecorator {
    fn apply(&self, css_path: &str, index: usize, pattern: &PatternDescriptor) -> Result<bool> {
        let info = json!({
            "type": pattern.pattern_type,
            "description": pattern.description,
        });
        let value = self.call(APPLY_JS, &[json!(css_path), json!(index), info, json!(PAGE_CSS)])?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn clear(&self, css_path: &str, index: usize) -> Result<()> {
        self.call(REMOVE_JS, &[json!(css_path), json!(index)])?;
        Ok(())
    }

    fn sweep(&self) -> Result<usize> {
        let value = self.call(SWEEP_JS, &[])?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    fn notify(&self, message: &str) -> Result<()> {
        self.call(NOTICE_JS, &[json!(message), json!(PAGE_CSS)])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_scripts_are_callable_expressions() {
        // Each script must be a parenthesized function expression so the
        // decorator can append an argument list to it
        for source in [APPLY_JS, REMOVE_JS, SWEEP_JS, NOTICE_JS] {
            let trimmed = source.trim();
            assert!(trimmed.starts_with("(function"), "script must start with (function");
            assert!(trimmed.ends_with("})"), "script must end with }})");
        }
    }

    #[test]
    fn test_remove_script_only_strips_marked_elements() {
        // Removal re-addresses the element through a path recorded at
        // snapshot time; a shifted DOM can point it at an unrelated node.
        // The script must bail out unless the index marker is present.
        assert!(REMOVE_JS.contains("classList.contains('dark-pattern-' + index)"));
        let guard = REMOVE_JS.find("classList.contains").unwrap();
        let strip = REMOVE_JS.find("classList.remove").unwrap();
        assert!(guard < strip, "marker check must run before any class is removed");
    }

    #[test]
    fn test_argument_encoding_escapes_quotes() {
        // Pattern text is classifier-controlled; it must reach the page as a
        // JSON string literal, not interpolated markup
        let message = r#"Could not locate "Urgency" element on page."#;
        let encoded = json!(message).to_string();
        assert!(encoded.starts_with('"'));
        assert!(encoded.contains(r#"\"Urgency\""#));
    }
}
