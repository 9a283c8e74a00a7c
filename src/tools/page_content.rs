use crate::error::{LensError, Result};
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct GetPageContentParams {}

/// Extract the visible text of the current page.
///
/// Snapshots the DOM, rebuilds the text index for subsequent highlight
/// requests, and returns the flattened text plus the page URL. Each call
/// re-reads the live document; there is no caching across calls.
#[derive(Default)]
pub struct GetPageContentTool;

impl Tool for GetPageContentTool {
    type Params = GetPageContentParams;

    fn name(&self) -> &str {
        "get_page_content"
    }

    fn execute_typed(&self, _params: Self::Params, context: &mut ToolContext) -> Result<ToolResult> {
        context.session.refresh_page()?;

        let state = context.session.page_state()?;
        let snapshot = state
            .snapshot()
            .ok_or_else(|| LensError::SnapshotFailed("snapshot missing after page refresh".to_string()))?;

        Ok(ToolResult::success_with(json!({
            "content": snapshot.full_text,
            "page_url": snapshot.page_url,
            "element_count": snapshot.elements.len(),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_accept_empty_object() {
        let params: GetPageContentParams = serde_json::from_value(json!({})).unwrap();
        let _ = params;
    }
}
