use crate::error::Result;
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

fn default_wait_for_load() -> bool {
    true
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NavigateParams {
    /// URL to navigate to
    pub url: String,

    /// Whether to wait for the page to finish loading (default: true)
    #[serde(default = "default_wait_for_load")]
    pub wait_for_load: bool,
}

/// Navigate the active tab to a URL.
///
/// Navigation invalidates the page's text index and highlight records; the
/// session resets them so the next scan starts from a clean slate.
#[derive(Default)]
pub struct NavigateTool;

impl Tool for NavigateTool {
    type Params = NavigateParams;

    fn name(&self) -> &str {
        "navigate"
    }

    fn execute_typed(&self, params: Self::Params, context: &mut ToolContext) -> Result<ToolResult> {
        let url = normalize_url(&params.url);

        log::info!("Navigating to {}", url);
        context.session.navigate(&url)?;

        if params.wait_for_load {
            context.session.wait_for_navigation()?;
        }

        Ok(ToolResult::success_with(json!({
            "url": url,
            "original_url": params.url,
        })))
    }
}

/// Add an https scheme when the caller omitted one. Scheme-qualified URLs
/// (including about: and file:) pass through untouched.
fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();

    if trimmed.contains("://") || trimmed.starts_with("about:") {
        return trimmed.to_string();
    }

    format!("https://{}", trimmed)
}
