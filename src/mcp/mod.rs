//! MCP (Model Context Protocol) server implementation for dark-pattern scanning
//!
//! This module provides rmcp-compatible tools by wrapping the existing tool implementations.

pub mod handler;
pub use handler::LensServer;

use crate::locator::PatternDescriptor;
use crate::tools::{ToolContext, ToolResult as InternalToolResult};
use rmcp::{
    tool_router, tool,
    ErrorData as McpError,
    model::{CallToolResult, Content},
    handler::server::wrapper::Parameters,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Navigate tool parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NavigateParams {
    /// URL to navigate to
    pub url: String,
    /// Wait for navigation to complete (default: true)
    #[serde(default = "default_true")]
    pub wait_for_load: bool,
}

/// Scan tool parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScanParams {
    /// Highlight every detected pattern after scanning (default: false)
    #[serde(default)]
    pub highlight: bool,
}

/// Get page content parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetPageContentParams {}

/// Add highlight parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddHighlightParams {
    /// The pattern to highlight, as returned by a scan
    pub pattern: PatternDescriptor,
    /// Position of the pattern in the scan result list
    pub index: usize,
}

/// Remove highlight parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoveHighlightParams {
    /// Position of the pattern in the scan result list
    pub index: usize,
}

/// Add all highlights parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddAllHighlightsParams {
    /// Patterns to highlight, in scan result order
    pub patterns: Vec<PatternDescriptor>,
}

/// Remove all highlights parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoveAllHighlightsParams {}

fn default_true() -> bool {
    true
}

/// Convert internal ToolResult to MCP CallToolResult
fn convert_result(result: InternalToolResult) -> Result<CallToolResult, McpError> {
    if result.success {
        let text = if let Some(data) = result.data {
            serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string())
        } else {
            "Success".to_string()
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    } else {
        let error_msg = result.error.unwrap_or_else(|| "Unknown error".to_string());
        Err(McpError::internal_error(error_msg, None))
    }
}

#[tool_router]
impl LensServer {
    /// Navigate to a URL
    #[tool(description = "Navigate to a specified URL in the browser")]
    fn lens_navigate(
        &self,
        params: Parameters<NavigateParams>,
    ) -> Result<CallToolResult, McpError> {
        let session = self.session();
        let mut context = ToolContext::new(&session);

        let tool_params = serde_json::json!({
            "url": params.0.url,
            "wait_for_load": params.0.wait_for_load
        });

        let result = session.tool_registry()
            .execute("navigate", tool_params, &mut context)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        convert_result(result)
    }

    /// Scan the current page for dark patterns
    #[tool(description = "Scan the current page for dark patterns using the configured classifier. \
                          Returns the detected patterns; pass highlight=true to also mark them on the page.")]
    async fn lens_scan_page(
        &self,
        params: Parameters<ScanParams>,
    ) -> Result<CallToolResult, McpError> {
        let session = self.session();
        let classifier = self
            .classifier()
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        let report = crate::scan::scan_page(&session, classifier)
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        if params.0.highlight && !report.is_empty() {
            let mut context = ToolContext::new(&session);
            session.tool_registry()
                .execute(
                    "add_all_highlights",
                    serde_json::json!({ "patterns": report.patterns }),
                    &mut context,
                )
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        }

        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Extract the visible text content of the current page
    #[tool(description = "Extract the visible text content of the current page and rebuild the \
                          element index used for highlighting")]
    fn lens_get_page_content(
        &self,
        _params: Parameters<GetPageContentParams>,
    ) -> Result<CallToolResult, McpError> {
        let session = self.session();
        let mut context = ToolContext::new(&session);

        let result = session.tool_registry()
            .execute("get_page_content", serde_json::json!({}), &mut context)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        convert_result(result)
    }

    /// Highlight one detected pattern on the page
    #[tool(description = "Highlight one detected dark pattern on the page by its scan index")]
    fn lens_add_highlight(
        &self,
        params: Parameters<AddHighlightParams>,
    ) -> Result<CallToolResult, McpError> {
        let session = self.session();
        let mut context = ToolContext::new(&session);

        let tool_params = serde_json::json!({
            "pattern": params.0.pattern,
            "index": params.0.index
        });

        let result = session.tool_registry()
            .execute("add_highlight", tool_params, &mut context)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        convert_result(result)
    }

    /// Remove one highlight from the page
    #[tool(description = "Remove one highlight from the page by its scan index")]
    fn lens_remove_highlight(
        &self,
        params: Parameters<RemoveHighlightParams>,
    ) -> Result<CallToolResult, McpError> {
        let session = self.session();
        let mut context = ToolContext::new(&session);

        let tool_params = serde_json::json!({ "index": params.0.index });

        let result = session.tool_registry()
            .execute("remove_highlight", tool_params, &mut context)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        convert_result(result)
    }

    /// Highlight every pattern from a scan
    #[tool(description = "Highlight every given dark pattern on the page, clearing existing highlights first")]
    fn lens_add_all_highlights(
        &self,
        params: Parameters<AddAllHighlightsParams>,
    ) -> Result<CallToolResult, McpError> {
        let session = self.session();
        let mut context = ToolContext::new(&session);

        let tool_params = serde_json::json!({ "patterns": params.0.patterns });

        let result = session.tool_registry()
            .execute("add_all_highlights", tool_params, &mut context)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        convert_result(result)
    }

    /// Remove every highlight on the page
    #[tool(description = "Remove every dark-pattern highlight from the page")]
    fn lens_remove_all_highlights(
        &self,
        _params: Parameters<RemoveAllHighlightsParams>,
    ) -> Result<CallToolResult, McpError> {
        let session = self.session();
        let mut context = ToolContext::new(&session);

        let result = session.tool_registry()
            .execute("remove_all_highlights", serde_json::json!({}), &mut context)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        convert_result(result)
    }
}
