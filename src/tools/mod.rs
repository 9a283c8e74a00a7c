//! Page tools
//!
//! Each tool is a typed operation against the live page, executed through a
//! registry so the MCP server (or any other caller) can dispatch by name with
//! JSON parameters. The set of tools realizes the message contract of the
//! page side: get content, add/remove one highlight, add/remove all.

pub mod highlight;
pub mod navigate;
pub mod page_content;

pub use highlight::{AddAllHighlightsParams, AddAllHighlightsTool, AddHighlightParams, AddHighlightTool,
                    RemoveAllHighlightsParams, RemoveAllHighlightsTool, RemoveHighlightParams, RemoveHighlightTool};
pub use navigate::{NavigateParams, NavigateTool};
pub use page_content::{GetPageContentParams, GetPageContentTool};

use crate::browser::BrowserSession;
use crate::error::{LensError, Result};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Result of a tool execution
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    /// Whether the tool ran to completion
    pub success: bool,

    /// Tool-specific payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Error message when success is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success() -> Self {
        Self { success: true, data: None, error: None }
    }

    pub fn success_with(data: serde_json::Value) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }
}

/// Execution context handed to every tool
pub struct ToolContext<'a> {
    pub session: &'a BrowserSession,
}

impl<'a> ToolContext<'a> {
    pub fn new(session: &'a BrowserSession) -> Self {
        Self { session }
    }
}

/// A typed page tool
pub trait Tool {
    type Params: DeserializeOwned + JsonSchema;

    /// Registry name of the tool
    fn name(&self) -> &str;

    /// Execute with already-deserialized parameters
    fn execute_typed(&self, params: Self::Params, context: &mut ToolContext) -> Result<ToolResult>;

    /// JSON schema of the parameter struct
    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Self::Params)).unwrap_or_default()
    }
}

/// Object-safe wrapper so tools with different parameter types share a registry
trait ErasedTool: Send + Sync {
    fn name(&self) -> &str;
    fn parameters_schema(&self) -> serde_json::Value;
    fn execute(&self, params: serde_json::Value, context: &mut ToolContext) -> Result<ToolResult>;
}

impl<T: Tool + Send + Sync> ErasedTool for T {
    fn name(&self) -> &str {
        Tool::name(self)
    }

    fn parameters_schema(&self) -> serde_json::Value {
        Tool::parameters_schema(self)
    }

    fn execute(&self, params: serde_json::Value, context: &mut ToolContext) -> Result<ToolResult> {
        let typed: T::Params = serde_json::from_value(params).map_err(|e| LensError::InvalidParams {
            tool: Tool::name(self).to_string(),
            reason: e.to_string(),
        })?;
        self.execute_typed(typed, context)
    }
}

/// Name-indexed collection of tools
pub struct ToolRegistry {
    tools: IndexMap<String, Box<dyn ErasedTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: IndexMap::new() }
    }

    /// Registry with every built-in tool registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(NavigateTool);
        registry.register(GetPageContentTool);
        registry.register(AddHighlightTool);
        registry.register(RemoveHighlightTool);
        registry.register(AddAllHighlightsTool);
        registry.register(RemoveAllHighlightsTool);
        registry
    }

    pub fn register<T: Tool + Send + Sync + 'static>(&mut self, tool: T) {
        self.tools.insert(Tool::name(&tool).to_string(), Box::new(tool));
    }

    /// Execute a tool by name with JSON parameters
    pub fn execute(&self, name: &str, params: serde_json::Value, context: &mut ToolContext) -> Result<ToolResult> {
        let tool = self.tools.get(name).ok_or_else(|| LensError::UnknownTool(name.to_string()))?;
        tool.execute(params, context)
    }

    /// Registered tool names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_defaults() {
        let registry = ToolRegistry::with_defaults();
        let names = registry.names();

        assert!(names.contains(&"navigate"));
        assert!(names.contains(&"get_page_content"));
        assert!(names.contains(&"add_highlight"));
        assert!(names.contains(&"remove_highlight"));
        assert!(names.contains(&"add_all_highlights"));
        assert!(names.contains(&"remove_all_highlights"));
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_tool_result_constructors() {
        let ok = ToolResult::success();
        assert!(ok.success);
        assert!(ok.data.is_none());

        let with_data = ToolResult::success_with(serde_json::json!({"count": 3}));
        assert_eq!(with_data.data.unwrap()["count"], 3);

        let failed = ToolResult::failure("nope");
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("nope"));
    }

    #[test]
    fn test_parameter_schemas_are_objects() {
        let registry = ToolRegistry::with_defaults();
        for name in registry.names() {
            let schema = registry.tools.get(name).unwrap().parameters_schema();
            assert!(schema.is_object(), "schema for {} must be an object", name);
        }
    }
}
