use crate::error::Result;
use crate::highlight::{CdpDecorator, Highlighter};
use crate::locator::PatternDescriptor;
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddHighlightParams {
    /// Pattern to locate and highlight
    pub pattern: PatternDescriptor,

    /// Position of the pattern in the scan result list
    pub index: usize,
}

/// Highlight one detected pattern on the page.
///
/// Runs the matching cascade against the indexed snapshot. A pattern that
/// cannot be located reports `matched: false` and shows an on-page notice;
/// it is not an error.
#[derive(Default)]
pub struct AddHighlightTool;

impl Tool for AddHighlightTool {
    type Params = AddHighlightParams;

    fn name(&self) -> &str {
        "add_highlight"
    }

    fn execute_typed(&self, params: Self::Params, context: &mut ToolContext) -> Result<ToolResult> {
        // A highlight request can arrive before any content request on this
        // page load; index on demand rather than failing.
        if context.session.page_state()?.snapshot().is_none() {
            context.session.refresh_page()?;
        }

        let decorator = CdpDecorator::new(context.session.tab()?);
        let highlighter = Highlighter::new(&decorator);

        let mut state = context.session.page_state()?;
        let matched = highlighter.activate(&mut state, params.index, &params.pattern)?;

        Ok(ToolResult::success_with(json!({
            "matched": matched,
            "index": params.index,
            "type": params.pattern.pattern_type,
        })))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RemoveHighlightParams {
    /// Position of the pattern in the scan result list
    pub index: usize,
}

/// Remove one highlight by index. Removing an inactive index is a no-op.
#[derive(Default)]
pub struct RemoveHighlightTool;

impl Tool for RemoveHighlightTool {
    type Params = RemoveHighlightParams;

    fn name(&self) -> &str {
        "remove_highlight"
    }

    fn execute_typed(&self, params: Self::Params, context: &mut ToolContext) -> Result<ToolResult> {
        let decorator = CdpDecorator::new(context.session.tab()?);
        let highlighter = Highlighter::new(&decorator);

        let mut state = context.session.page_state()?;
        let removed = highlighter.deactivate(&mut state, params.index)?;

        Ok(ToolResult::success_with(json!({
            "removed": removed,
            "index": params.index,
        })))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddAllHighlightsParams {
    /// Patterns to highlight, in scan result order
    pub patterns: Vec<PatternDescriptor>,
}

/// Highlight every pattern from a scan in one pass.
///
/// Existing highlights are cleared first so repeated calls converge on the
/// same decorated state instead of stacking markers.
#[derive(Default)]
pub struct AddAllHighlightsTool;

impl Tool for AddAllHighlightsTool {
    type Params = AddAllHighlightsParams;

    fn name(&self) -> &str {
        "add_all_highlights"
    }

    fn execute_typed(&self, params: Self::Params, context: &mut ToolContext) -> Result<ToolResult> {
        if context.session.page_state()?.snapshot().is_none() {
            context.session.refresh_page()?;
        }

        let decorator = CdpDecorator::new(context.session.tab()?);
        let highlighter = Highlighter::new(&decorator);

        let mut state = context.session.page_state()?;
        let highlighted = highlighter.activate_all(&mut state, &params.patterns)?;

        log::info!("Highlighted {} of {} patterns", highlighted, params.patterns.len());

        Ok(ToolResult::success_with(json!({
            "highlighted": highlighted,
            "total": params.patterns.len(),
        })))
    }
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RemoveAllHighlightsParams {}

/// Remove every highlight marker on the page, tracked or not
#[derive(Default)]
pub struct RemoveAllHighlightsTool;

impl Tool for RemoveAllHighlightsTool {
    type Params = RemoveAllHighlightsParams;

    fn name(&self) -> &str {
        "remove_all_highlights"
    }

    fn execute_typed(&self, _params: Self::Params, context: &mut ToolContext) -> Result<ToolResult> {
        let decorator = CdpDecorator::new(context.session.tab()?);
        let highlighter = Highlighter::new(&decorator);

        let mut state = context.session.page_state()?;
        highlighter.deactivate_all(&mut state)?;

        Ok(ToolResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_highlight_params_deserialize() {
        let params: AddHighlightParams = serde_json::from_value(json!({
            "pattern": {
                "text": "Only 2 left!",
                "type": "Urgency",
                "description": "False scarcity"
            },
            "index": 0
        }))
        .unwrap();

        assert_eq!(params.pattern.pattern_type, "Urgency");
        assert_eq!(params.index, 0);
    }

    #[test]
    fn test_add_all_params_accept_empty_list() {
        let params: AddAllHighlightsParams = serde_json::from_value(json!({"patterns": []})).unwrap();
        assert!(params.patterns.is_empty());
    }

    #[test]
    fn test_remove_params_require_index() {
        assert!(serde_json::from_value::<RemoveHighlightParams>(json!({})).is_err());
        let params: RemoveHighlightParams = serde_json::from_value(json!({"index": 4})).unwrap();
        assert_eq!(params.index, 4);
    }
}
