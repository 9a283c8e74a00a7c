//! MCP server handler holding the browser session and classifier

use crate::browser::{BrowserSession, LaunchOptions};
use crate::classify::GeminiClassifier;
use crate::error::{LensError, Result as LensResult};
use rmcp::{
    handler::server::router::tool::ToolRouter,
    model::{ServerCapabilities, ServerInfo},
    tool_handler, ServerHandler,
};
use std::sync::Arc;

/// MCP server exposing the scan and highlight tools.
///
/// Owns one browser session for its lifetime. The classifier is optional:
/// without an API key the navigation, content and highlight tools still work,
/// only the scan tool reports the missing credential.
pub struct LensServer {
    session: Arc<BrowserSession>,
    classifier: Option<Arc<GeminiClassifier>>,
    tool_router: ToolRouter<LensServer>,
}

impl LensServer {
    /// Create a server, launching a browser with the given options.
    ///
    /// The classifier is picked up from the environment; a missing key is
    /// logged and deferred to scan time rather than failing startup.
    pub fn with_options(options: LaunchOptions) -> LensResult<Self> {
        let session = Arc::new(BrowserSession::launch(options)?);

        let classifier = match GeminiClassifier::from_env() {
            Ok(classifier) => Some(Arc::new(classifier)),
            Err(e) => {
                log::warn!("Scan tool disabled: {}", e);
                None
            }
        };

        Ok(Self {
            session,
            classifier,
            tool_router: Self::tool_router(),
        })
    }

    /// Create a server with an explicit classifier
    pub fn with_classifier(options: LaunchOptions, classifier: GeminiClassifier) -> LensResult<Self> {
        let session = Arc::new(BrowserSession::launch(options)?);

        Ok(Self {
            session,
            classifier: Some(Arc::new(classifier)),
            tool_router: Self::tool_router(),
        })
    }

    /// Get the browser session
    pub fn session(&self) -> Arc<BrowserSession> {
        self.session.clone()
    }

    /// Get the classifier, or the error a scan should report without one
    pub fn classifier(&self) -> LensResult<&GeminiClassifier> {
        self.classifier.as_deref().ok_or(LensError::MissingApiKey)
    }
}

#[tool_handler]
impl ServerHandler for LensServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Dark-pattern scanner. Navigate to a page with lens_navigate, then \
                 lens_scan_page to detect dark patterns in its visible text. Use the \
                 highlight tools to mark detected patterns on the page by their scan index."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
