//! # darklens
//!
//! A Rust library that scans live web pages for dark patterns and highlights
//! them in place, driving Chrome/Chromium via the Chrome DevTools Protocol (CDP).
//!
//! ## Features
//!
//! - **Page Scanning**: Extract the visible text of a page and classify it with
//!   the Gemini API to detect dark patterns (urgency, misdirection, sneaking, ...)
//! - **Element Matching**: A six-tier cascade resolves each detected pattern's
//!   quoted text back to the concrete page element it came from
//! - **In-Page Highlighting**: Matched elements get an injected outline and a
//!   hover tooltip explaining the pattern; highlights can be toggled one at a
//!   time or all at once
//! - **MCP Server**: Model Context Protocol server exposing the scan and
//!   highlight tools to AI agents
//!
//! ## MCP Server
//!
//! ```bash
//! # Run with a headless browser
//! GEMINI_API_KEY=... cargo run --bin mcp-server
//!
//! # Run with a visible browser (useful for inspecting highlights)
//! GEMINI_API_KEY=... cargo run --bin mcp-server -- --headed
//! ```
//!
//! ## Library Usage
//!
//! ### Scan and highlight
//!
//! ```rust,no_run
//! use darklens::{BrowserSession, GeminiClassifier, LaunchOptions};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> darklens::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! let classifier = GeminiClassifier::from_env()?;
//!
//! session.navigate("https://shop.example.com")?;
//! session.wait_for_navigation()?;
//!
//! let report = darklens::scan_page(&session, &classifier).await?;
//! println!("Found {} dark patterns", report.patterns.len());
//!
//! // Highlight everything the scan found
//! session.execute_tool("add_all_highlights", json!({"patterns": report.patterns}))?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Using the tool system directly
//!
//! ```rust,no_run
//! use darklens::{BrowserSession, LaunchOptions};
//! use darklens::tools::{ToolContext, ToolRegistry};
//! use serde_json::json;
//!
//! # fn main() -> darklens::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! let registry = ToolRegistry::with_defaults();
//! let mut context = ToolContext::new(&session);
//!
//! registry.execute("navigate", json!({"url": "https://example.com"}), &mut context)?;
//! let content = registry.execute("get_page_content", json!({}), &mut context)?;
//! # let _ = content;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Browser session management and configuration
//! - [`page`]: Visible-text snapshots and the text index built from them
//! - [`locator`]: Pattern descriptors and the element-matching cascade
//! - [`highlight`]: Highlight lifecycle and in-page decoration
//! - [`classify`]: Gemini-backed dark-pattern classification
//! - [`tools`]: Page tools (navigate, get content, add/remove highlights)
//! - [`scan`]: One-call scan orchestration
//! - [`error`]: Error types and result aliases
//! - [`mcp`]: Model Context Protocol server (requires `mcp-handler` feature)

pub mod browser;
pub mod classify;
pub mod error;
pub mod highlight;
pub mod locator;
pub mod page;
pub mod scan;
pub mod tools;

#[cfg(feature = "mcp-handler")]
pub mod mcp;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions};
pub use classify::GeminiClassifier;
pub use error::{LensError, Result};
pub use highlight::{Decorator, HighlightRecord, HighlightSet, Highlighter};
pub use locator::{locate, Match, MatchTier, PatternDescriptor};
pub use page::{PageSnapshot, PageState, TextIndex, VisibleElement};
pub use scan::{scan_page, ScanReport};
pub use tools::{Tool, ToolContext, ToolRegistry, ToolResult};

#[cfg(feature = "mcp-handler")]
pub use mcp::LensServer;
#[cfg(feature = "mcp-handler")]
pub use rmcp::ServiceExt;
