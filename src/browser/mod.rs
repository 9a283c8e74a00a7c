//! Browser session management
//!
//! Launch or connect to a Chrome/Chromium instance over the Chrome DevTools
//! Protocol and manage the per-page scan state.

pub mod config;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use session::BrowserSession;
