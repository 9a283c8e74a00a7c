use crate::{browser::config::{ConnectionOptions, LaunchOptions},
            error::{LensError, Result},
            page::{PageSnapshot, PageState},
            tools::{ToolContext, ToolRegistry}};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr,
          sync::{Arc, Mutex, MutexGuard},
          time::Duration};

/// Browser session that manages a Chrome/Chromium instance and the
/// per-page scan state (text index plus active highlights).
///
/// The scan state is scoped to the current page load: it is rebuilt on every
/// scan request and reset on navigation, so a descriptor can never be matched
/// against the index of a page that is no longer loaded.
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,

    /// Tool registry for executing page tools
    tool_registry: ToolRegistry,

    /// Snapshot, text index and highlight records for the current page load
    page: Mutex<PageState>,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Ignore default arguments to prevent detection by anti-bot services
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // Keep the browser alive while the operator inspects highlights
        // (the headless_chrome default of 30 seconds is far too short)
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| LensError::LaunchFailed(e.to_string()))?;

        browser.new_tab().map_err(|e| LensError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self {
            browser,
            tool_registry: ToolRegistry::with_defaults(),
            page: Mutex::new(PageState::default()),
        })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect(options.ws_url).map_err(|e| LensError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            browser,
            tool_registry: ToolRegistry::with_defaults(),
            page: Mutex::new(PageState::default()),
        })
    }

    /// Launch a browser with default options
    pub fn new() -> Result<Self> {
        Self::launch(LaunchOptions::default())
    }

    /// Get the active tab
    pub fn tab(&self) -> Result<Arc<Tab>> {
        self.get_active_tab()
    }

    /// Get all tabs
    pub fn get_tabs(&self) -> Result<Vec<Arc<Tab>>> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| LensError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
            .clone();

        Ok(tabs)
    }

    /// Get the currently active tab by checking the document visibility and focus state
    pub fn get_active_tab(&self) -> Result<Arc<Tab>> {
        let tabs = self.get_tabs()?;

        // First pass: check for both visibility and focus (strongest signal)
        for tab in &tabs {
            let result = tab.evaluate("document.visibilityState === 'visible' && document.hasFocus()", false);
            match result {
                Ok(remote_object) => {
                    if let Some(value) = remote_object.value {
                        if value.as_bool().unwrap_or(false) {
                            return Ok(tab.clone());
                        }
                    }
                }
                Err(e) => {
                    log::debug!("Failed to check tab status: {}", e);
                    continue;
                }
            }
        }

        // Second pass: check just for visibility (weaker signal, but better than nothing)
        for tab in &tabs {
            let result = tab.evaluate("document.visibilityState === 'visible'", false);
            match result {
                Ok(remote_object) => {
                    if let Some(value) = remote_object.value {
                        if value.as_bool().unwrap_or(false) {
                            return Ok(tab.clone());
                        }
                    }
                }
                Err(_) => continue,
            }
        }

        Err(LensError::TabOperationFailed("No active tab found".to_string()))
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Navigate the active tab to a URL.
    ///
    /// The scan state is reset: any index or highlight records built for the
    /// previous page are invalid once the document is replaced.
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab()?
            .navigate_to(url)
            .map_err(|e| LensError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        self.page_state()?.reset();

        Ok(())
    }

    /// Wait for navigation to complete
    pub fn wait_for_navigation(&self) -> Result<()> {
        self.tab()?
            .wait_until_navigated()
            .map_err(|e| LensError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Lock the per-page scan state
    pub fn page_state(&self) -> Result<MutexGuard<'_, PageState>> {
        self.page
            .lock()
            .map_err(|e| LensError::TabOperationFailed(format!("Page state lock poisoned: {}", e)))
    }

    /// Snapshot the visible text of the current page and rebuild the text
    /// index. Replaces the previous index and drops stale highlight records.
    pub fn refresh_page(&self) -> Result<()> {
        let snapshot = PageSnapshot::from_tab(&self.tab()?)?;
        log::info!("Indexed {} visible elements on {}", snapshot.elements.len(), snapshot.page_url);
        self.page_state()?.install(snapshot);
        Ok(())
    }

    /// Get the tool registry
    pub fn tool_registry(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    /// Execute a tool by name
    pub fn execute_tool(&self, name: &str, params: serde_json::Value) -> Result<crate::tools::ToolResult> {
        let mut context = ToolContext::new(self);
        self.tool_registry.execute(name, params, &mut context)
    }

    /// Close the browser
    pub fn close(&self) -> Result<()> {
        // headless_chrome has no public close method; closing every tab
        // effectively shuts the instance down, the rest happens on drop
        let tabs = self.get_tabs()?;
        for tab in tabs {
            let _ = tab.close(false); // Ignore errors on individual tab closes
        }
        Ok(())
    }
}
