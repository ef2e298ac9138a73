use crate::{browser::config::{ConnectionOptions, LaunchOptions},
            dom::{Locator, RenderContext},
            error::{NavigatorError, Result}};
use headless_chrome::{Browser, Tab};
use serde_json::Value;
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Browser session bound to the tab that shows the documentation site
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,

    /// Tab every page interaction goes through
    tab: Arc<Tab>,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Documentation portals tend to block obvious automation
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // Long crawls sit idle between targets; the default timeout is 30 seconds
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.path = options.chrome_path;
        launch_opts.user_data_dir = options.user_data_dir;
        launch_opts.sandbox = options.sandbox;

        log::debug!("Launching browser (headless: {})", options.headless);
        let browser = Browser::new(launch_opts).map_err(|e| NavigatorError::LaunchFailed(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| NavigatorError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser, tab })
    }

    /// Connect to an existing browser instance via WebSocket.
    ///
    /// The visible, focused tab is used when there is one; otherwise a new
    /// tab is opened.
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect_with_timeout(options.ws_url, Duration::from_millis(options.timeout))
            .map_err(|e| NavigatorError::ConnectionFailed(e.to_string()))?;

        let tab = match find_active_tab(&browser) {
            Some(tab) => tab,
            None => browser
                .new_tab()
                .map_err(|e| NavigatorError::TabOperationFailed(format!("Failed to create tab: {}", e)))?,
        };

        Ok(Self { browser, tab })
    }

    /// Launch a browser with default options
    pub fn new() -> Result<Self> {
        Self::launch(LaunchOptions::default())
    }

    /// The tab this session drives
    pub fn tab(&self) -> Arc<Tab> {
        self.tab.clone()
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Navigate to a URL and wait for the load to finish
    pub fn navigate(&self, url: &str) -> Result<()> {
        let url = normalize_url(url);
        log::debug!("Navigating to {}", url);

        self.tab
            .navigate_to(&url)
            .map_err(|e| NavigatorError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;
        self.wait_for_navigation()
    }

    /// Wait for navigation to complete
    pub fn wait_for_navigation(&self) -> Result<()> {
        self.tab
            .wait_until_navigated()
            .map_err(|e| NavigatorError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Block until an element matching `css_selector` is present
    pub fn wait_for_element(&self, css_selector: &str, timeout: Duration) -> Result<()> {
        self.tab
            .wait_for_element_with_custom_timeout(css_selector, timeout)
            .map_err(|e| NavigatorError::ElementNotFound(format!("Element '{}' not found: {}", css_selector, e)))?;

        Ok(())
    }

    /// Close every tab; the browser process exits when the session is dropped
    pub fn close(&self) -> Result<()> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| NavigatorError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
            .clone();

        for tab in tabs {
            let _ = tab.close(false);
        }
        Ok(())
    }

    fn find_element(&self, locator: &Locator) -> Result<headless_chrome::Element<'_>> {
        let found = match locator {
            Locator::Id(id) => self.tab.find_element(&format!("[id=\"{}\"]", escape_css_string(id))),
            Locator::Css(selector) => self.tab.find_element(selector),
            Locator::XPath(path) => self.tab.find_element_by_xpath(path),
        };

        found.map_err(|e| NavigatorError::ElementNotFound(format!("Element '{}' not found: {}", locator, e)))
    }

    fn leaf_anchor(&self, locator: &Locator) -> Option<headless_chrome::Element<'_>> {
        let Locator::Id(id) = locator else {
            return None;
        };
        self.tab
            .find_element(&format!("[id=\"{}\"] a", escape_css_string(id)))
            .ok()
    }

    fn script_click(&self, locator: &Locator) -> Result<()> {
        match self.evaluate(&locator.to_js_call(script_click_body(locator), "false"))? {
            Value::Bool(true) => Ok(()),
            other => Err(NavigatorError::EvaluationFailed(format!(
                "Script click on {} returned {}",
                locator, other
            ))),
        }
    }
}

impl RenderContext for BrowserSession {
    fn evaluate(&self, script: &str) -> Result<Value> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| NavigatorError::EvaluationFailed(e.to_string()))?;

        Ok(result.value.unwrap_or(Value::Null))
    }

    fn inner_html(&self, locator: &Locator) -> Result<Option<String>> {
        let js_code = locator.to_js_call("return el.innerHTML;", "null");

        match self.evaluate(&js_code)? {
            Value::String(markup) => Ok(Some(markup)),
            Value::Null => Ok(None),
            other => Err(NavigatorError::EvaluationFailed(format!(
                "Unexpected innerHTML of {}: {}",
                locator, other
            ))),
        }
    }

    fn is_visible(&self, locator: &Locator) -> Result<bool> {
        let js_code = locator.to_js_call("return el.offsetParent !== null;", "false");

        match self.evaluate(&js_code)? {
            Value::Bool(visible) => Ok(visible),
            other => Err(NavigatorError::EvaluationFailed(format!(
                "Unexpected visibility of {}: {}",
                locator, other
            ))),
        }
    }

    /// Mouse click at the element's midpoint, falling back to a script click
    /// when the element has no usable layout box.
    ///
    /// TOC leaves addressed by id are clicked through their inner anchor when
    /// they have one.
    fn click(&self, locator: &Locator) -> Result<()> {
        let element = match self.leaf_anchor(locator) {
            Some(anchor) => anchor,
            None => self.find_element(locator)?,
        };

        match element.scroll_into_view().and_then(|element| element.click()) {
            Ok(_) => Ok(()),
            Err(e) => {
                log::debug!("Mouse click on {} failed ({}); clicking through script", locator, e);
                self.script_click(locator).map_err(|script_err| {
                    NavigatorError::interaction(format!("click {}", locator), format!("{}; {}", e, script_err))
                })
            }
        }
    }
}

fn script_click_body(locator: &Locator) -> &'static str {
    match locator {
        Locator::Id(_) => "(el.querySelector('a') || el).click(); return true;",
        _ => "el.click(); return true;",
    }
}

/// Visible and focused first, then merely visible
fn find_active_tab(browser: &Browser) -> Option<Arc<Tab>> {
    let tabs = match browser.get_tabs().lock() {
        Ok(tabs) => tabs.clone(),
        Err(e) => {
            log::debug!("Failed to get tabs: {}", e);
            return None;
        }
    };

    let checks = [
        "document.visibilityState === 'visible' && document.hasFocus()",
        "document.visibilityState === 'visible'",
    ];

    for check in checks {
        for tab in &tabs {
            match tab.evaluate(check, false) {
                Ok(remote_object) => {
                    if remote_object.value.and_then(|v| v.as_bool()).unwrap_or(false) {
                        return Some(tab.clone());
                    }
                }
                Err(e) => log::debug!("Failed to check tab status: {}", e),
            }
        }
    }

    tabs.into_iter().next()
}

fn escape_css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Add a scheme to a bare host or path typed on the command line
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();

    let has_scheme = ["http://", "https://", "file://", "data:", "about:", "chrome://"]
        .iter()
        .any(|scheme| trimmed.starts_with(scheme));
    if has_scheme {
        return trimmed.to_string();
    }

    if trimmed.starts_with("localhost") || trimmed.starts_with("127.0.0.1") {
        return format!("http://{}", trimmed);
    }

    format!("https://{}", trimmed)
}
