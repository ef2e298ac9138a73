//! Navigator configuration: TOC selectors, timings and retry bounds.
//!
//! Every field has a default matching the documentation portal this crate
//! was built against, so an empty JSON object is a valid configuration.

use crate::dom::Locator;
use crate::error::{NavigatorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Selectors describing the TOC markup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TocSelectors {
    /// CSS selector of the element wrapping the whole tree
    pub container: String,

    /// Tree item nodes; items with an `id` are leaves, items without are menu groups
    pub tree_item: String,

    /// Affordance rendered on a closed menu group (right-pointing chevron)
    pub collapsed_indicator: String,

    /// Element holding a menu group's display label
    pub menu_label: String,

    /// CSS selector of the content pane filled in after a leaf is opened
    pub content: String,
}

impl Default for TocSelectors {
    fn default() -> Self {
        Self {
            container: "div.filter-api-sidebar-wrapper".to_string(),
            tree_item: "li.toc-item-highlight".to_string(),
            collapsed_indicator: "i.dds__icon--chevron-right".to_string(),
            menu_label: "div.align-middle.dds__text-truncate".to_string(),
            content: "#documentation".to_string(),
        }
    }
}

impl TocSelectors {
    /// Selector syntax is checked by the page itself; only blanks are rejected here
    fn validate(&self) -> Result<()> {
        let fields = [
            ("container", &self.container),
            ("tree_item", &self.tree_item),
            ("collapsed_indicator", &self.collapsed_indicator),
            ("menu_label", &self.menu_label),
            ("content", &self.content),
        ];
        for (name, selector) in fields {
            if selector.trim().is_empty() {
                return Err(NavigatorError::InvalidConfig(format!("selector '{}' must not be empty", name)));
            }
        }
        Ok(())
    }

    /// Locator of the content pane
    pub fn content_locator(&self) -> Locator {
        Locator::css(self.content.clone())
    }
}

/// Navigator settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavigatorConfig {
    pub selectors: TocSelectors,

    /// Attempts per click before giving up
    pub max_attempts: u32,

    /// Pause between two attempts of the same click
    pub retry_delay_ms: u64,

    /// Pause after each successful menu expansion
    pub expand_delay_ms: u64,

    /// Pause after clicking the target leaf
    pub post_click_delay_ms: u64,

    /// How long to wait for the content pane to fill in
    pub content_wait_timeout_ms: u64,

    /// Polling interval of the content wait
    pub content_poll_interval_ms: u64,

    /// Minimum inner markup length (trimmed) for content to count as loaded
    pub min_content_length: usize,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            selectors: TocSelectors::default(),
            max_attempts: 3,
            retry_delay_ms: 0,
            expand_delay_ms: 500,
            post_click_delay_ms: 700,
            content_wait_timeout_ms: 15_000,
            content_poll_interval_ms: 250,
            min_content_length: 100,
        }
    }
}

impl NavigatorConfig {
    /// Create a new NavigatorConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| NavigatorError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    /// Parse and validate a JSON configuration string
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| NavigatorError::InvalidConfig(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check bounds and selectors
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(NavigatorError::InvalidConfig("max_attempts must be at least 1".to_string()));
        }
        if self.content_poll_interval_ms == 0 {
            return Err(NavigatorError::InvalidConfig(
                "content_poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        self.selectors.validate()
    }

    /// Builder method: set the selectors
    pub fn selectors(mut self, selectors: TocSelectors) -> Self {
        self.selectors = selectors;
        self
    }

    /// Builder method: set the attempts per click
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Builder method: disable every pause (useful against in-memory pages)
    pub fn without_delays(mut self) -> Self {
        self.retry_delay_ms = 0;
        self.expand_delay_ms = 0;
        self.post_click_delay_ms = 0;
        self
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn expand_delay(&self) -> Duration {
        Duration::from_millis(self.expand_delay_ms)
    }

    pub fn post_click_delay(&self) -> Duration {
        Duration::from_millis(self.post_click_delay_ms)
    }

    pub fn content_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.content_wait_timeout_ms)
    }

    pub fn content_poll_interval(&self) -> Duration {
        Duration::from_millis(self.content_poll_interval_ms)
    }
}
