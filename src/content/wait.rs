use crate::config::NavigatorConfig;
use crate::dom::{Locator, RenderContext};
use regex::Regex;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Phrases that mark a content pane still being filled
pub const LOADING_INDICATORS: [&str; 5] = ["loading", "please wait", "processing", "fetching", "retrieving"];

/// Polls the content pane until it holds settled content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentWait {
    timeout: Duration,
    poll_interval: Duration,
    min_length: usize,
}

impl Default for ContentWait {
    fn default() -> Self {
        Self::from_config(&NavigatorConfig::default())
    }
}

impl ContentWait {
    pub fn new(timeout: Duration, poll_interval: Duration, min_length: usize) -> Self {
        Self {
            timeout,
            poll_interval,
            min_length,
        }
    }

    pub fn from_config(config: &NavigatorConfig) -> Self {
        Self::new(
            config.content_wait_timeout(),
            config.content_poll_interval(),
            config.min_content_length,
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether `markup` looks like finished content
    pub fn is_ready(&self, markup: &str) -> bool {
        let markup = markup.trim();
        if markup.len() < self.min_length {
            return false;
        }

        let text = TAG_RE.replace_all(markup, " ").to_lowercase();
        !LOADING_INDICATORS.iter().any(|indicator| text.contains(indicator))
    }

    /// Block until the element behind `locator` is ready or the timeout passes.
    ///
    /// Returns whether the content settled. A timeout is logged and reported
    /// as `false`, never as an error.
    pub fn wait<C: RenderContext + ?Sized>(&self, ctx: &C, locator: &Locator) -> bool {
        log::debug!("Waiting up to {:?} for content in {}", self.timeout, locator);
        let started = Instant::now();

        loop {
            match ctx.inner_html(locator) {
                Ok(Some(markup)) if self.is_ready(&markup) => {
                    log::debug!("Content in {} ready after {:?}", locator, started.elapsed());
                    return true;
                }
                Ok(_) => {}
                Err(e) => log::debug!("Content ready check failed: {}", e),
            }

            let elapsed = started.elapsed();
            if elapsed >= self.timeout {
                log::warn!("Content in {} did not settle within {:?}", locator, self.timeout);
                return false;
            }

            let remaining = self.timeout - elapsed;
            std::thread::sleep(self.poll_interval.min(remaining));
        }
    }
}
