use crate::config::NavigatorConfig;
use crate::content::{ContentExtractor, ContentWait, SanitizeOptions, sanitize_document};
use crate::dom::{Locator, RenderContext};
use crate::error::Result;
use crate::navigation::resolver::{Expansion, PathLookup, PathResolver, UNKNOWN_MENU};
use crate::navigation::retry::RetryPolicy;
use crate::navigation::state::{ExpansionStateCache, MenuState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A TOC leaf to open, by identifier, by visible text, or both
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TocTarget {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub text: Option<String>,
}

impl TocTarget {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            text: Some(text.into()),
        }
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            text: None,
        }
    }

    pub fn by_text(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: Some(text.into()),
        }
    }

    fn id_str(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    fn text_str(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

impl fmt::Display for TocTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.id, &self.text) {
            (Some(id), Some(text)) => write!(f, "{} ({})", text, id),
            (Some(id), None) => write!(f, "#{}", id),
            (None, Some(text)) => write!(f, "'{}'", text),
            (None, None) => write!(f, "<empty target>"),
        }
    }
}

/// What [`Navigator::reveal`] had to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    NotFound,

    AlreadyVisible {
        target: Locator,
    },

    Revealed {
        target: Locator,
        /// Menu labels clicked, in click order
        expanded: Vec<String>,
        /// Menu labels skipped because the cache reported them open
        skipped: Vec<String>,
    },
}

impl RevealOutcome {
    /// Locator of the revealed leaf, `None` when it was not found
    pub fn target(&self) -> Option<&Locator> {
        match self {
            RevealOutcome::NotFound => None,
            RevealOutcome::AlreadyVisible { target } | RevealOutcome::Revealed { target, .. } => Some(target),
        }
    }
}

/// Drives one browsing session through the TOC: open the menus hiding a
/// leaf, click it, then read and clean its content.
///
/// Owns the expansion cache for the session. Call [`reset`](Self::reset)
/// whenever the page is reloaded.
pub struct Navigator<C: RenderContext> {
    ctx: C,
    config: NavigatorConfig,
    resolver: PathResolver,
    cache: ExpansionStateCache,
    retry: RetryPolicy,
    extractor: ContentExtractor,
    wait: ContentWait,
    sanitize_options: SanitizeOptions,
}

impl<C: RenderContext> Navigator<C> {
    pub fn new(ctx: C, config: NavigatorConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            resolver: PathResolver::new(&config.selectors),
            retry: RetryPolicy::new(config.max_attempts).with_delay(config.retry_delay()),
            extractor: ContentExtractor::new(config.selectors.content_locator()),
            wait: ContentWait::from_config(&config),
            cache: ExpansionStateCache::new(),
            sanitize_options: SanitizeOptions::default(),
            config,
            ctx,
        })
    }

    /// Builder method: layout passes applied by [`open`](Self::open)
    pub fn sanitize_options(mut self, options: SanitizeOptions) -> Self {
        self.sanitize_options = options;
        self
    }

    pub fn context(&self) -> &C {
        &self.ctx
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn cache(&self) -> &ExpansionStateCache {
        &self.cache
    }

    /// Forget every cached menu state
    pub fn reset(&mut self) {
        self.cache.clear();
    }

    /// Compute the expansion path of `target` against the live TOC
    pub fn find_expansion_path(&self, target: &TocTarget) -> PathLookup {
        self.resolver
            .find_expansion_path(&self.ctx, target.id_str(), target.text_str())
    }

    /// Open every collapsed menu between the TOC root and `target`.
    ///
    /// Menus the cache believes open are skipped. The cache was stale when,
    /// after a skip, the next menu's indicator or the target itself is still
    /// hidden: the skipped menus are then forgotten, the path is computed
    /// again and every menu on it is clicked.
    pub fn reveal(&mut self, target: &TocTarget) -> Result<RevealOutcome> {
        let (leaf, expansions) = match self.find_expansion_path(target) {
            PathLookup::NotFound => {
                log::warn!("TOC item {} not found", target);
                return Ok(RevealOutcome::NotFound);
            }
            PathLookup::AlreadyVisible { target: leaf } => {
                log::debug!("TOC item {} already visible", target);
                return Ok(RevealOutcome::AlreadyVisible { target: leaf });
            }
            PathLookup::Hidden { target: leaf, expansions } => (leaf, expansions),
        };

        let mut expanded = Vec::new();
        let mut skipped = Vec::new();
        let mut stale = false;

        for expansion in &expansions {
            if expansion.menu_text != UNKNOWN_MENU && self.cache.is_expanded(&expansion.menu_text) {
                log::debug!("Menu '{}' cached as expanded, skipping", expansion.menu_text);
                skipped.push(expansion.menu_text.clone());
                continue;
            }
            if !skipped.is_empty() && !self.is_visible(&expansion.locator) {
                log::warn!(
                    "Menu '{}' is hidden although {:?} were cached as expanded",
                    expansion.menu_text,
                    skipped
                );
                stale = true;
                break;
            }
            self.expand(expansion)?;
            expanded.push(expansion.menu_text.clone());
        }

        if stale || (!skipped.is_empty() && !self.is_visible(&leaf)) {
            log::warn!("Cached menus {:?} were stale for TOC item {}; re-expanding", skipped, target);
            for label in &skipped {
                self.cache.forget(label);
            }

            let retry_lookup = self.find_expansion_path(target);
            for expansion in retry_lookup.expansions() {
                self.expand(expansion)?;
                expanded.push(expansion.menu_text.clone());
            }
            skipped.retain(|label| !expanded.contains(label));
        }

        Ok(RevealOutcome::Revealed {
            target: leaf,
            expanded,
            skipped,
        })
    }

    /// Reveal and click `target`, wait for the content pane and return its
    /// unsanitized markdown.
    ///
    /// `Ok(None)` when the target or its content is missing; `Err` only when
    /// a click keeps failing.
    pub fn open_raw(&mut self, target: &TocTarget) -> Result<Option<String>> {
        let leaf = match self.reveal(target)? {
            RevealOutcome::NotFound => return Ok(None),
            RevealOutcome::AlreadyVisible { target } | RevealOutcome::Revealed { target, .. } => target,
        };

        let ctx = &self.ctx;
        self.retry
            .execute(&format!("click TOC item {}", target), |_| ctx.click(&leaf))?;
        pause(self.config.post_click_delay());

        self.wait.wait(&self.ctx, self.extractor.locator());
        Ok(self.extractor.extract(&self.ctx))
    }

    /// Like [`open_raw`](Self::open_raw), with the text sanitized
    pub fn open(&mut self, target: &TocTarget) -> Result<Option<String>> {
        let Some(raw) = self.open_raw(target)? else {
            return Ok(None);
        };

        let text = sanitize_document(&raw, &self.sanitize_options);
        if text.is_empty() {
            log::warn!("Content of {} is empty after sanitizing", target);
            return Ok(None);
        }
        Ok(Some(text))
    }

    fn expand(&mut self, expansion: &Expansion) -> Result<()> {
        log::debug!("Expanding menu '{}' via {}", expansion.menu_text, expansion.locator);

        let ctx = &self.ctx;
        self.retry
            .execute(&format!("expand menu '{}'", expansion.menu_text), |_| ctx.click(&expansion.locator))?;

        if expansion.menu_text != UNKNOWN_MENU {
            self.cache.cache_state(expansion.menu_text.clone(), MenuState::Expanded);
        }
        pause(self.config.expand_delay());
        Ok(())
    }

    fn is_visible(&self, locator: &Locator) -> bool {
        self.ctx.is_visible(locator).unwrap_or_else(|e| {
            log::debug!("Visibility check for {} failed: {}", locator, e);
            false
        })
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        std::thread::sleep(duration);
    }
}
