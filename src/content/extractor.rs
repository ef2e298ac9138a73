use crate::dom::{Locator, RenderContext};
use crate::error::{NavigatorError, Result};
use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static SETEXT_H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(\S[^\n]*?)[ \t]*\n=+[ \t]*$").unwrap());
static SETEXT_H2_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*([^\s|\-][^\n]*?)[ \t]*\n-+[ \t]*$").unwrap());

/// Outcome of reading the content pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Converted, trimmed text
    Content(String),

    /// The content element is not in the page
    NotFound,

    /// The element exists but its markup, or the converted text, is blank
    Empty,

    /// Anything else went wrong; the detail has already been logged
    Unexpected(String),
}

impl Extraction {
    /// Collapse to the caller-facing outcome: text or nothing
    pub fn into_text(self) -> Option<String> {
        match self {
            Extraction::Content(text) => Some(text),
            _ => None,
        }
    }
}

/// Reads the revealed content pane and converts it to markdown
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    locator: Locator,
}

impl ContentExtractor {
    pub fn new(locator: Locator) -> Self {
        Self { locator }
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Extract the content as text.
    ///
    /// A missing element, blank markup and a conversion that produces nothing
    /// all come back as `None`; use [`extract_detailed`](Self::extract_detailed)
    /// to tell them apart.
    pub fn extract<C: RenderContext + ?Sized>(&self, ctx: &C) -> Option<String> {
        self.extract_detailed(ctx).into_text()
    }

    /// Extract the content, keeping the reason when there is none.
    ///
    /// Never fails: every error is logged and folded into the outcome.
    pub fn extract_detailed<C: RenderContext + ?Sized>(&self, ctx: &C) -> Extraction {
        log::debug!("Extracting content from {}", self.locator);

        let markup = match ctx.inner_html(&self.locator) {
            Ok(Some(markup)) => markup,
            Ok(None) => {
                log::error!("Content element ({}) not found", self.locator);
                return Extraction::NotFound;
            }
            Err(e) => {
                log::error!("Unexpected error reading content element ({}): {}", self.locator, e);
                return Extraction::Unexpected(e.to_string());
            }
        };

        if markup.trim().is_empty() {
            log::warn!("Content element ({}) was found but is empty", self.locator);
            return Extraction::Empty;
        }

        match convert_markup(&markup) {
            Ok(text) if text.trim().is_empty() => {
                log::warn!("Content of {} converted to empty text", self.locator);
                Extraction::Empty
            }
            Ok(text) => Extraction::Content(text.trim().to_string()),
            Err(e) => {
                log::error!("Unexpected error converting content of {}: {}", self.locator, e);
                Extraction::Unexpected(e.to_string())
            }
        }
    }
}

/// Convert HTML markup to markdown with ATX (`#`) headings.
///
/// `<script>` and `<style>` blocks are dropped before conversion.
pub fn convert_markup(markup: &str) -> Result<String> {
    let without_scripts = SCRIPT_RE.replace_all(markup, "");
    let cleaned = STYLE_RE.replace_all(&without_scripts, "").into_owned();

    let markdown = std::panic::catch_unwind(|| html2md::parse_html(&cleaned)).map_err(|panic| {
        let reason = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "converter panicked".to_string());
        NavigatorError::ConversionFailed(reason)
    })?;

    Ok(atx_headings(&markdown))
}

/// Rewrite underlined (setext) headings as `#`/`##` headings
fn atx_headings(markdown: &str) -> String {
    let markdown = SETEXT_H1_RE.replace_all(markdown, "# ${1}");
    SETEXT_H2_RE.replace_all(&markdown, "## ${1}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pane(Result<Option<String>>);

    impl RenderContext for Pane {
        fn evaluate(&self, _script: &str) -> Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }

        fn inner_html(&self, _locator: &Locator) -> Result<Option<String>> {
            match &self.0 {
                Ok(markup) => Ok(markup.clone()),
                Err(e) => Err(NavigatorError::EvaluationFailed(e.to_string())),
            }
        }

        fn is_visible(&self, _locator: &Locator) -> Result<bool> {
            Ok(true)
        }

        fn click(&self, _locator: &Locator) -> Result<()> {
            Ok(())
        }
    }

    fn extractor() -> ContentExtractor {
        ContentExtractor::new(Locator::css("#documentation"))
    }

    #[test]
    fn test_extracts_atx_headings() {
        let pane = Pane(Ok(Some("<h2>Create Volume</h2><p>Creates a <b>new</b> volume.</p>".to_string())));
        let text = extractor().extract(&pane).unwrap();

        assert!(text.starts_with("## Create Volume"), "unexpected output: {}", text);
        assert!(text.contains("Creates a"));
        assert!(text.contains("volume."));
    }

    #[test]
    fn test_missing_element() {
        let pane = Pane(Ok(None));
        assert_eq!(extractor().extract_detailed(&pane), Extraction::NotFound);
        assert_eq!(extractor().extract(&pane), None);
    }

    #[test]
    fn test_empty_markup() {
        let pane = Pane(Ok(Some(String::new())));
        assert_eq!(extractor().extract_detailed(&pane), Extraction::Empty);
        assert_eq!(extractor().extract(&pane), None);
    }

    #[test]
    fn test_whitespace_markup() {
        let pane = Pane(Ok(Some("  \n\t ".to_string())));
        assert_eq!(extractor().extract_detailed(&pane), Extraction::Empty);
    }

    #[test]
    fn test_markup_without_text() {
        let pane = Pane(Ok(Some("<script>track()</script><style>p {}</style>".to_string())));
        assert_eq!(extractor().extract_detailed(&pane), Extraction::Empty);
    }

    #[test]
    fn test_read_failure_is_downgraded() {
        let pane = Pane(Err(NavigatorError::EvaluationFailed("target closed".to_string())));
        let outcome = extractor().extract_detailed(&pane);

        assert!(matches!(outcome, Extraction::Unexpected(ref detail) if detail.contains("target closed")));
        assert_eq!(outcome.into_text(), None);
    }

    #[test]
    fn test_setext_headings_become_atx() {
        let markdown = atx_headings("Volumes\n=======\n\nCreate Volume\n-------------\n\n### Request\n\ntext\n\n---\n");
        assert_eq!(markdown, "# Volumes\n\n## Create Volume\n\n### Request\n\ntext\n\n---\n");
    }

    #[test]
    fn test_convert_markup_drops_scripts() {
        let text = convert_markup("<p>Keep</p><SCRIPT type=\"x\">\nalert(1)\n</SCRIPT><style>.a{}</style>").unwrap();
        assert!(text.contains("Keep"));
        assert!(!text.contains("alert"));
        assert!(!text.contains(".a{}"));
    }
}
