use serde::{Deserialize, Serialize};
use std::fmt;

/// Information needed to find an element again in the live page.
///
/// Element handles do not survive re-renders of the TOC, so every interaction
/// goes through a locator that is resolved at the moment it is used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Locator {
    /// `id` attribute of the element
    Id(String),

    /// CSS selector, first match wins
    Css(String),

    /// Positional path from the document root (e.g. `/html[1]/body[1]/div[2]`)
    #[serde(rename = "xpath")]
    XPath(String),
}

impl Locator {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn xpath(path: impl Into<String>) -> Self {
        Self::XPath(path.into())
    }

    /// JavaScript expression evaluating to the element or `null`
    pub fn to_js_lookup(&self) -> String {
        match self {
            Locator::Id(id) => format!("document.getElementById({})", js_string(id)),
            Locator::Css(selector) => format!("document.querySelector({})", js_string(selector)),
            Locator::XPath(path) => format!(
                "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
                js_string(path)
            ),
        }
    }

    /// Wrap a JavaScript function body that receives the element as `el`.
    ///
    /// The body runs only when the element exists; otherwise the expression
    /// evaluates to `missing`.
    pub fn to_js_call(&self, body: &str, missing: &str) -> String {
        format!(
            "(function() {{ const el = {}; if (el === null || el === undefined) {{ return {}; }} {} }})()",
            self.to_js_lookup(),
            missing,
            body
        )
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "id={}", id),
            Locator::Css(selector) => write!(f, "css={}", selector),
            Locator::XPath(path) => write!(f, "xpath={}", path),
        }
    }
}

/// Quote a Rust string as a JavaScript string literal
fn js_string(value: &str) -> String {
    // A JSON string is a valid JS string literal
    serde_json::Value::String(value.to_string()).to_string()
}
