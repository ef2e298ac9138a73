use crate::dom::locator::Locator;
use crate::error::Result;

/// Capability surface the navigator needs from a rendering client.
///
/// Every call is blocking and talks to a live page whose state can change
/// between calls, so nothing here returns long-lived element handles: callers
/// pass a [`Locator`] and the implementation resolves it on the spot.
pub trait RenderContext {
    /// Evaluate a JavaScript expression in the page and return its value.
    ///
    /// Structural queries (TOC snapshots, locator computation) run entirely
    /// inside the page through this method and come back as plain data.
    fn evaluate(&self, script: &str) -> Result<serde_json::Value>;

    /// Inner markup of the located element, `None` when the element is absent
    fn inner_html(&self, locator: &Locator) -> Result<Option<String>>;

    /// Whether the located element is rendered visibly; `false` when absent
    fn is_visible(&self, locator: &Locator) -> Result<bool>;

    /// Click/activate the located element
    fn click(&self, locator: &Locator) -> Result<()>;
}

impl<T: RenderContext + ?Sized> RenderContext for &T {
    fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        (**self).evaluate(script)
    }

    fn inner_html(&self, locator: &Locator) -> Result<Option<String>> {
        (**self).inner_html(locator)
    }

    fn is_visible(&self, locator: &Locator) -> Result<bool> {
        (**self).is_visible(locator)
    }

    fn click(&self, locator: &Locator) -> Result<()> {
        (**self).click(locator)
    }
}
