//! # toc-navigator
//!
//! Drives a browser through the collapsible table of contents of an API
//! documentation portal and returns the documentation of a chosen entry as
//! clean markdown.
//!
//! ## Features
//!
//! - **Expansion paths**: find which collapsed menu groups hide a TOC leaf,
//!   outermost first, from a fresh snapshot of the live tree
//! - **Expansion cache**: remember opened menus for the session and skip them
//! - **Bounded retries**: transient click failures are retried a fixed number
//!   of times before surfacing
//! - **Content extraction**: read the content pane and convert it to markdown
//!   with ATX headings
//! - **Sanitizing**: repair quotes, dashes, entities, invisible characters and
//!   empty markup left behind by the conversion
//!
//! ## Command Line
//!
//! ```bash
//! toc-navigator --url https://developer.example.com/apis/storage --target-text "Create Volume"
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use toc_navigator::{BrowserSession, LaunchOptions, Navigator, NavigatorConfig, TocTarget};
//!
//! # fn main() -> toc_navigator::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! session.navigate("https://developer.example.com/apis/storage")?;
//!
//! let mut navigator = Navigator::new(&session, NavigatorConfig::default())?;
//! if let Some(text) = navigator.open(&TocTarget::by_text("Create Volume"))? {
//!     println!("{}", text);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Anything implementing [`RenderContext`] can stand in for the browser, which
//! is how the navigation loop is tested without Chrome.
//!
//! ## Module Overview
//!
//! - [`browser`]: Chrome session management, the [`RenderContext`] adapter
//! - [`config`]: selectors, timings and retry bounds
//! - [`content`]: content pane extraction, waiting and sanitizing
//! - [`dom`]: TOC snapshots, locators and node roles
//! - [`navigation`]: expansion paths, state cache, retries and the navigator
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod config;
pub mod content;
pub mod dom;
pub mod error;
pub mod navigation;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions};
pub use config::{NavigatorConfig, TocSelectors};
pub use content::{ContentExtractor, ContentSanitizer, ContentWait, Extraction, SanitizeOptions, sanitize, sanitize_document};
pub use dom::{ElementNode, Locator, NodeRole, RenderContext, TocSnapshot};
pub use error::{NavigatorError, Result};
pub use navigation::{
    Expansion, ExpansionPath, ExpansionStateCache, MenuState, Navigator, PathLookup, PathResolver, RetryPolicy,
    RevealOutcome, TocTarget,
};
