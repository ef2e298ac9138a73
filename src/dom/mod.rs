//! Live-page access and the TOC snapshot model
//!
//! This module provides what the navigator knows about the rendered page:
//! - RenderContext: blocking capability surface of a rendering client
//! - Locator: identifier / CSS / structural addressing of elements
//! - ElementNode and TocSnapshot: data-only capture of the TOC subtree, with
//!   each node's selector matches recorded as a NodeRole

pub mod context;
pub mod element;
pub mod locator;
pub mod tree;

pub use context::RenderContext;
pub use element::{ElementNode, NodeRole};
pub use locator::Locator;
pub use tree::{NodeRef, TocSnapshot};
