use crate::config::TocSelectors;
use crate::dom::context::RenderContext;
use crate::dom::element::ElementNode;
use crate::error::{NavigatorError, Result};
use serde::{Deserialize, Serialize};

/// Snapshot of the TOC container, captured fresh for every lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TocSnapshot {
    /// Structural path of the container from the document root
    pub root_xpath: String,

    /// The container element and its subtree
    pub root: ElementNode,
}

/// A node of the snapshot together with its structural path
#[derive(Debug, Clone)]
pub struct NodeRef<'a> {
    pub node: &'a ElementNode,
    pub xpath: String,
}

impl TocSnapshot {
    /// Create a snapshot from an already built tree
    pub fn new(root_xpath: impl Into<String>, root: ElementNode) -> Self {
        Self {
            root_xpath: root_xpath.into(),
            root,
        }
    }

    /// Capture the subtree below the TOC container from the live page.
    ///
    /// Falls back to `document.body` when the container is missing. Each node
    /// records which of the tree item, indicator and label selectors it
    /// matches, so any selector the page supports can be configured.
    pub fn capture<C: RenderContext + ?Sized>(ctx: &C, selectors: &TocSelectors) -> Result<Self> {
        let selectors = serde_json::to_string(selectors)
            .map_err(|e| NavigatorError::SnapshotParseFailed(format!("Failed to encode selectors: {}", e)))?;
        let js_code = format!("{}({})", include_str!("capture_toc.js"), selectors);

        let json_value = ctx.evaluate(&js_code)?;
        Self::from_value(json_value)
    }

    /// Parse the value returned by the capture script
    pub fn from_value(json_value: serde_json::Value) -> Result<Self> {
        // The script returns a JSON string, so it is parsed as a string first
        let json_str: String = serde_json::from_value(json_value)
            .map_err(|e| NavigatorError::SnapshotParseFailed(format!("Failed to get JSON string: {}", e)))?;

        serde_json::from_str(&json_str)
            .map_err(|e| NavigatorError::SnapshotParseFailed(format!("Failed to parse snapshot JSON: {}", e)))
    }

    /// Root of the snapshot with its structural path
    pub fn root_ref(&self) -> NodeRef<'_> {
        NodeRef {
            node: &self.root,
            xpath: self.root_xpath.clone(),
        }
    }

    /// Chain of nodes from the root to the first node (in document order)
    /// accepted by `predicate`, both ends included
    pub fn find_path<F>(&self, predicate: F) -> Option<Vec<NodeRef<'_>>>
    where
        F: Fn(&ElementNode) -> bool,
    {
        let mut chain = Vec::new();
        if find_path_recursive(self.root_ref(), &predicate, &mut chain) {
            Some(chain)
        } else {
            None
        }
    }

    /// Count total elements in the snapshot
    pub fn count_elements(&self) -> usize {
        self.root.count()
    }

    /// Convert the snapshot to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| NavigatorError::SnapshotParseFailed(format!("Failed to serialize snapshot: {}", e)))
    }
}

impl<'a> NodeRef<'a> {
    /// Children of this node with their structural paths
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + '_ {
        let node = self.node;
        node.children.iter().enumerate().map(move |(i, child)| NodeRef {
            node: child,
            xpath: format!("{}{}", self.xpath, child_step(node, i)),
        })
    }

    /// First descendant (document order) accepted by `predicate`, without
    /// descending into nodes accepted by `fence`
    pub fn find_descendant<P, B>(&self, predicate: &P, fence: &B) -> Option<NodeRef<'a>>
    where
        P: Fn(&ElementNode) -> bool,
        B: Fn(&ElementNode) -> bool,
    {
        for child in self.children() {
            if fence(child.node) {
                continue;
            }
            if predicate(child.node) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(predicate, fence) {
                return Some(found);
            }
        }
        None
    }
}

/// Positional step (`/tag[k]`) of the `index`-th child of `parent`.
///
/// `k` counts the preceding siblings that share the child's tag, starting at
/// one, which is how XPath numbers same-named siblings.
pub fn child_step(parent: &ElementNode, index: usize) -> String {
    let child = &parent.children[index];
    let tag = child.tag_name.to_ascii_lowercase();
    let position = parent.children[..index]
        .iter()
        .filter(|sibling| sibling.is_tag(&tag))
        .count()
        + 1;
    format!("/{}[{}]", tag, position)
}

fn find_path_recursive<'a, F>(current: NodeRef<'a>, predicate: &F, chain: &mut Vec<NodeRef<'a>>) -> bool
where
    F: Fn(&ElementNode) -> bool,
{
    let matched = predicate(current.node);
    let children: Vec<NodeRef<'a>> = current.children().collect();
    chain.push(current);
    if matched {
        return true;
    }

    for child in children {
        if find_path_recursive(child, predicate, chain) {
            return true;
        }
    }

    chain.pop();
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_tree() -> ElementNode {
        ElementNode::new("div")
            .with_attribute("class", "sidebar")
            .with_children(vec![
                ElementNode::new("ul").with_children(vec![
                    ElementNode::new("li").with_attribute("id", "intro").with_text("Intro"),
                    ElementNode::new("span"),
                    ElementNode::new("li").with_children(vec![
                        ElementNode::new("div").with_text("Chapter 1"),
                        ElementNode::new("i").with_attribute("class", "chevron"),
                        ElementNode::new("ul").with_children(vec![
                            ElementNode::new("li").with_attribute("id", "install").with_text("Install"),
                        ]),
                    ]),
                ]),
            ])
    }

    #[test]
    fn test_child_step_counts_same_tag_only() {
        let root = create_test_tree();
        let list = &root.children[0];

        assert_eq!(child_step(list, 0), "/li[1]");
        assert_eq!(child_step(list, 1), "/span[1]");
        assert_eq!(child_step(list, 2), "/li[2]");
    }

    #[test]
    fn test_find_path() {
        let snapshot = TocSnapshot::new("/html[1]/body[1]/div[1]", create_test_tree());
        let chain = snapshot
            .find_path(|node| node.id().map(String::as_str) == Some("install"))
            .unwrap();

        let tags: Vec<_> = chain.iter().map(|r| r.node.tag_name.as_str()).collect();
        assert_eq!(tags, vec!["div", "ul", "li", "ul", "li"]);
        assert_eq!(
            chain.last().unwrap().xpath,
            "/html[1]/body[1]/div[1]/ul[1]/li[2]/ul[1]/li[1]"
        );
    }

    #[test]
    fn test_find_path_missing() {
        let snapshot = TocSnapshot::new("/html[1]/body[1]", create_test_tree());
        assert!(snapshot.find_path(|node| node.has_class("missing")).is_none());
    }

    #[test]
    fn test_find_descendant_respects_fence() {
        let snapshot = TocSnapshot::new("/html[1]/body[1]", create_test_tree());
        let root = snapshot.root_ref();

        let icon = root.find_descendant(&|n: &ElementNode| n.is_tag("i"), &|_: &ElementNode| false);
        assert_eq!(icon.unwrap().xpath, "/html[1]/body[1]/ul[1]/li[2]/i[1]");

        let fenced = root.find_descendant(&|n: &ElementNode| n.is_tag("i"), &|n: &ElementNode| n.is_tag("li"));
        assert!(fenced.is_none());
    }

    #[test]
    fn test_from_value_parses_string_payload() {
        let snapshot = TocSnapshot::new("/html[1]/body[1]", create_test_tree());
        let payload = serde_json::Value::String(serde_json::to_string(&snapshot).unwrap());

        let parsed = TocSnapshot::from_value(payload).unwrap();
        assert_eq!(parsed, snapshot);
        assert_eq!(parsed.count_elements(), 9);
    }

    #[test]
    fn test_from_value_rejects_non_string() {
        let err = TocSnapshot::from_value(serde_json::json!({"root": {}})).unwrap_err();
        assert!(matches!(err, NavigatorError::SnapshotParseFailed(_)));
    }

    #[test]
    fn test_capture_passes_selectors_to_script() {
        struct Recording(std::cell::RefCell<String>);

        impl RenderContext for Recording {
            fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
                *self.0.borrow_mut() = script.to_string();
                let snapshot = TocSnapshot::new("/html[1]/body[1]", ElementNode::new("div"));
                Ok(serde_json::Value::String(serde_json::to_string(&snapshot).unwrap()))
            }
            fn inner_html(&self, _locator: &crate::dom::Locator) -> Result<Option<String>> {
                Ok(None)
            }
            fn is_visible(&self, _locator: &crate::dom::Locator) -> Result<bool> {
                Ok(false)
            }
            fn click(&self, _locator: &crate::dom::Locator) -> Result<()> {
                Ok(())
            }
        }

        let selectors = TocSelectors {
            tree_item: "li.toc-item-highlight[id], li.toc-group".to_string(),
            ..TocSelectors::default()
        };
        let ctx = Recording(std::cell::RefCell::new(String::new()));
        let snapshot = TocSnapshot::capture(&ctx, &selectors).unwrap();

        let script = ctx.0.borrow();
        assert!(script.contains(r#""tree_item":"li.toc-item-highlight[id], li.toc-group""#));
        assert!(script.contains(r#""container":"div.filter-api-sidebar-wrapper""#));
        assert!(script.contains("textContent"));
        assert_eq!(snapshot.root.tag_name, "div");
    }

    #[test]
    fn test_to_json() {
        let snapshot = TocSnapshot::new("/html[1]/body[1]", create_test_tree());
        let json = snapshot.to_json().unwrap();

        assert!(json.contains("\"root_xpath\": \"/html[1]/body[1]\""));
        assert!(json.contains("Chapter 1"));
    }
}
