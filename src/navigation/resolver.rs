use crate::config::TocSelectors;
use crate::dom::{ElementNode, Locator, NodeRef, NodeRole, RenderContext, TocSnapshot};
use serde::{Deserialize, Serialize};

/// Label used for a collapsed group whose text cannot be read
pub const UNKNOWN_MENU: &str = "Unknown Menu";

/// One menu group to open on the way to a target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Expansion {
    /// Display label of the group
    pub menu_text: String,

    /// Structural path of the group's collapsed indicator
    pub locator: Locator,
}

/// Collapsed groups between the tree root and a target, outermost first
pub type ExpansionPath = Vec<Expansion>;

/// Result of looking a target up in the TOC
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathLookup {
    /// Neither the identifier nor the text matched a node
    NotFound,

    /// The target is already rendered visibly; nothing to expand
    AlreadyVisible { target: Locator },

    /// The target exists but is hidden; `expansions` may be empty
    Hidden { target: Locator, expansions: ExpansionPath },
}

impl PathLookup {
    pub fn found(&self) -> bool {
        !matches!(self, PathLookup::NotFound)
    }

    pub fn already_visible(&self) -> bool {
        matches!(self, PathLookup::AlreadyVisible { .. })
    }

    /// Expansions to apply, root-first; empty unless the target is hidden
    pub fn expansions(&self) -> &[Expansion] {
        match self {
            PathLookup::Hidden { expansions, .. } => expansions,
            _ => &[],
        }
    }

    /// Locator of the resolved target node
    pub fn target(&self) -> Option<&Locator> {
        match self {
            PathLookup::NotFound => None,
            PathLookup::AlreadyVisible { target } | PathLookup::Hidden { target, .. } => Some(target),
        }
    }
}

/// Computes which collapsed menu groups hide a TOC leaf
#[derive(Debug, Clone)]
pub struct PathResolver {
    selectors: TocSelectors,
}

impl PathResolver {
    pub fn new(selectors: &TocSelectors) -> Self {
        Self {
            selectors: selectors.clone(),
        }
    }

    /// Capture the live TOC and compute the expansion path of a target.
    ///
    /// Looks the target up by `target_id` first and falls back to a substring
    /// match of `target_text`. A failed capture is reported as
    /// [`PathLookup::NotFound`].
    pub fn find_expansion_path<C: RenderContext + ?Sized>(
        &self,
        ctx: &C,
        target_id: &str,
        target_text: &str,
    ) -> PathLookup {
        let snapshot = match TocSnapshot::capture(ctx, &self.selectors) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("Error discovering expansion path for '{}': {}", describe(target_id, target_text), e);
                return PathLookup::NotFound;
            }
        };

        let lookup = self.resolve(&snapshot, target_id, target_text);
        match &lookup {
            PathLookup::NotFound => {
                log::debug!("Target '{}' not found in TOC", describe(target_id, target_text))
            }
            PathLookup::AlreadyVisible { .. } => {
                log::debug!("Target '{}' is already visible", describe(target_id, target_text))
            }
            PathLookup::Hidden { expansions, .. } => {
                let labels: Vec<&str> = expansions.iter().map(|e| e.menu_text.as_str()).collect();
                log::debug!(
                    "Expansion path for '{}': {:?}",
                    describe(target_id, target_text),
                    labels
                );
            }
        }
        lookup
    }

    /// Compute the expansion path against an already captured snapshot
    pub fn resolve(&self, snapshot: &TocSnapshot, target_id: &str, target_text: &str) -> PathLookup {
        let Some(chain) = self.locate(snapshot, target_id, target_text) else {
            return PathLookup::NotFound;
        };
        let Some(target) = chain.last() else {
            return PathLookup::NotFound;
        };

        let target_locator = match target.node.id() {
            Some(id) => Locator::id(id.clone()),
            None => Locator::xpath(target.xpath.clone()),
        };

        if target.node.is_visible {
            return PathLookup::AlreadyVisible { target: target_locator };
        }

        // Ancestors strictly between the root and the target
        let ancestors = chain.get(1..chain.len() - 1).unwrap_or(&[]);

        let mut expansions = ExpansionPath::new();
        for ancestor in ancestors {
            // Below a collapsed group every indicator is hidden until that group opens
            let below_collapsed = !expansions.is_empty();
            if let Some(expansion) = Self::collapsed_group(ancestor, below_collapsed) {
                expansions.push(expansion);
            }
        }

        PathLookup::Hidden {
            target: target_locator,
            expansions,
        }
    }

    fn locate<'s>(&self, snapshot: &'s TocSnapshot, target_id: &str, target_text: &str) -> Option<Vec<NodeRef<'s>>> {
        if !target_id.is_empty() {
            if let Some(chain) = snapshot.find_path(|node| node.id().map(String::as_str) == Some(target_id)) {
                return Some(chain);
            }
        }

        if target_text.is_empty() {
            return None;
        }

        snapshot.find_path(|node| {
            node.has_role(NodeRole::TreeItem) && node.has_stable_id() && node.full_text().trim().contains(target_text)
        })
    }

    /// Expansion for `group` when it is a menu group showing its collapsed
    /// indicator. The indicator must be rendered visibly unless an outer group
    /// on the path is collapsed too.
    fn collapsed_group(group: &NodeRef<'_>, below_collapsed: bool) -> Option<Expansion> {
        if !group.node.has_role(NodeRole::TreeItem) || group.node.has_stable_id() {
            return None;
        }

        let nested_item = |node: &ElementNode| node.has_role(NodeRole::TreeItem);
        let indicator = group.find_descendant(
            &|node: &ElementNode| node.has_role(NodeRole::CollapsedIndicator),
            &nested_item,
        )?;
        if !indicator.node.is_visible && !below_collapsed {
            return None;
        }

        let menu_text = group
            .find_descendant(&|node: &ElementNode| node.has_role(NodeRole::MenuLabel), &nested_item)
            .map(|label| label.node.full_text().trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| UNKNOWN_MENU.to_string());

        Some(Expansion {
            menu_text,
            locator: Locator::xpath(indicator.xpath),
        })
    }
}

fn describe<'a>(target_id: &'a str, target_text: &'a str) -> &'a str {
    if target_text.is_empty() { target_id } else { target_text }
}
