//! # Template Model
//!
//! The input representation for the pagination engine. A template is an
//! ordered list of content nodes plus the bands that repeat on every page
//! (footer, and optionally header). Nodes arrive already measured: bands and
//! leaves carry their extent, containers derive theirs from their children.
//!
//! The model is deliberately small. Pagination only needs to know which nodes
//! are divisible, how tall things are, and in what order they appear.

use serde::{Deserialize, Serialize};

use crate::error::FolioError;

/// A complete template ready for pagination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// The top-level content nodes, in document order.
    #[serde(default)]
    pub children: Vec<ContentNode>,

    /// The band reserved at the bottom of every page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_footer: Option<ContentNode>,

    /// The band printed at the top of every page, above the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_header: Option<ContentNode>,

    /// Page size and margins.
    #[serde(default)]
    pub page: PageConfig,
}

impl Template {
    /// Parse a template from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, FolioError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Configuration for a page: size and margins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Page size. Defaults to A4.
    #[serde(default = "PageSize::default")]
    pub size: PageSize,

    /// Page margins in points (1/72 inch).
    #[serde(default)]
    pub margin: Edges,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margin: Edges::uniform(36.0),
        }
    }
}

impl PageConfig {
    /// A margin-less page of the given height. Width is irrelevant to
    /// vertical pagination and is set to A4's.
    pub fn with_height(height: f64) -> Self {
        Self {
            size: PageSize::Custom {
                width: PageSize::A4.dimensions().0,
                height,
            },
            margin: Edges::default(),
        }
    }

    /// Height available for header, content and footer.
    pub fn content_height(&self) -> f64 {
        let (_, page_h) = self.size.dimensions();
        page_h - self.margin.vertical()
    }
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Edge values (top, right, bottom, left) used for margins and insets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// A node in the content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    /// What kind of node this is.
    pub kind: NodeKind,

    /// Child nodes. Only containers have children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContentNode>,

    /// A unique identifier for this node (optional, useful for debugging).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Measured height in points. Required for bands and leaves; optional on
    /// containers, where it overrides the sum of the children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    /// Container padding. Only the vertical edges take part in pagination.
    #[serde(default)]
    pub insets: Edges,

    /// Reprint this band at the top of every continuation of its container.
    #[serde(default)]
    pub repeat: bool,

    /// Opaque markup carried through to the output. Header and footer markup
    /// may contain `{page}` and `{pages}` placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
}

/// The different kinds of nodes in the content tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// A divisible node whose children may be spread over several pages
    /// (a group, a data band with detail rows, a table).
    Container,
    /// An atomic region. Never split: wholly on one page or wholly on the next.
    Band,
    /// A measured element inside a band. Atomic, like a childless band.
    Leaf,
    /// An explicit page break.
    PageBreak,
}

impl ContentNode {
    fn new(kind: NodeKind, id: &str) -> Self {
        Self {
            kind,
            children: vec![],
            id: Some(id.to_string()),
            height: None,
            insets: Edges::default(),
            repeat: false,
            markup: None,
        }
    }

    /// Create a Container node with children.
    pub fn container(id: &str, children: Vec<ContentNode>) -> Self {
        Self {
            children,
            ..Self::new(NodeKind::Container, id)
        }
    }

    /// Create a Band node of the given height.
    pub fn band(id: &str, height: f64) -> Self {
        Self {
            height: Some(height),
            ..Self::new(NodeKind::Band, id)
        }
    }

    /// Create a Leaf node of the given height.
    pub fn leaf(id: &str, height: f64) -> Self {
        Self {
            height: Some(height),
            ..Self::new(NodeKind::Leaf, id)
        }
    }

    /// Create a PageBreak node.
    pub fn page_break() -> Self {
        Self {
            id: None,
            ..Self::new(NodeKind::PageBreak, "")
        }
    }

    pub fn with_insets(mut self, insets: Edges) -> Self {
        self.insets = insets;
        self
    }

    pub fn with_markup(mut self, markup: &str) -> Self {
        self.markup = Some(markup.to_string());
        self
    }

    /// Mark this band to be reprinted on every continuation page.
    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// Can this node's children be distributed across pages?
    ///
    /// A container without children has nothing to distribute and behaves
    /// like a leaf.
    pub fn is_breakable(&self) -> bool {
        match self.kind {
            NodeKind::Container => !self.children.is_empty(),
            NodeKind::Band | NodeKind::Leaf | NodeKind::PageBreak => false,
        }
    }

    /// Is this one of the atomic content nodes that pagination accounts for
    /// one by one?
    pub fn is_atomic(&self) -> bool {
        match self.kind {
            NodeKind::Band | NodeKind::Leaf => true,
            NodeKind::Container => self.children.is_empty(),
            NodeKind::PageBreak => false,
        }
    }

    /// Does an explicit page break sit anywhere below this node?
    pub fn contains_page_break(&self) -> bool {
        self.children
            .iter()
            .any(|c| c.kind == NodeKind::PageBreak || c.contains_page_break())
    }

    /// Human-readable label for diagnostics: the id if present, the kind
    /// otherwise.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("<{}>", self.kind.name()),
        }
    }
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Container => "Container",
            NodeKind::Band => "Band",
            NodeKind::Leaf => "Leaf",
            NodeKind::PageBreak => "PageBreak",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_container_is_not_breakable() {
        let node = ContentNode::container("group", vec![]);
        assert!(!node.is_breakable());
        assert!(node.is_atomic());
    }

    #[test]
    fn container_with_children_is_breakable() {
        let node = ContentNode::container("group", vec![ContentNode::band("row", 10.0)]);
        assert!(node.is_breakable());
        assert!(!node.is_atomic());
    }

    #[test]
    fn bands_and_leaves_are_atomic() {
        assert!(ContentNode::band("b", 1.0).is_atomic());
        assert!(ContentNode::leaf("l", 1.0).is_atomic());
        assert!(!ContentNode::page_break().is_atomic());
    }

    #[test]
    fn finds_nested_page_breaks() {
        let node = ContentNode::container(
            "outer",
            vec![ContentNode::container("inner", vec![ContentNode::page_break()])],
        );
        assert!(node.contains_page_break());
        assert!(!ContentNode::container("plain", vec![ContentNode::band("b", 1.0)])
            .contains_page_break());
    }

    #[test]
    fn content_height_subtracts_margins() {
        let config = PageConfig {
            size: PageSize::Custom {
                width: 100.0,
                height: 500.0,
            },
            margin: Edges::symmetric(20.0, 10.0),
        };
        assert_eq!(config.content_height(), 460.0);
    }

    #[test]
    fn label_falls_back_to_kind() {
        assert_eq!(ContentNode::page_break().label(), "<PageBreak>");
        assert_eq!(ContentNode::band("total", 5.0).label(), "total");
    }

    #[test]
    fn deserializes_tagged_kind() {
        let json = r#"{ "kind": { "type": "Band" }, "id": "title", "height": 40 }"#;
        let node: ContentNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.kind, NodeKind::Band);
        assert_eq!(node.height, Some(40.0));
        assert!(!node.repeat);
    }
}
