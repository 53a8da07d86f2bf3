//! Fragments: what a page actually holds.
//!
//! A page's content is a list of fragments in document order. Most are whole
//! nodes. A container that straddled a page boundary shows up as one
//! [`PartialContainer`] piece per page it touched, each piece pointing at the
//! page where the next one continues.

use serde::Serialize;

use crate::model::ContentNode;

/// One entry in a page's (or a piece's) content list.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment<'a> {
    /// A node placed in full, with all of its descendants.
    Whole(&'a ContentNode),
    /// One page's worth of a container that was split.
    Partial(PartialContainer<'a>),
    /// A repeat-flagged header band printed again at the top of a
    /// continuation piece. A copy; the original stays where it was placed.
    Reprint(&'a ContentNode),
}

/// The part of a split container that landed on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialContainer<'a> {
    /// The container being split.
    pub node: &'a ContentNode,
    /// 0-based position of this piece among the container's pieces.
    pub piece: usize,
    /// 0-based index of the page this piece lives on.
    pub page: usize,
    /// Children (or pieces of children) placed on this page.
    pub accepted: Vec<Fragment<'a>>,
    /// Page index holding the next piece, if the container continues.
    pub continuation: Option<usize>,
}

impl<'a> Fragment<'a> {
    /// The source node behind this fragment.
    pub fn node(&self) -> &'a ContentNode {
        match self {
            Fragment::Whole(node) | Fragment::Reprint(node) => *node,
            Fragment::Partial(partial) => partial.node,
        }
    }

    pub fn is_reprint(&self) -> bool {
        matches!(self, Fragment::Reprint(_))
    }

    /// Every atomic node this fragment accounts for, in document order.
    /// Reprints account for nothing.
    pub fn leaves(&self) -> Vec<&'a ContentNode> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<&'a ContentNode>) {
        match self {
            Fragment::Whole(node) => collect_node_leaves(*node, out),
            Fragment::Partial(partial) => {
                for fragment in &partial.accepted {
                    fragment.collect_leaves(out);
                }
            }
            Fragment::Reprint(_) => {}
        }
    }
}

fn collect_node_leaves<'a>(node: &'a ContentNode, out: &mut Vec<&'a ContentNode>) {
    if node.is_atomic() {
        out.push(node);
        return;
    }
    for child in &node.children {
        collect_node_leaves(child, out);
    }
}

impl PartialContainer<'_> {
    pub fn is_last(&self) -> bool {
        self.continuation.is_none()
    }
}

/// Serializable summary of a fragment, for debug output and tooling.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentInfo {
    pub node: String,
    pub node_type: String,
    /// "whole", "partial" or "reprint".
    pub placement: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub piece: Option<usize>,
    /// 1-based page number of the next piece.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continued_on: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FragmentInfo>,
}

impl FragmentInfo {
    pub fn from_fragment(fragment: &Fragment<'_>) -> Self {
        let node = fragment.node();
        let (placement, piece, continued_on, children) = match fragment {
            Fragment::Whole(_) => ("whole", None, None, Vec::new()),
            Fragment::Reprint(_) => ("reprint", None, None, Vec::new()),
            Fragment::Partial(partial) => (
                "partial",
                Some(partial.piece),
                partial.continuation.map(|index| index + 1),
                partial.accepted.iter().map(Self::from_fragment).collect(),
            ),
        };
        FragmentInfo {
            node: node.label(),
            node_type: node.kind.name().to_string(),
            placement,
            piece,
            continued_on,
            children,
        }
    }
}
