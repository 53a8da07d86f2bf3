//! # Measurement
//!
//! Pagination never lays anything out itself. It asks a [`Measure`]
//! implementation how tall a node is and where its bottom edge lands when
//! placed at a page's current fill position.
//!
//! [`FlowMeasure`] is the built-in collaborator: bands and leaves report their
//! declared height, containers report their insets plus the stacked height of
//! their children (or their own declared height, when given). A renderer that
//! knows real geometry can implement [`Measure`] directly.

use crate::error::FolioError;
use crate::model::{ContentNode, NodeKind};

/// Where a page currently stands, as seen by a measurement query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageContext {
    /// 0-based page index.
    pub index: usize,
    /// Offset of the content area's top (below any page header).
    pub origin: f64,
    /// Bottom edge of the content placed so far.
    pub cursor: f64,
    /// Fit threshold: content height minus the reserved footer.
    pub usable_height: f64,
}

/// The measurement collaborator.
///
/// Queries must be pure functions of the node and the page context: asking
/// twice gives the same answer.
pub trait Measure {
    /// The node's full extent in points.
    fn height(&self, node: &ContentNode) -> Result<f64, FolioError>;

    /// The node's bottom edge if it were placed at the page's cursor.
    fn bottom(&self, node: &ContentNode, page: &PageContext) -> Result<f64, FolioError> {
        Ok(page.cursor + self.height(node)?)
    }
}

/// Measures nodes from their declared extents, stacking children vertically.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowMeasure;

impl FlowMeasure {
    pub fn new() -> Self {
        Self
    }
}

impl Measure for FlowMeasure {
    fn height(&self, node: &ContentNode) -> Result<f64, FolioError> {
        let height = match node.kind {
            NodeKind::PageBreak => return Ok(0.0),
            NodeKind::Band | NodeKind::Leaf => node
                .height
                .ok_or_else(|| FolioError::unmeasurable(node, "band has no measured height"))?,
            NodeKind::Container => match node.height {
                Some(h) => h,
                None => {
                    let mut total = node.insets.vertical();
                    for child in &node.children {
                        total += self.height(child)?;
                    }
                    total
                }
            },
        };

        if !height.is_finite() || height < 0.0 {
            return Err(FolioError::unmeasurable(
                node,
                &format!("invalid height {}", height),
            ));
        }
        Ok(height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edges;

    fn ctx(cursor: f64) -> PageContext {
        PageContext {
            index: 0,
            origin: 0.0,
            cursor,
            usable_height: 450.0,
        }
    }

    #[test]
    fn band_reports_declared_height() {
        let m = FlowMeasure::new();
        assert_eq!(m.height(&ContentNode::band("b", 42.0)).unwrap(), 42.0);
    }

    #[test]
    fn container_stacks_children_and_insets() {
        let m = FlowMeasure::new();
        let node = ContentNode::container(
            "group",
            vec![ContentNode::band("a", 10.0), ContentNode::leaf("b", 15.0)],
        )
        .with_insets(Edges::symmetric(5.0, 0.0));
        assert_eq!(m.height(&node).unwrap(), 35.0);
    }

    #[test]
    fn declared_container_height_wins() {
        let m = FlowMeasure::new();
        let mut node = ContentNode::container("group", vec![ContentNode::band("a", 10.0)]);
        node.height = Some(80.0);
        assert_eq!(m.height(&node).unwrap(), 80.0);
    }

    #[test]
    fn bottom_is_offset_from_cursor() {
        let m = FlowMeasure::new();
        let bottom = m.bottom(&ContentNode::band("b", 100.0), &ctx(200.0)).unwrap();
        assert_eq!(bottom, 300.0);
    }

    #[test]
    fn band_without_height_is_unmeasurable() {
        let m = FlowMeasure::new();
        let mut band = ContentNode::band("orphan", 0.0);
        band.height = None;
        let err = m.height(&band).unwrap_err();
        assert!(matches!(err, FolioError::MeasurementUnavailable { ref node, .. } if node == "orphan"));
    }

    #[test]
    fn unmeasurable_child_fails_the_container() {
        let m = FlowMeasure::new();
        let mut bad = ContentNode::leaf("bad", 0.0);
        bad.height = Some(f64::NAN);
        let node = ContentNode::container("group", vec![ContentNode::band("ok", 1.0), bad]);
        assert!(m.height(&node).is_err());
    }
}
