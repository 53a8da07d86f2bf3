//! Pages under construction and the bands bound to them.

use serde::Serialize;

use crate::error::FolioError;
use crate::measure::{Measure, PageContext};
use crate::model::{ContentNode, PageConfig};

use super::fragment::Fragment;

/// A band that repeats on every page (footer or header), measured once before
/// pagination starts and never changed afterwards.
#[derive(Debug, Clone)]
pub struct BandTemplate<'a> {
    pub node: &'a ContentNode,
    pub height: f64,
}

impl<'a> BandTemplate<'a> {
    pub fn measure(node: &'a ContentNode, measure: &dyn Measure) -> Result<Self, FolioError> {
        let height = measure.height(node)?;
        Ok(Self { node, height })
    }

    /// An owned copy of the band for one page, with `{page}` resolved.
    fn instantiate(&self, number: usize) -> BandInstance {
        let mut node = self.node.clone();
        if let Some(markup) = node.markup.take() {
            node.markup = Some(markup.replace("{page}", &number.to_string()));
        }
        BandInstance {
            node,
            height: self.height,
        }
    }
}

/// A page's own copy of a repeating band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandInstance {
    pub node: ContentNode,
    pub height: f64,
}

impl BandInstance {
    pub fn markup(&self) -> Option<&str> {
        self.node.markup.as_deref()
    }

    fn resolve_page_count(&mut self, page_count: usize) {
        if let Some(markup) = self.node.markup.take() {
            self.node.markup = Some(markup.replace("{pages}", &page_count.to_string()));
        }
    }
}

/// A page being filled.
///
/// The footer is attached in [`Page::create`], so the usable height is final
/// before anything is measured against the page.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    index: usize,
    usable_height: f64,
    origin: f64,
    cursor: f64,
    /// Content nodes occupying space here. Insets and reprints don't count.
    placed: usize,
    fragments: Vec<Fragment<'a>>,
    header: Option<BandInstance>,
    footer: Option<BandInstance>,
}

impl<'a> Page<'a> {
    /// Open page `index` (0-based): reserve the footer, print the header, and
    /// start the fill cursor just below it.
    pub fn create(
        index: usize,
        config: &PageConfig,
        header: Option<&BandTemplate<'_>>,
        footer: Option<&BandTemplate<'_>>,
    ) -> Result<Self, FolioError> {
        let content_height = config.content_height();
        let number = index + 1;

        let header = header.map(|h| h.instantiate(number));
        let footer = footer.map(|f| f.instantiate(number));
        let origin = header.as_ref().map_or(0.0, |h| h.height);
        let footer_height = footer.as_ref().map_or(0.0, |f| f.height);
        let usable_height = content_height - footer_height;

        if usable_height <= origin {
            return Err(FolioError::NoUsableHeight {
                content_height,
                header: origin,
                footer: footer_height,
            });
        }

        Ok(Self {
            index,
            usable_height,
            origin,
            cursor: origin,
            placed: 0,
            fragments: Vec::new(),
            header,
            footer,
        })
    }

    pub fn usable_height(&self) -> f64 {
        self.usable_height
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// True until some content node occupies space on this page.
    pub fn is_blank(&self) -> bool {
        self.placed == 0
    }

    pub fn footer(&self) -> Option<&BandInstance> {
        self.footer.as_ref()
    }

    pub fn context(&self) -> PageContext {
        PageContext {
            index: self.index,
            origin: self.origin,
            cursor: self.cursor,
            usable_height: self.usable_height,
        }
    }

    /// Measured bottom edge of `node` at the current fill position.
    pub fn bottom_of(&self, node: &ContentNode, measure: &dyn Measure) -> Result<f64, FolioError> {
        measure.bottom(node, &self.context())
    }

    /// Does `node` fit at the current fill position? A bottom edge exactly on
    /// the usable height fits. Every placement decision goes through here.
    pub fn fits(&self, node: &ContentNode, measure: &dyn Measure) -> Result<bool, FolioError> {
        Ok(self.bottom_of(node, measure)? <= self.usable_height)
    }

    /// Append a fragment. Callers check fit first.
    pub fn accept(&mut self, fragment: Fragment<'a>) {
        self.fragments.push(fragment);
    }

    /// Record a content node occupying space down to `bottom`.
    pub fn occupy(&mut self, bottom: f64) {
        self.cursor = self.cursor.max(bottom);
        self.placed += 1;
    }

    /// Reserve space that belongs to no content node (insets, reprints).
    pub fn reserve(&mut self, height: f64) {
        self.cursor += height;
    }

    /// Close the page: resolve `{pages}` in the bound bands and hand the
    /// fragments over in order.
    pub fn finalize(mut self, page_count: usize) -> LayoutPage<'a> {
        if let Some(header) = self.header.as_mut() {
            header.resolve_page_count(page_count);
        }
        if let Some(footer) = self.footer.as_mut() {
            footer.resolve_page_count(page_count);
        }
        LayoutPage {
            number: self.index + 1,
            usable_height: self.usable_height,
            content_bottom: self.cursor,
            fragments: self.fragments,
            header: self.header,
            footer: self.footer,
        }
    }
}

/// A finished page, ready for an output consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPage<'a> {
    /// 1-based page number.
    pub number: usize,
    pub usable_height: f64,
    /// Bottom edge of the last content placed.
    pub content_bottom: f64,
    pub fragments: Vec<Fragment<'a>>,
    pub header: Option<BandInstance>,
    pub footer: Option<BandInstance>,
}

impl<'a> LayoutPage<'a> {
    /// Atomic nodes accounted for on this page, in document order.
    pub fn leaves(&self) -> Vec<&'a ContentNode> {
        self.fragments.iter().flat_map(|f| f.leaves()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::FlowMeasure;

    fn footer_node() -> ContentNode {
        ContentNode::band("footer", 50.0).with_markup("Page {page} of {pages}")
    }

    #[test]
    fn footer_is_reserved_at_creation() {
        let node = footer_node();
        let footer = BandTemplate::measure(&node, &FlowMeasure).unwrap();
        let page = Page::create(0, &PageConfig::with_height(500.0), None, Some(&footer)).unwrap();
        assert_eq!(page.usable_height(), 450.0);
        assert!(page.is_blank());
        assert_eq!(page.footer().unwrap().markup(), Some("Page 1 of {pages}"));
    }

    #[test]
    fn header_moves_the_origin() {
        let node = ContentNode::band("header", 30.0);
        let header = BandTemplate::measure(&node, &FlowMeasure).unwrap();
        let page = Page::create(0, &PageConfig::with_height(500.0), Some(&header), None).unwrap();
        assert_eq!(page.cursor(), 30.0);
        assert_eq!(page.usable_height(), 500.0);
    }

    #[test]
    fn fit_is_inclusive() {
        let page = Page::create(0, &PageConfig::with_height(100.0), None, None).unwrap();
        let exact = ContentNode::band("exact", 100.0);
        let over = ContentNode::band("over", 100.5);
        assert!(page.fits(&exact, &FlowMeasure).unwrap());
        assert!(!page.fits(&over, &FlowMeasure).unwrap());
    }

    #[test]
    fn accept_does_not_move_the_cursor() {
        let band = ContentNode::band("b", 40.0);
        let mut page = Page::create(0, &PageConfig::with_height(100.0), None, None).unwrap();
        page.accept(Fragment::Whole(&band));
        assert_eq!(page.cursor(), 0.0);
        page.occupy(40.0);
        assert_eq!(page.cursor(), 40.0);
        assert!(!page.is_blank());
    }

    #[test]
    fn finalize_resolves_page_count() {
        let node = footer_node();
        let footer = BandTemplate::measure(&node, &FlowMeasure).unwrap();
        let page = Page::create(2, &PageConfig::with_height(500.0), None, Some(&footer)).unwrap();
        let done = page.finalize(4);
        assert_eq!(done.number, 3);
        assert_eq!(done.footer.unwrap().markup(), Some("Page 3 of 4"));
    }

    #[test]
    fn oversized_bands_leave_no_room() {
        let header_node = ContentNode::band("header", 60.0);
        let footer_node = ContentNode::band("footer", 50.0);
        let header = BandTemplate::measure(&header_node, &FlowMeasure).unwrap();
        let footer = BandTemplate::measure(&footer_node, &FlowMeasure).unwrap();
        let err = Page::create(
            0,
            &PageConfig::with_height(100.0),
            Some(&header),
            Some(&footer),
        )
        .unwrap_err();
        assert!(matches!(err, FolioError::NoUsableHeight { .. }));
    }
}
