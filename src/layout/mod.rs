//! # Page-Breaking Engine
//!
//! This is the heart of Folio.
//!
//! Content arrives measured. The job here is to decide, node by node in
//! document order, which page each one lands on:
//!
//! 1. Open page 1 the first time something needs placing. Every page reserves
//!    its footer before anything is measured against it.
//! 2. Ask whether the node's bottom edge lands within the usable height.
//! 3. If it fits: place it whole.
//! 4. If it doesn't and it is atomic (a band or leaf): start a new page and
//!    place it there, whole.
//! 5. If it doesn't and it is a container: split it. Walk its children with
//!    the same rules, recursively, collecting the ones placed on each page
//!    into one [`PartialContainer`] piece per page.
//!
//! The subtle part is step 4 inside step 5. When a band deep inside nested
//! containers forces a new page, every container still being split must
//! continue on that same page, otherwise an outer container's remaining
//! children would resume on a page its own band already left behind. Open
//! splits are tracked as crop frames in an arena; a forced break walks the
//! parent chain and moves every frame to the new page.

pub mod crop;
pub mod fragment;
pub mod page;
pub mod page_break;

use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use crate::error::FolioError;
use crate::measure::{FlowMeasure, Measure};
use crate::model::{ContentNode, NodeKind, PageConfig, Template};

use self::crop::{CropHandle, CropStack};
pub use self::fragment::{Fragment, FragmentInfo, PartialContainer};
pub use self::page::{BandInstance, BandTemplate, LayoutPage, Page};
use self::page_break::{decide_break, BreakDecision};

/// Non-fatal conditions met during pagination.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutWarning {
    /// An atomic node is taller than the space a fresh page offers. It is
    /// placed whole anyway and overflows its page.
    #[error(
        "{node} is {height:.2}pt tall but page {page} only has {available:.2}pt left; placed whole"
    )]
    OversizedBand {
        node: String,
        height: f64,
        available: f64,
        /// 1-based page number.
        page: usize,
    },
}

/// The result of paginating a template.
#[derive(Debug, Clone, PartialEq)]
pub struct Pagination<'a> {
    pub pages: Vec<LayoutPage<'a>>,
    pub warnings: Vec<LayoutWarning>,
}

impl<'a> Pagination<'a> {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Every atomic node in output order, across all pages.
    pub fn leaves(&self) -> Vec<&'a ContentNode> {
        self.pages.iter().flat_map(|p| p.leaves()).collect()
    }
}

/// The main pagination engine.
pub struct Paginator<'m> {
    measure: &'m dyn Measure,
}

impl Default for Paginator<'static> {
    fn default() -> Self {
        Self::new(&FlowMeasure)
    }
}

impl<'m> Paginator<'m> {
    pub fn new(measure: &'m dyn Measure) -> Self {
        Self { measure }
    }

    /// Main entry point: distribute a template's content over pages.
    ///
    /// An empty template yields zero pages. A measurement failure anywhere
    /// fails the whole call.
    pub fn paginate<'a>(&self, template: &'a Template) -> Result<Pagination<'a>, FolioError> {
        if template.children.is_empty() {
            debug!("template has no content; producing no pages");
            return Ok(Pagination {
                pages: Vec::new(),
                warnings: Vec::new(),
            });
        }

        let header = template
            .page_header
            .as_ref()
            .map(|node| BandTemplate::measure(node, self.measure))
            .transpose()?;
        let footer = template
            .page_footer
            .as_ref()
            .map(|node| BandTemplate::measure(node, self.measure))
            .transpose()?;

        let mut flow = Flow {
            config: &template.page,
            measure: self.measure,
            header,
            footer,
            pages: Vec::new(),
            crops: CropStack::new(),
            warnings: Vec::new(),
            break_pending: false,
        };

        for node in &template.children {
            flow.place(node, None)?;
        }

        Ok(flow.finish())
    }
}

/// Mutable state of one pagination run.
struct Flow<'a, 'm> {
    config: &'a PageConfig,
    measure: &'m dyn Measure,
    header: Option<BandTemplate<'a>>,
    footer: Option<BandTemplate<'a>>,
    pages: Vec<Page<'a>>,
    crops: CropStack<'a>,
    warnings: Vec<LayoutWarning>,
    break_pending: bool,
}

impl<'a> Flow<'a, '_> {
    fn new_page(&mut self) -> Result<usize, FolioError> {
        let index = self.pages.len();
        let page = Page::create(index, self.config, self.header.as_ref(), self.footer.as_ref())?;
        debug!(
            "opened page {} (usable height {:.2})",
            index + 1,
            page.usable_height()
        );
        self.pages.push(page);
        Ok(index)
    }

    /// The page content under `parent` is placed on, if any page exists yet.
    fn active_page(&self, parent: Option<CropHandle>) -> Option<usize> {
        match parent {
            Some(handle) => Some(self.crops.get(handle).page),
            None => self.pages.len().checked_sub(1),
        }
    }

    /// Like [`Flow::active_page`], creating page 1 on first use.
    fn target_page(&mut self, parent: Option<CropHandle>) -> Result<usize, FolioError> {
        match self.active_page(parent) {
            Some(index) => Ok(index),
            None => self.new_page(),
        }
    }

    /// Open a new page and move every open split in `parent`'s chain onto it.
    fn force_new_page(&mut self, parent: Option<CropHandle>) -> Result<usize, FolioError> {
        let index = self.new_page()?;
        if let Some(handle) = parent {
            let reserved = self.crops.move_to_page(handle, index);
            self.pages[index].reserve(reserved);
            debug!(
                "forced break inside {} moved {} open split(s) to page {}",
                self.crops.get(handle).node.label(),
                self.crops.depth(),
                index + 1
            );
        }
        Ok(index)
    }

    fn emit(&mut self, parent: Option<CropHandle>, page: usize, fragment: Fragment<'a>) {
        match parent {
            Some(handle) => self.crops.get_mut(handle).append(page, fragment),
            None => self.pages[page].accept(fragment),
        }
    }

    fn place(&mut self, node: &'a ContentNode, parent: Option<CropHandle>) -> Result<(), FolioError> {
        if node.kind == NodeKind::PageBreak {
            self.break_pending = true;
            return Ok(());
        }

        // A break takes effect when the next content arrives, so the splits
        // still open at that point are the ones that continue.
        if std::mem::take(&mut self.break_pending) {
            if let Some(index) = self.active_page(parent) {
                if !self.pages[index].is_blank() {
                    self.force_new_page(parent)?;
                }
            }
        }

        let index = self.target_page(parent)?;
        let page = &self.pages[index];
        let decision = if node.is_breakable() && node.contains_page_break() {
            // An explicit break inside means the container can't stay whole.
            BreakDecision::Split
        } else {
            decide_break(
                page.fits(node, self.measure)?,
                node.is_breakable(),
                page.is_blank(),
            )
        };

        match decision {
            BreakDecision::Place => self.commit(index, node, parent),
            BreakDecision::PlaceOversized => {
                self.warn_oversized(index, node)?;
                self.commit(index, node, parent)
            }
            BreakDecision::MoveToNextPage => {
                let index = self.force_new_page(parent)?;
                if !self.pages[index].fits(node, self.measure)? {
                    self.warn_oversized(index, node)?;
                }
                self.commit(index, node, parent)
            }
            BreakDecision::Split => self.split(node, parent),
        }
    }

    /// Place `node` whole on page `index`.
    fn commit(
        &mut self,
        index: usize,
        node: &'a ContentNode,
        parent: Option<CropHandle>,
    ) -> Result<(), FolioError> {
        let bottom = self.pages[index].bottom_of(node, self.measure)?;
        self.pages[index].occupy(bottom);
        self.emit(parent, index, Fragment::Whole(node));
        if let (true, Some(handle)) = (node.repeat, parent) {
            let height = self.measure.height(node)?;
            self.crops.get_mut(handle).remember_repeat(node, height);
        }
        Ok(())
    }

    /// Distribute a container's children over as many pages as they need.
    fn split(&mut self, node: &'a ContentNode, parent: Option<CropHandle>) -> Result<(), FolioError> {
        let start = self.target_page(parent)?;
        let top = self.pages[start].cursor();
        let handle = self.crops.open(node, start, parent);
        debug!("splitting {} starting on page {}", node.label(), start + 1);

        self.pages[start].reserve(node.insets.top);
        for child in &node.children {
            self.place(child, Some(handle))?;
        }
        // A forced break below may have moved this frame.
        let end = self.crops.get(handle).page;
        self.pages[end].reserve(node.insets.bottom);

        let mut pieces = self.crops.close(handle).into_pieces();

        if pieces.len() <= 1 {
            // Never actually broke: the container sits whole on one page and
            // claims its full measured extent, as a placed container does.
            let page = pieces.pop().map_or(end, |p| p.page);
            if page == start {
                let bottom = top + self.measure.height(node)?;
                self.pages[page].occupy(bottom);
            }
            self.emit(parent, page, Fragment::Whole(node));
            return Ok(());
        }

        debug!(
            "{} split into {} pieces over pages {}-{}",
            node.label(),
            pieces.len(),
            start + 1,
            end + 1
        );
        for piece in pieces {
            let page = piece.page;
            self.emit(parent, page, Fragment::Partial(piece));
        }
        Ok(())
    }

    fn warn_oversized(&mut self, index: usize, node: &ContentNode) -> Result<(), FolioError> {
        let page = &self.pages[index];
        let warning = LayoutWarning::OversizedBand {
            node: node.label(),
            height: self.measure.height(node)?,
            available: page.usable_height() - page.cursor(),
            page: index + 1,
        };
        warn!("{}", warning);
        self.warnings.push(warning);
        Ok(())
    }

    fn finish(self) -> Pagination<'a> {
        let page_count = self.pages.len();
        Pagination {
            pages: self
                .pages
                .into_iter()
                .map(|page| page.finalize(page_count))
                .collect(),
            warnings: self.warnings,
        }
    }
}

// ── Serializable layout metadata (for debug output / dev tools) ───

/// Complete layout summary for all pages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInfo {
    pub pages: Vec<PageInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Layout summary for a single page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub number: usize,
    pub usable_height: f64,
    pub content_bottom: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    pub fragments: Vec<FragmentInfo>,
}

impl LayoutInfo {
    /// Extract serializable layout metadata from a pagination result.
    pub fn from_pagination(pagination: &Pagination<'_>) -> Self {
        LayoutInfo {
            pages: pagination
                .pages
                .iter()
                .map(|page| PageInfo {
                    number: page.number,
                    usable_height: page.usable_height,
                    content_bottom: page.content_bottom,
                    header: band_summary(page.header.as_ref()),
                    footer: band_summary(page.footer.as_ref()),
                    fragments: page.fragments.iter().map(FragmentInfo::from_fragment).collect(),
                })
                .collect(),
            warnings: pagination.warnings.iter().map(|w| w.to_string()).collect(),
        }
    }
}

fn band_summary(band: Option<&BandInstance>) -> Option<String> {
    band.map(|b| {
        b.markup()
            .map(str::to_string)
            .unwrap_or_else(|| b.node.label())
    })
}
