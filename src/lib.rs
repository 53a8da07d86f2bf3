//! # Folio
//!
//! A band pagination engine for report previews.
//!
//! Report templates are trees of bands (atomic regions such as a title, a
//! detail row or a group footer) nested inside containers (groups, data
//! bands, tables). Once every band has been measured, something still has to
//! decide which band lands on which page, reserve room for the page footer on
//! every page, and split containers whose children straddle a page boundary
//! without ever cutting a band in half.
//!
//! That decision is what Folio makes. It doesn't render, style or export
//! anything: it consumes measurements and produces an assignment of
//! fragments to pages, with every split point explicit.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]    — Template: content tree, page footer/header, page config
//!       ↓
//!   [measure]  — Heights and bottom edges of nodes
//!       ↓
//!   [layout]   — Page-breaking engine: fit, split, forced breaks
//!       ↓
//!   Pagination — Pages of fragments (whole nodes and partial containers)
//! ```

pub mod error;
pub mod layout;
pub mod measure;
pub mod model;

pub use error::FolioError;

use layout::{LayoutInfo, Pagination, Paginator};
use model::Template;

/// Paginate a template using the declared node heights.
///
/// This is the primary entry point. The returned pages borrow their content
/// from the template.
pub fn paginate(template: &Template) -> Result<Pagination<'_>, FolioError> {
    Paginator::default().paginate(template)
}

/// Paginate a template described as JSON and return the layout summary.
pub fn paginate_json(json: &str) -> Result<LayoutInfo, FolioError> {
    let template = Template::from_json(json)?;
    let pagination = paginate(&template)?;
    Ok(LayoutInfo::from_pagination(&pagination))
}
