//! Crop frames: the bookkeeping for containers that are mid-split.
//!
//! Splitting is recursive, and a forced page break deep inside the recursion
//! must move every open ancestor to the new page as well. Frames therefore
//! live in an arena ([`CropStack`]) and refer to their parent by handle, so
//! the break can walk the chain and rewrite each frame's page in place.

use crate::model::ContentNode;

use super::fragment::{Fragment, PartialContainer};

/// Index of a frame in its [`CropStack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropHandle(usize);

/// A container being split across pages.
#[derive(Debug)]
pub struct CropFrame<'a> {
    pub node: &'a ContentNode,
    /// Page the next child is placed on. Rewritten by forced breaks.
    pub page: usize,
    pub parent: Option<CropHandle>,
    pieces: Vec<Piece<'a>>,
    /// Repeat-flagged children placed so far, with their heights.
    reprints: Vec<(&'a ContentNode, f64)>,
}

#[derive(Debug)]
struct Piece<'a> {
    page: usize,
    accepted: Vec<Fragment<'a>>,
}

impl<'a> CropFrame<'a> {
    fn new(node: &'a ContentNode, page: usize, parent: Option<CropHandle>) -> Self {
        Self {
            node,
            page,
            parent,
            pieces: Vec::new(),
            reprints: Vec::new(),
        }
    }

    /// Add a child fragment living on `page`. The first fragment for a new
    /// page opens a new piece, seeded with the reprinted headers when it is a
    /// continuation.
    pub fn append(&mut self, page: usize, fragment: Fragment<'a>) {
        let opens_piece = self.pieces.last().map_or(true, |p| p.page != page);
        if opens_piece {
            let accepted = if self.pieces.is_empty() {
                Vec::new()
            } else {
                self.reprints
                    .iter()
                    .map(|(node, _)| Fragment::Reprint(*node))
                    .collect()
            };
            self.pieces.push(Piece { page, accepted });
        }
        if let Some(piece) = self.pieces.last_mut() {
            piece.accepted.push(fragment);
        }
    }

    pub fn remember_repeat(&mut self, node: &'a ContentNode, height: f64) {
        self.reprints.push((node, height));
    }

    /// Space this container claims at the top of each continuation page.
    fn continuation_height(&self) -> f64 {
        self.node.insets.top + self.reprints.iter().map(|(_, h)| *h).sum::<f64>()
    }

    /// Turn the collected pieces into linked partial containers.
    pub fn into_pieces(self) -> Vec<PartialContainer<'a>> {
        let node = self.node;
        let pages: Vec<usize> = self.pieces.iter().map(|p| p.page).collect();
        self.pieces
            .into_iter()
            .enumerate()
            .map(|(i, piece)| PartialContainer {
                node,
                piece: i,
                page: piece.page,
                accepted: piece.accepted,
                continuation: pages.get(i + 1).copied(),
            })
            .collect()
    }
}

/// Arena of the frames currently open, innermost last.
#[derive(Debug, Default)]
pub struct CropStack<'a> {
    frames: Vec<CropFrame<'a>>,
}

impl<'a> CropStack<'a> {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn open(
        &mut self,
        node: &'a ContentNode,
        page: usize,
        parent: Option<CropHandle>,
    ) -> CropHandle {
        self.frames.push(CropFrame::new(node, page, parent));
        CropHandle(self.frames.len() - 1)
    }

    pub fn get(&self, handle: CropHandle) -> &CropFrame<'a> {
        &self.frames[handle.0]
    }

    pub fn get_mut(&mut self, handle: CropHandle) -> &mut CropFrame<'a> {
        &mut self.frames[handle.0]
    }

    /// Close the innermost frame. Frames close in reverse opening order.
    pub fn close(&mut self, handle: CropHandle) -> CropFrame<'a> {
        debug_assert_eq!(
            handle.0 + 1,
            self.frames.len(),
            "only the innermost crop frame can close"
        );
        self.frames.remove(handle.0)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Move `handle` and every ancestor to `page`. Returns the space the moved
    /// frames claim at the top of the new page.
    pub fn move_to_page(&mut self, handle: CropHandle, page: usize) -> f64 {
        let mut reserved = 0.0;
        let mut current = Some(handle);
        while let Some(h) = current {
            let frame = &mut self.frames[h.0];
            frame.page = page;
            reserved += frame.continuation_height();
            current = frame.parent;
        }
        reserved
    }
}
