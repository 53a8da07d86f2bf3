//! # Page Break Decisions
//!
//! Logic for deciding what happens to a node at the current fill position.
//! The rules are few: anything that fits is placed, a divisible container
//! that overflows is split, an atomic band that overflows moves to the next
//! page, unless the page is still blank, in which case moving would gain
//! nothing and the band is placed oversized.

/// What to do with a node at the current fill position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakDecision {
    /// Place the entire node on the current page (it fits).
    Place,
    /// Place the entire node on the current page even though it overflows.
    /// Only happens on a blank page, where no later page could do better.
    PlaceOversized,
    /// Move the entire node to the next page (atomic).
    MoveToNextPage,
    /// Split the node: place the children that fit here, continue the rest
    /// on later pages.
    Split,
}

/// Decide how to place a node, given whether it fits at the current fill
/// position (see [`Page::fits`](super::page::Page::fits)).
pub fn decide_break(fits: bool, is_breakable: bool, page_is_blank: bool) -> BreakDecision {
    if fits {
        return BreakDecision::Place;
    }

    if is_breakable {
        return BreakDecision::Split;
    }

    if page_is_blank {
        return BreakDecision::PlaceOversized;
    }

    BreakDecision::MoveToNextPage
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_fits() {
        let decision = decide_break(true, true, false);
        assert_eq!(decision, BreakDecision::Place);
    }

    #[test]
    fn fitting_band_is_placed() {
        let decision = decide_break(true, false, false);
        assert_eq!(decision, BreakDecision::Place);
    }

    #[test]
    fn unbreakable_moves() {
        let decision = decide_break(false, false, false);
        assert_eq!(decision, BreakDecision::MoveToNextPage);
    }

    #[test]
    fn breakable_splits() {
        let decision = decide_break(false, true, false);
        assert_eq!(decision, BreakDecision::Split);
    }

    #[test]
    fn breakable_splits_even_on_blank_page() {
        let decision = decide_break(false, true, true);
        assert_eq!(decision, BreakDecision::Split);
    }

    #[test]
    fn oversized_on_blank_page_stays() {
        // Nothing is on this page yet, so a fresh page would not help
        let decision = decide_break(false, false, true);
        assert_eq!(decision, BreakDecision::PlaceOversized);
    }
}
