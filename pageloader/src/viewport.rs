use alloc::vec::Vec;

use crate::ItemPosition;

/// Consumes visible-item-position updates pushed by the host viewport.
///
/// Both queries return `None` while no items are visible (empty list, not yet
/// laid out, or a discarded viewport after [`Self::detach`]); trigger logic
/// treats `None` as "do nothing" so no fetch fires before layout settles.
#[derive(Clone, Debug, Default)]
pub struct ViewportTracker {
    positions: Vec<ItemPosition>,
}

impl ViewportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the tracked positions with a fresh batch from the viewport.
    pub fn update_positions(&mut self, positions: &[ItemPosition]) {
        self.positions.clear();
        self.positions.extend_from_slice(positions);
    }

    /// Drops all tracked positions.
    ///
    /// Call this when the viewport is recreated (e.g. after a full refresh):
    /// indices from a discarded viewport are meaningless, and queries stay
    /// `None` until the fresh viewport pushes positions.
    pub fn detach(&mut self) {
        self.positions.clear();
    }

    /// Lowest index of an item still inside the viewport: its trailing edge
    /// has not yet left through the start.
    pub fn first_visible_index(&self) -> Option<usize> {
        self.positions
            .iter()
            .filter(|p| p.trailing_edge > 0.0)
            .map(|p| p.index)
            .min()
    }

    /// Highest index of an item still inside the viewport: its leading edge
    /// has not yet left through the end.
    pub fn last_visible_index(&self) -> Option<usize> {
        self.positions
            .iter()
            .filter(|p| p.leading_edge < 1.0)
            .map(|p| p.index)
            .max()
    }
}
