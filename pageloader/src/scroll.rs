/// Tracks the logical scroll anchor used to keep the visual position stable
/// across prepends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollIndexManager {
    current: usize,
}

impl ScrollIndexManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn set_current_index(&mut self, index: usize) {
        self.current = index;
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    /// Re-anchors after `prepended` items were inserted before index 0.
    ///
    /// The item the user was looking at moves from `first_visible_before` to
    /// `prepended + first_visible_before`; adopting that as the current index
    /// keeps it at the same visual offset. Falls back to the current index
    /// when the viewport had nothing visible at prepend time.
    pub fn apply_prepend(&mut self, prepended: usize, first_visible_before: Option<usize>) {
        let anchor = first_visible_before.unwrap_or(self.current);
        self.current = prepended.saturating_add(anchor);
    }
}
