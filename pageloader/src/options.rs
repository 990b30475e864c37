/// Default number of not-yet-visible trailing items that triggers a forward
/// prefetch.
pub const DEFAULT_NEXT_ITEMS_THRESHOLD: usize = 30;

/// Default number of leading items that triggers a backward prefetch.
pub const DEFAULT_PREVIOUS_ITEMS_THRESHOLD: usize = 5;

/// Configuration for [`crate::PagingController`].
///
/// A list is forward-only unless `first_previous_page_key` is set; the
/// bidirectional behavior is the same state machine with the previous key
/// permanently absent otherwise.
#[derive(Clone, Debug)]
pub struct PagingOptions<K> {
    /// Key of the first page to request.
    pub first_page_key: K,

    /// Key of the page *before* the first page, for lists seeded somewhere in
    /// the middle of their data set. `None` means backward pagination is
    /// exhausted from the start.
    pub first_previous_page_key: Option<K>,

    /// When the last visible index comes within this many items of the end of
    /// the loaded list, the next page is requested.
    pub next_items_threshold: usize,

    /// When the first visible index comes within this many items of the start
    /// of the loaded list, the previous page is requested.
    pub previous_items_threshold: usize,
}

impl<K> PagingOptions<K> {
    pub fn new(first_page_key: K) -> Self {
        Self {
            first_page_key,
            first_previous_page_key: None,
            next_items_threshold: DEFAULT_NEXT_ITEMS_THRESHOLD,
            previous_items_threshold: DEFAULT_PREVIOUS_ITEMS_THRESHOLD,
        }
    }

    pub fn with_first_previous_page_key(mut self, key: Option<K>) -> Self {
        self.first_previous_page_key = key;
        self
    }

    pub fn with_next_items_threshold(mut self, threshold: usize) -> Self {
        self.next_items_threshold = threshold;
        self
    }

    pub fn with_previous_items_threshold(mut self, threshold: usize) -> Self {
        self.previous_items_threshold = threshold;
        self
    }
}
