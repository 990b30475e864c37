use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::PageDirection;

/// Opaque error value supplied by a failed fetch.
///
/// The core makes no distinction between transient/fatal/validation failures;
/// that classification, if needed, belongs to the value itself.
pub type PageError = Arc<dyn core::error::Error + Send + Sync>;

/// An immutable snapshot of one page-load session.
///
/// The owning [`crate::PagingController`] replaces the snapshot wholesale on
/// every mutation; consumers only ever read. `items == None` means no page has
/// ever completed, while an empty-but-present list means the first page loaded
/// zero items; the two are distinct states with distinct statuses.
#[derive(Clone, Debug)]
pub struct PagingState<K, I> {
    items: Option<Vec<I>>,
    error: Option<PageError>,
    next_key: Option<K>,
    previous_key: Option<K>,
    direction: PageDirection,
    version: u64,
}

impl<K, I> PagingState<K, I> {
    pub(crate) fn initial(next_key: Option<K>, previous_key: Option<K>, version: u64) -> Self {
        Self {
            items: None,
            error: None,
            next_key,
            previous_key,
            direction: PageDirection::Initial,
            version,
        }
    }

    pub fn items(&self) -> Option<&[I]> {
        self.items.as_deref()
    }

    /// Number of loaded items; zero while no page has completed.
    pub fn item_count(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }

    /// Whether any page has ever completed (even with zero items).
    pub fn has_loaded(&self) -> bool {
        self.items.is_some()
    }

    pub fn error(&self) -> Option<&PageError> {
        self.error.as_ref()
    }

    pub fn next_key(&self) -> Option<&K> {
        self.next_key.as_ref()
    }

    pub fn previous_key(&self) -> Option<&K> {
        self.previous_key.as_ref()
    }

    pub fn has_next_page(&self) -> bool {
        self.next_key.is_some()
    }

    pub fn has_previous_page(&self) -> bool {
        self.previous_key.is_some()
    }

    pub fn direction(&self) -> PageDirection {
        self.direction
    }

    /// Monotonic counter bumped only by refresh; fetches issued against an
    /// older version must be disregarded by the caller when they resolve.
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl<K: Clone, I: Clone> PagingState<K, I> {
    pub(crate) fn appended(
        &self,
        new_items: Vec<I>,
        next_key: Option<K>,
        previous_key: Option<K>,
        direction: PageDirection,
    ) -> Self {
        let mut items = self.items.clone().unwrap_or_default();
        items.extend(new_items);
        Self {
            items: Some(items),
            error: None,
            next_key,
            previous_key,
            direction,
            version: self.version,
        }
    }

    pub(crate) fn prepended(
        &self,
        new_items: Vec<I>,
        previous_key: Option<K>,
        next_key: Option<K>,
    ) -> Self {
        let mut items = new_items;
        if let Some(existing) = &self.items {
            items.extend(existing.iter().cloned());
        }
        Self {
            items: Some(items),
            error: None,
            next_key,
            previous_key,
            direction: PageDirection::Previous,
            version: self.version,
        }
    }

    pub(crate) fn with_error(&self, error: PageError) -> Self {
        let mut next = self.clone();
        next.error = Some(error);
        next
    }

    pub(crate) fn with_error_cleared(&self) -> Self {
        let mut next = self.clone();
        next.error = None;
        next
    }
}
