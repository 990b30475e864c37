use crate::{LoadStatus, PagingState};

impl<K, I> PagingState<K, I> {
    /// Derives the single status describing this snapshot.
    ///
    /// Predicates are evaluated in a fixed priority order; the order itself is
    /// part of the contract because it disambiguates overlapping conditions
    /// (e.g. "loading next" vs "previous just completed"):
    ///
    /// 1. loading next: forward direction, non-empty items, next key, no error
    /// 2. loading previous: previous direction, non-empty items, previous key,
    ///    no error
    /// 3. completed: non-empty items, both keys absent
    /// 4. previous completed: non-empty items, previous key absent
    /// 5. next completed: non-empty items, next key absent
    /// 6. loading first page: no page has completed, no error
    /// 7. next page error: forward direction, non-empty items, next key, error
    /// 8. previous page error: previous direction, non-empty items, previous
    ///    key, error
    /// 9. no items found: a page completed with zero items
    /// 10. first page error: no page has completed, error
    ///
    /// The loading checks deliberately precede the completed checks: a page
    /// that just finished in one direction still reports as loading while the
    /// opposite key exists and no error is stored. A direction with no key
    /// cannot loop, which is what keeps `Completed` reachable at all. Do not
    /// reorder.
    pub fn status(&self) -> LoadStatus {
        let has_items = self.items().is_some_and(|items| !items.is_empty());
        let loaded = self.has_loaded();
        let has_error = self.error().is_some();
        let has_next = self.has_next_page();
        let has_previous = self.has_previous_page();
        let forward = self.direction().is_forward();

        if forward && has_items && has_next && !has_error {
            return LoadStatus::LoadingNextPage;
        }
        if !forward && has_items && has_previous && !has_error {
            return LoadStatus::LoadingPreviousPage;
        }
        if has_items && !has_previous && !has_next {
            return LoadStatus::Completed;
        }
        if has_items && !has_previous {
            return LoadStatus::PreviousCompleted;
        }
        if has_items && !has_next {
            return LoadStatus::NextCompleted;
        }
        if !loaded && !has_error {
            return LoadStatus::LoadingFirstPage;
        }
        if forward && has_items && has_next && has_error {
            return LoadStatus::NextPageError;
        }
        if !forward && has_items && has_previous && has_error {
            return LoadStatus::PreviousPageError;
        }
        if loaded && !has_items {
            return LoadStatus::NoItemsFound;
        }
        LoadStatus::FirstPageError
    }
}
