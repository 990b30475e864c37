use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::coordinator::{ListenerId, PageRequest, RequestCoordinator};
use crate::key::RequestKey;
use crate::{
    BuildInfo, ItemPosition, LoadStatus, PageDirection, PageError, PagingError, PagingOptions,
    PagingState, ScrollIndexManager, ViewportTracker,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Active,
    Disposed,
}

/// The composition root of the paging core.
///
/// Owns one [`PagingState`] snapshot and replaces it wholesale on every
/// mutation; the new status is derived after each replacement and announced to
/// status listeners only when it differs from the previous one. Fetching is
/// delegated to registered page-request listeners via the internal
/// [`RequestCoordinator`], which de-duplicates in-flight keys.
///
/// The controller is sans-IO and single-threaded by design: it never awaits.
/// A fetch listener starts the asynchronous work and later settles it through
/// [`Self::append_page`], [`Self::prepend_page`], or
/// [`Self::fail_page_request`]. Trigger re-checks after a page mutation are
/// deferred: the host calls [`Self::update_loading_state`] on its next update
/// pass (the adapter crate's `Controller::tick` does this), so trigger
/// decisions never read viewport indices from before the mutation's relayout.
pub struct PagingController<K, I> {
    options: PagingOptions<K>,
    state: PagingState<K, I>,
    coordinator: RequestCoordinator<K>,
    tracker: ViewportTracker,
    scroll_index: ScrollIndexManager,
    last_status: LoadStatus,
    requests_allowed: bool,
    started: bool,
    layout_generation: u64,
    lifecycle: Lifecycle,
}

impl<K: RequestKey, I: Clone> PagingController<K, I> {
    /// Creates a controller in the `LoadingFirstPage` state.
    ///
    /// No fetch is issued here; call [`Self::start`] once listeners are
    /// registered.
    pub fn new(options: PagingOptions<K>) -> Self {
        let state = PagingState::initial(
            Some(options.first_page_key.clone()),
            options.first_previous_page_key.clone(),
            0,
        );
        let last_status = state.status();
        pdebug!(
            next_threshold = options.next_items_threshold,
            previous_threshold = options.previous_items_threshold,
            "PagingController::new"
        );
        Self {
            options,
            state,
            coordinator: RequestCoordinator::new(),
            tracker: ViewportTracker::new(),
            scroll_index: ScrollIndexManager::new(),
            last_status,
            requests_allowed: true,
            started: false,
            layout_generation: 0,
            lifecycle: Lifecycle::Active,
        }
    }

    fn ensure_active(&self) -> Result<(), PagingError> {
        match self.lifecycle {
            Lifecycle::Active => Ok(()),
            Lifecycle::Disposed => Err(PagingError::Disposed),
        }
    }

    /// Announces the current status and lets the controller's own reaction
    /// issue the first page request.
    ///
    /// The initial fetch is driven solely by this status notification, never
    /// by the constructor. Calling `start` again is a no-op; the in-flight set
    /// additionally guarantees the first key is only fetched once.
    pub fn start(&mut self) -> Result<(), PagingError> {
        self.ensure_active()?;
        if self.started {
            return Ok(());
        }
        self.started = true;
        let status = self.state.status();
        self.last_status = status;
        pdebug!(?status, "start");
        self.coordinator.notify_status_listeners(status);
        self.react_to_status(status);
        Ok(())
    }

    fn react_to_status(&mut self, status: LoadStatus) {
        if status != LoadStatus::LoadingFirstPage {
            return;
        }
        if let Some(key) = self.state.next_key().cloned() {
            let version = self.state.version();
            self.coordinator
                .request_page(key, PageDirection::Initial, version);
        }
    }

    /// Announces the status transition (if any) before the new snapshot
    /// becomes observable, then installs it.
    fn install_state(&mut self, next: PagingState<K, I>) {
        let status = next.status();
        if status != self.last_status {
            self.last_status = status;
            ptrace!(?status, "status transition");
            self.coordinator.notify_status_listeners(status);
        }
        self.state = next;
        self.react_to_status(status);
    }

    fn notify_build(&self) {
        self.coordinator.notify_build_listeners(BuildInfo {
            item_count: self.state.item_count(),
            has_next_page: self.state.has_next_page(),
            has_previous_page: self.state.has_previous_page(),
        });
    }

    /// Installs a page fetched in the forward direction.
    ///
    /// `items` are concatenated after the existing ones and `next_key`
    /// replaces the old forward key (`None` marks forward pagination
    /// exhausted). `previous_key` is only honored on the seed load, where it
    /// marks a bidirectional session; supplying it later is ignored with a
    /// warning. Settling releases the fetched key from the in-flight set.
    pub fn append_page(
        &mut self,
        items: Vec<I>,
        next_key: Option<K>,
        previous_key: Option<K>,
    ) -> Result<(), PagingError> {
        self.ensure_active()?;
        // Pending reset-loading-allowed bookkeeping runs before the new state
        // is installed.
        self.requests_allowed = true;

        let seed = !self.state.has_loaded();
        if !seed && previous_key.is_some() {
            pwarn!("append_page: previous key ignored after the seed load");
        }
        let direction = if seed && previous_key.is_some() {
            PageDirection::Initial
        } else {
            PageDirection::Next
        };
        let kept_previous = previous_key
            .filter(|_| seed)
            .or_else(|| self.state.previous_key().cloned());

        if let Some(key) = self.state.next_key().cloned() {
            self.coordinator.release(&key);
        }

        pdebug!(count = items.len(), "append_page");
        let next = self.state.appended(items, next_key, kept_previous, direction);
        self.install_state(next);
        self.notify_build();
        Ok(())
    }

    /// Installs a page fetched in the backward direction.
    ///
    /// `items` are concatenated before the existing ones and `previous_key`
    /// replaces the old backward key. The scroll anchor is corrected *before*
    /// the new snapshot is installed (and the layout generation bumped), so
    /// the item the user was looking at keeps its visual offset instead of
    /// jumping by the prepended count.
    pub fn prepend_page(
        &mut self,
        items: Vec<I>,
        previous_key: Option<K>,
        next_key: Option<K>,
    ) -> Result<(), PagingError> {
        self.ensure_active()?;
        self.requests_allowed = true;

        let seed = !self.state.has_loaded();
        if !seed && next_key.is_some() {
            pwarn!("prepend_page: next key ignored after the seed load");
        }
        let kept_next = next_key
            .filter(|_| seed)
            .or_else(|| self.state.next_key().cloned());

        if let Some(key) = self.state.previous_key().cloned() {
            self.coordinator.release(&key);
        }

        let prepended = items.len();
        let first_visible = self.tracker.first_visible_index();
        self.scroll_index.apply_prepend(prepended, first_visible);
        self.layout_generation = self.layout_generation.saturating_add(1);

        pdebug!(
            count = prepended,
            anchor = self.scroll_index.current_index(),
            "prepend_page"
        );
        let next = self.state.prepended(items, previous_key, kept_next);
        self.install_state(next);
        self.notify_build();
        Ok(())
    }

    /// Discards the session and begins a fresh one.
    ///
    /// Cancels the outstanding request handle, clears the whole in-flight
    /// set, resets the scroll anchor, detaches the (now meaningless) viewport
    /// positions, and installs the initial state (optionally re-seeded with a
    /// new first key) under a strictly larger version so late responses from
    /// before the refresh can be recognized as stale.
    pub fn refresh(&mut self, first_page_key: Option<K>) -> Result<(), PagingError> {
        self.ensure_active()?;
        pdebug!("refresh");
        self.coordinator.cancel_outstanding();
        self.coordinator.clear_in_flight();
        self.scroll_index.reset();
        self.tracker.detach();
        self.layout_generation = self.layout_generation.saturating_add(1);
        self.requests_allowed = true;

        let key = first_page_key.unwrap_or_else(|| self.options.first_page_key.clone());
        let version = self.state.version().saturating_add(1);
        let next = PagingState::initial(
            Some(key),
            self.options.first_previous_page_key.clone(),
            version,
        );
        self.install_state(next);
        Ok(())
    }

    /// Clears the stored error; nothing is replayed here.
    ///
    /// For a failed first page the resulting `LoadingFirstPage` transition
    /// re-issues the request directly. For a failed subsequent page the next
    /// trigger check re-fires it, driven by the unchanged viewport on the
    /// host's next [`Self::update_loading_state`] pass, provided the failed
    /// fetch released its key.
    pub fn retry_last_failed_request(&mut self) -> Result<(), PagingError> {
        self.ensure_active()?;
        if self.state.error().is_none() {
            return Ok(());
        }
        pdebug!("retry_last_failed_request");
        let next = self.state.with_error_cleared();
        self.install_state(next);
        Ok(())
    }

    /// Stores a fetch failure without releasing any in-flight key.
    ///
    /// The key stays suppressed until it is explicitly released by settlement
    /// or by [`Self::refresh`]; the normal failure path for a fetch listener
    /// is [`Self::fail_page_request`], which does both.
    pub fn set_error(
        &mut self,
        error: impl core::error::Error + Send + Sync + 'static,
    ) -> Result<(), PagingError> {
        self.set_page_error(Arc::new(error))
    }

    /// Same as [`Self::set_error`], for an already type-erased value.
    pub fn set_page_error(&mut self, error: PageError) -> Result<(), PagingError> {
        self.ensure_active()?;
        pdebug!("set_page_error");
        let next = self.state.with_error(error);
        self.install_state(next);
        Ok(())
    }

    /// Settles a failed fetch: releases `key` and stores the error.
    pub fn fail_page_request(
        &mut self,
        key: &K,
        error: impl core::error::Error + Send + Sync + 'static,
    ) -> Result<(), PagingError> {
        self.ensure_active()?;
        self.coordinator.release(key);
        self.set_page_error(Arc::new(error))
    }

    /// Removes `key` from the in-flight set without touching the state.
    pub fn release_page_request(&mut self, key: &K) -> Result<bool, PagingError> {
        self.ensure_active()?;
        Ok(self.coordinator.release(key))
    }

    /// Ingests a fresh batch of visible-item positions and runs both trigger
    /// checks against it.
    pub fn update_viewport(&mut self, positions: &[ItemPosition]) -> Result<(), PagingError> {
        self.ensure_active()?;
        self.tracker.update_positions(positions);
        self.run_trigger_checks();
        Ok(())
    }

    /// Drops the tracked viewport positions.
    ///
    /// Call when the host viewport is recreated; trigger checks stay inert
    /// until the fresh viewport pushes positions.
    pub fn detach_viewport(&mut self) -> Result<(), PagingError> {
        self.ensure_active()?;
        self.tracker.detach();
        Ok(())
    }

    /// Re-arms the trigger gate after a page mutation and re-runs both checks
    /// against the current viewport.
    ///
    /// Hosts call this once per update pass, *after* the mutation's effects on
    /// layout are visible.
    pub fn update_loading_state(&mut self) -> Result<(), PagingError> {
        self.ensure_active()?;
        self.requests_allowed = true;
        self.run_trigger_checks();
        Ok(())
    }

    fn run_trigger_checks(&mut self) {
        if let Some(last) = self.tracker.last_visible_index() {
            self.check_next_inner(last);
        }
        if let Some(first) = self.tracker.first_visible_index() {
            self.check_previous_inner(first);
        }
    }

    /// Requests the next page when `index` has crossed the forward trigger
    /// index (`item_count - next_items_threshold`, floored at zero).
    pub fn check_next_page_request(&mut self, index: usize) -> Result<(), PagingError> {
        self.ensure_active()?;
        self.check_next_inner(index);
        Ok(())
    }

    /// Requests the previous page when `index` has crossed the backward
    /// trigger index (`previous_items_threshold`).
    pub fn check_previous_page_request(&mut self, index: usize) -> Result<(), PagingError> {
        self.ensure_active()?;
        self.check_previous_inner(index);
        Ok(())
    }

    fn check_next_inner(&mut self, index: usize) {
        if !self.requests_allowed || self.state.error().is_some() {
            return;
        }
        let trigger = self
            .state
            .item_count()
            .saturating_sub(self.options.next_items_threshold);
        if index < trigger {
            return;
        }
        let Some(key) = self.state.next_key().cloned() else {
            return;
        };
        ptrace!(index, trigger, "next page trigger");
        self.requests_allowed = false;
        self.coordinator
            .request_page(key, PageDirection::Next, self.state.version());
    }

    fn check_previous_inner(&mut self, index: usize) {
        if !self.requests_allowed || self.state.error().is_some() {
            return;
        }
        let trigger = self.options.previous_items_threshold;
        if index > trigger {
            return;
        }
        let Some(key) = self.state.previous_key().cloned() else {
            return;
        };
        ptrace!(index, trigger, "previous page trigger");
        self.requests_allowed = false;
        self.coordinator
            .request_page(key, PageDirection::Previous, self.state.version());
    }

    pub fn add_page_request_listener(
        &mut self,
        f: impl Fn(&PageRequest<K>) + Send + Sync + 'static,
    ) -> Result<ListenerId, PagingError> {
        self.ensure_active()?;
        Ok(self.coordinator.add_page_request_listener(f))
    }

    pub fn remove_page_request_listener(&mut self, id: ListenerId) -> Result<bool, PagingError> {
        self.ensure_active()?;
        Ok(self.coordinator.remove_page_request_listener(id))
    }

    pub fn add_status_listener(
        &mut self,
        f: impl Fn(LoadStatus) + Send + Sync + 'static,
    ) -> Result<ListenerId, PagingError> {
        self.ensure_active()?;
        Ok(self.coordinator.add_status_listener(f))
    }

    pub fn remove_status_listener(&mut self, id: ListenerId) -> Result<bool, PagingError> {
        self.ensure_active()?;
        Ok(self.coordinator.remove_status_listener(id))
    }

    pub fn add_build_listener(
        &mut self,
        f: impl Fn(BuildInfo) + Send + Sync + 'static,
    ) -> Result<ListenerId, PagingError> {
        self.ensure_active()?;
        Ok(self.coordinator.add_build_listener(f))
    }

    pub fn remove_build_listener(&mut self, id: ListenerId) -> Result<bool, PagingError> {
        self.ensure_active()?;
        Ok(self.coordinator.remove_build_listener(id))
    }

    /// Cancels the outstanding request handle and fails all further calls.
    pub fn dispose(&mut self) -> Result<(), PagingError> {
        self.ensure_active()?;
        pdebug!("dispose");
        self.coordinator.cancel_outstanding();
        self.coordinator.clear_in_flight();
        self.coordinator.clear_listeners();
        self.lifecycle = Lifecycle::Disposed;
        Ok(())
    }

    pub fn is_disposed(&self) -> bool {
        self.lifecycle == Lifecycle::Disposed
    }

    pub fn options(&self) -> &PagingOptions<K> {
        &self.options
    }

    /// The current snapshot. Consumers only read; mutation goes through the
    /// operations above.
    pub fn state(&self) -> &PagingState<K, I> {
        &self.state
    }

    pub fn status(&self) -> LoadStatus {
        self.state.status()
    }

    pub fn items(&self) -> Option<&[I]> {
        self.state.items()
    }

    pub fn item_count(&self) -> usize {
        self.state.item_count()
    }

    /// Bounds-checked item access for renderer callbacks.
    pub fn item(&self, index: usize) -> Option<&I> {
        self.state.items().and_then(|items| items.get(index))
    }

    /// Visits every loaded item in order without allocating.
    pub fn for_each_item(&self, mut f: impl FnMut(usize, &I)) {
        if let Some(items) = self.state.items() {
            for (index, item) in items.iter().enumerate() {
                f(index, item);
            }
        }
    }

    pub fn version(&self) -> u64 {
        self.state.version()
    }

    /// Rebuild key for hosts: bumped by prepend and refresh so surrounding
    /// layout re-lays out at the corrected anchor instead of visually
    /// jumping.
    pub fn layout_generation(&self) -> u64 {
        self.layout_generation
    }

    pub fn current_scroll_index(&self) -> usize {
        self.scroll_index.current_index()
    }

    pub fn set_scroll_index(&mut self, index: usize) -> Result<(), PagingError> {
        self.ensure_active()?;
        self.scroll_index.set_current_index(index);
        Ok(())
    }

    pub fn first_visible_index(&self) -> Option<usize> {
        self.tracker.first_visible_index()
    }

    pub fn last_visible_index(&self) -> Option<usize> {
        self.tracker.last_visible_index()
    }

    pub fn is_request_in_flight(&self, key: &K) -> bool {
        self.coordinator.is_in_flight(key)
    }

    pub fn in_flight_request_count(&self) -> usize {
        self.coordinator.in_flight_len()
    }

    /// Whether the trigger gate is armed (cleared the instant a trigger
    /// fires, re-armed by [`Self::update_loading_state`]).
    pub fn new_requests_allowed(&self) -> bool {
        self.requests_allowed
    }
}

impl<K, I> core::fmt::Debug for PagingController<K, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PagingController")
            .field("last_status", &self.last_status)
            .field("requests_allowed", &self.requests_allowed)
            .field("started", &self.started)
            .field("layout_generation", &self.layout_generation)
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}
