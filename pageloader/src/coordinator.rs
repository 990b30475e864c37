use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::key::RequestKey;
use crate::{BuildInfo, LoadStatus, PageDirection};

#[cfg(feature = "std")]
type KeySet<K> = std::collections::HashSet<K>;
#[cfg(not(feature = "std"))]
type KeySet<K> = alloc::collections::BTreeSet<K>;

/// Cooperative cancellation flag for one outstanding page request.
///
/// Cancellation does not stop the underlying fetch; it signals "ignore this
/// result". Well-behaved fetch callbacks check [`Self::is_cancelled`] (or
/// compare [`crate::PageRequest::version`] against the controller) before
/// applying a late-arriving response.
#[derive(Clone, Debug, Default)]
pub struct RequestHandle {
    cancelled: Arc<AtomicBool>,
}

impl RequestHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// A page request fanned out to fetch listeners.
#[derive(Clone, Debug)]
pub struct PageRequest<K> {
    pub key: K,
    pub direction: PageDirection,
    pub handle: RequestHandle,
    /// State version the request was issued against; responses resolving
    /// after a refresh carry a stale version and must be dropped.
    pub version: u64,
}

/// A callback fired once per accepted page request.
///
/// The callback should *start* the asynchronous fetch (enqueue it, spawn it)
/// and return; it must not assume synchronous access back into the
/// controller. Every accepted request must eventually settle through exactly
/// one of `append_page`, `prepend_page`, or `fail_page_request`, or its key
/// stays in the in-flight set forever.
pub type PageRequestCallback<K> = Arc<dyn Fn(&PageRequest<K>) + Send + Sync>;

/// A callback fired on every status transition (not on every state write).
pub type StatusCallback = Arc<dyn Fn(LoadStatus) + Send + Sync>;

/// An informational callback fired after a page lands.
pub type BuildCallback = Arc<dyn Fn(BuildInfo) + Send + Sync>;

/// Identifies a registered listener for later removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Owns the registered listeners and the in-flight key set.
///
/// Fan-out iterates over a snapshot of the listener list taken at
/// notification time, so listeners added or removed during an in-progress
/// round never affect that round.
pub struct RequestCoordinator<K> {
    fetch_listeners: Vec<(ListenerId, PageRequestCallback<K>)>,
    status_listeners: Vec<(ListenerId, StatusCallback)>,
    build_listeners: Vec<(ListenerId, BuildCallback)>,
    next_listener_id: u64,
    in_flight: KeySet<K>,
    outstanding: Option<RequestHandle>,
}

impl<K> RequestCoordinator<K> {
    pub fn new() -> Self {
        Self {
            fetch_listeners: Vec::new(),
            status_listeners: Vec::new(),
            build_listeners: Vec::new(),
            next_listener_id: 0,
            in_flight: KeySet::new(),
            outstanding: None,
        }
    }

    fn next_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        id
    }

    pub fn add_page_request_listener(
        &mut self,
        f: impl Fn(&PageRequest<K>) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = self.next_id();
        self.fetch_listeners.push((id, Arc::new(f)));
        id
    }

    pub fn remove_page_request_listener(&mut self, id: ListenerId) -> bool {
        let before = self.fetch_listeners.len();
        self.fetch_listeners.retain(|(lid, _)| *lid != id);
        self.fetch_listeners.len() != before
    }

    pub fn add_status_listener(
        &mut self,
        f: impl Fn(LoadStatus) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = self.next_id();
        self.status_listeners.push((id, Arc::new(f)));
        id
    }

    pub fn remove_status_listener(&mut self, id: ListenerId) -> bool {
        let before = self.status_listeners.len();
        self.status_listeners.retain(|(lid, _)| *lid != id);
        self.status_listeners.len() != before
    }

    pub fn add_build_listener(
        &mut self,
        f: impl Fn(BuildInfo) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = self.next_id();
        self.build_listeners.push((id, Arc::new(f)));
        id
    }

    pub fn remove_build_listener(&mut self, id: ListenerId) -> bool {
        let before = self.build_listeners.len();
        self.build_listeners.retain(|(lid, _)| *lid != id);
        self.build_listeners.len() != before
    }

    pub(crate) fn clear_listeners(&mut self) {
        self.fetch_listeners.clear();
        self.status_listeners.clear();
        self.build_listeners.clear();
    }

    /// Cancels the most recent cancellable handle, if any.
    ///
    /// This does not remove the key from the in-flight set; removal belongs
    /// to whoever settles the fetch, or to a refresh clearing the whole set.
    pub fn cancel_outstanding(&mut self) {
        if let Some(handle) = self.outstanding.take() {
            pdebug!("cancel_outstanding");
            handle.cancel();
        }
    }

    pub fn notify_status_listeners(&self, status: LoadStatus) {
        let snapshot: Vec<StatusCallback> = self
            .status_listeners
            .iter()
            .map(|(_, f)| Arc::clone(f))
            .collect();
        for f in snapshot {
            f(status);
        }
    }

    pub fn notify_build_listeners(&self, info: BuildInfo) {
        let snapshot: Vec<BuildCallback> = self
            .build_listeners
            .iter()
            .map(|(_, f)| Arc::clone(f))
            .collect();
        for f in snapshot {
            f(info);
        }
    }
}

impl<K: RequestKey> RequestCoordinator<K> {
    /// Fans out a page request unless `key` is already in flight.
    ///
    /// Returns the cancellable handle for an accepted request, `None` for a
    /// suppressed duplicate. The call does not await completion.
    pub fn request_page(
        &mut self,
        key: K,
        direction: PageDirection,
        version: u64,
    ) -> Option<RequestHandle> {
        if self.in_flight.contains(&key) {
            ptrace!("request_page: key already in flight");
            return None;
        }
        self.in_flight.insert(key.clone());

        let handle = RequestHandle::new();
        self.outstanding = Some(handle.clone());
        let request = PageRequest {
            key,
            direction,
            handle: handle.clone(),
            version,
        };
        pdebug!(?direction, version, "request_page");

        let snapshot: Vec<PageRequestCallback<K>> = self
            .fetch_listeners
            .iter()
            .map(|(_, f)| Arc::clone(f))
            .collect();
        for f in snapshot {
            f(&request);
        }
        Some(handle)
    }

    /// Removes a settled key from the in-flight set.
    pub fn release(&mut self, key: &K) -> bool {
        self.in_flight.remove(key)
    }

    pub fn clear_in_flight(&mut self) {
        self.in_flight.clear();
    }

    pub fn is_in_flight(&self, key: &K) -> bool {
        self.in_flight.contains(key)
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }
}

impl<K> Default for RequestCoordinator<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> core::fmt::Debug for RequestCoordinator<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RequestCoordinator")
            .field("fetch_listeners", &self.fetch_listeners.len())
            .field("status_listeners", &self.status_listeners.len())
            .field("build_listeners", &self.build_listeners.len())
            .field("in_flight", &self.in_flight.len())
            .field("outstanding", &self.outstanding.is_some())
            .finish()
    }
}
