use crate::*;

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use std::sync::Mutex;

#[derive(Debug)]
struct FetchFailed;

impl core::fmt::Display for FetchFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("fetch failed")
    }
}

impl core::error::Error for FetchFailed {}

type RequestLog = Arc<Mutex<Vec<(u32, PageDirection, u64)>>>;

fn recording_controller(
    options: PagingOptions<u32>,
) -> (PagingController<u32, &'static str>, RequestLog) {
    let mut c = PagingController::new(options);
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    c.add_page_request_listener(move |req| {
        sink.lock()
            .unwrap()
            .push((req.key, req.direction, req.version));
    })
    .unwrap();
    (c, log)
}

/// Fully visible items at `indexes`, each spanning the whole viewport slot.
fn visible(indexes: core::ops::Range<usize>) -> Vec<ItemPosition> {
    indexes.map(|i| ItemPosition::new(i, 0.0, 1.0)).collect()
}

#[test]
fn construction_is_loading_first_page_without_fetching() {
    let (c, log) = recording_controller(PagingOptions::new(0));
    assert_eq!(c.status(), LoadStatus::LoadingFirstPage);
    assert!(!c.state().has_loaded());
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn start_requests_first_page_exactly_once() {
    let (mut c, log) = recording_controller(PagingOptions::new(0));
    c.start().unwrap();
    c.start().unwrap();
    assert_eq!(&*log.lock().unwrap(), &[(0, PageDirection::Initial, 0)]);
    assert!(c.is_request_in_flight(&0));
}

#[test]
fn append_with_next_key_still_reports_loading() {
    // Priority rule: a page that just landed reports as loading while the
    // next key exists and no error is stored.
    let (mut c, _log) = recording_controller(PagingOptions::new(0));
    c.start().unwrap();
    c.append_page(vec!["a", "b", "c"], Some(1), None).unwrap();
    assert_eq!(c.status(), LoadStatus::LoadingNextPage);
    assert_eq!(c.items(), Some(&["a", "b", "c"][..]));
    assert!(!c.is_request_in_flight(&0));
}

#[test]
fn append_final_page_completes_when_both_directions_exhausted() {
    let (mut c, _log) = recording_controller(PagingOptions::new(0));
    c.start().unwrap();
    c.append_page(vec!["a", "b", "c"], None, None).unwrap();
    assert_eq!(c.status(), LoadStatus::Completed);
}

#[test]
fn append_final_page_with_previous_key_reports_next_completed() {
    let options = PagingOptions::new(0).with_first_previous_page_key(Some(10));
    let (mut c, _log) = recording_controller(options);
    c.start().unwrap();
    c.append_page(vec!["a"], None, None).unwrap();
    assert_eq!(c.status(), LoadStatus::NextCompleted);
    assert!(c.state().has_previous_page());
}

#[test]
fn empty_first_page_reports_no_items_found() {
    let (mut c, _log) = recording_controller(PagingOptions::new(0));
    c.start().unwrap();
    c.append_page(vec![], None, None).unwrap();
    assert_eq!(c.status(), LoadStatus::NoItemsFound);
    assert_eq!(c.item_count(), 0);
    assert!(c.state().has_loaded());
}

#[test]
fn append_concatenates_after_existing_items() {
    let (mut c, _log) = recording_controller(PagingOptions::new(0));
    c.start().unwrap();
    c.append_page(vec!["a", "b"], Some(1), None).unwrap();
    c.append_page(vec!["c"], Some(2), None).unwrap();
    assert_eq!(c.items(), Some(&["a", "b", "c"][..]));
    assert_eq!(c.item_count(), 3);
}

#[test]
fn bidirectional_seed_sets_initial_direction() {
    let (mut c, _log) = recording_controller(PagingOptions::new(0));
    c.start().unwrap();
    c.append_page(vec!["m"], Some(1), Some(100)).unwrap();
    assert_eq!(c.state().direction(), PageDirection::Initial);
    assert!(c.state().has_previous_page());
}

#[test]
fn previous_key_supplied_after_seed_is_ignored() {
    let (mut c, _log) = recording_controller(PagingOptions::new(0));
    c.start().unwrap();
    c.append_page(vec!["a"], Some(1), None).unwrap();
    c.append_page(vec!["b"], Some(2), Some(99)).unwrap();
    assert!(!c.state().has_previous_page());
}

#[test]
fn prepend_concatenates_before_existing_items_and_reanchors() {
    let options = PagingOptions::new(0).with_first_previous_page_key(Some(10));
    let (mut c, _log) = recording_controller(options);
    c.start().unwrap();
    c.append_page(vec!["d", "e", "f"], Some(1), Some(10)).unwrap();

    // The user is looking at index 1 when older items arrive.
    c.update_viewport(&visible(1..3)).unwrap();
    let generation = c.layout_generation();
    c.prepend_page(vec!["b", "c"], Some(11), None).unwrap();

    assert_eq!(c.items(), Some(&["b", "c", "d", "e", "f"][..]));
    assert_eq!(c.current_scroll_index(), 2 + 1);
    assert_eq!(c.status(), LoadStatus::LoadingPreviousPage);
    assert!(c.layout_generation() > generation);
}

#[test]
fn prepend_final_page_reports_previous_completed() {
    let options = PagingOptions::new(0).with_first_previous_page_key(Some(10));
    let (mut c, _log) = recording_controller(options);
    c.start().unwrap();
    c.append_page(vec!["d"], Some(1), Some(10)).unwrap();
    c.prepend_page(vec!["c"], None, None).unwrap();
    assert_eq!(c.status(), LoadStatus::PreviousCompleted);

    // Exhausting the forward key as well finishes the whole session.
    c.append_page(vec!["e"], None, None).unwrap();
    assert_eq!(c.status(), LoadStatus::Completed);
}

#[test]
fn status_listener_fires_once_per_distinct_transition() {
    let (mut c, _log) = recording_controller(PagingOptions::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    c.add_status_listener(move |status| sink.lock().unwrap().push(status))
        .unwrap();

    c.start().unwrap();
    c.append_page(vec!["a"], Some(1), None).unwrap();
    // Same resulting status: no duplicate notification.
    c.append_page(vec!["b"], Some(2), None).unwrap();
    c.append_page(vec!["c"], None, None).unwrap();

    assert_eq!(
        &*seen.lock().unwrap(),
        &[
            LoadStatus::LoadingFirstPage,
            LoadStatus::LoadingNextPage,
            LoadStatus::Completed,
        ]
    );
}

#[test]
fn build_listener_reports_count_and_remaining_directions() {
    let (mut c, _log) = recording_controller(PagingOptions::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    c.add_build_listener(move |info| sink.lock().unwrap().push(info))
        .unwrap();

    c.start().unwrap();
    c.append_page(vec!["a", "b"], Some(1), None).unwrap();
    assert_eq!(
        &*seen.lock().unwrap(),
        &[BuildInfo {
            item_count: 2,
            has_next_page: true,
            has_previous_page: false,
        }]
    );
}

#[test]
fn duplicate_request_for_in_flight_key_is_suppressed() {
    let mut coordinator = RequestCoordinator::new();
    let count = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&count);
    coordinator.add_page_request_listener(move |_req: &PageRequest<u32>| {
        *sink.lock().unwrap() += 1;
    });

    assert!(coordinator.request_page(5, PageDirection::Next, 0).is_some());
    assert!(coordinator.request_page(5, PageDirection::Next, 0).is_none());
    assert_eq!(*count.lock().unwrap(), 1);

    coordinator.release(&5);
    assert!(coordinator.request_page(5, PageDirection::Next, 0).is_some());
    assert_eq!(*count.lock().unwrap(), 2);
}

#[test]
fn cancel_outstanding_flags_handle_but_keeps_key_in_flight() {
    let mut coordinator = RequestCoordinator::<u32>::new();
    let handle = coordinator
        .request_page(7, PageDirection::Next, 0)
        .unwrap();
    assert!(!handle.is_cancelled());

    coordinator.cancel_outstanding();
    assert!(handle.is_cancelled());
    assert!(coordinator.is_in_flight(&7));
}

#[test]
fn error_set_does_not_release_the_in_flight_key() {
    let (mut c, log) = recording_controller(PagingOptions::new(0));
    c.start().unwrap();
    c.append_page(vec!["a"], Some(5), None).unwrap();

    // Trigger fires for key 5.
    c.update_viewport(&visible(0..1)).unwrap();
    assert_eq!(log.lock().unwrap().len(), 2);
    assert!(c.is_request_in_flight(&5));

    // An error lands while the fetch is still pending: the key must stay
    // suppressed until explicitly released.
    c.set_error(FetchFailed).unwrap();
    c.retry_last_failed_request().unwrap();
    c.update_loading_state().unwrap();
    assert_eq!(log.lock().unwrap().len(), 2);

    c.release_page_request(&5).unwrap();
    c.update_loading_state().unwrap();
    assert_eq!(log.lock().unwrap().len(), 3);
    assert_eq!(
        log.lock().unwrap().last().copied(),
        Some((5, PageDirection::Next, 0))
    );
}

#[test]
fn failed_fetch_is_not_retried_until_error_is_cleared() {
    let (mut c, log) = recording_controller(PagingOptions::new(0));
    c.start().unwrap();
    c.append_page(vec!["a"], Some(5), None).unwrap();
    c.update_viewport(&visible(0..1)).unwrap();
    assert_eq!(log.lock().unwrap().len(), 2);

    c.fail_page_request(&5, FetchFailed).unwrap();
    assert_eq!(c.status(), LoadStatus::NextPageError);

    // No automatic retry while the error is stored.
    c.update_loading_state().unwrap();
    c.update_loading_state().unwrap();
    assert_eq!(log.lock().unwrap().len(), 2);

    c.retry_last_failed_request().unwrap();
    assert_eq!(c.status(), LoadStatus::LoadingNextPage);
    c.update_loading_state().unwrap();
    assert_eq!(log.lock().unwrap().len(), 3);
}

#[test]
fn first_page_error_retry_reissues_directly() {
    let (mut c, log) = recording_controller(PagingOptions::new(0));
    c.start().unwrap();
    c.fail_page_request(&0, FetchFailed).unwrap();
    assert_eq!(c.status(), LoadStatus::FirstPageError);

    c.retry_last_failed_request().unwrap();
    assert_eq!(c.status(), LoadStatus::LoadingFirstPage);
    assert_eq!(&*log.lock().unwrap(), &[
        (0, PageDirection::Initial, 0),
        (0, PageDirection::Initial, 0),
    ]);
}

#[test]
fn refresh_resets_state_and_bumps_version() {
    let (mut c, log) = recording_controller(PagingOptions::new(0));
    c.start().unwrap();
    c.append_page(vec!["a"], Some(5), None).unwrap();
    c.update_viewport(&visible(0..1)).unwrap();
    assert!(c.is_request_in_flight(&5));
    c.set_scroll_index(7).unwrap();

    c.refresh(None).unwrap();

    assert!(!c.state().has_loaded());
    assert_eq!(c.version(), 1);
    assert_eq!(c.current_scroll_index(), 0);
    assert!(!c.is_request_in_flight(&5));
    // The loading-first-page reaction re-issues the first key under the new
    // version; that fetch is the only one in flight.
    assert_eq!(c.in_flight_request_count(), 1);
    assert_eq!(
        log.lock().unwrap().last().copied(),
        Some((0, PageDirection::Initial, 1))
    );
}

#[test]
fn refresh_can_reseed_the_first_key() {
    let (mut c, log) = recording_controller(PagingOptions::new(0));
    c.start().unwrap();
    c.refresh(Some(42)).unwrap();
    assert_eq!(
        log.lock().unwrap().last().copied(),
        Some((42, PageDirection::Initial, 1))
    );
}

#[test]
fn unknown_viewport_suppresses_triggers() {
    let (mut c, log) = recording_controller(PagingOptions::new(0));
    c.start().unwrap();
    c.append_page(vec!["a"], Some(1), None).unwrap();
    c.update_viewport(&[]).unwrap();
    c.update_loading_state().unwrap();
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[test]
fn next_trigger_fires_only_past_the_threshold() {
    let options = PagingOptions::new(0).with_next_items_threshold(3);
    let (mut c, log) = recording_controller(options);
    c.start().unwrap();
    let items: Vec<&'static str> = core::iter::repeat_n("x", 10).collect();
    c.append_page(items, Some(1), None).unwrap();

    // Trigger index is 10 - 3 = 7.
    c.update_viewport(&visible(4..7)).unwrap();
    assert_eq!(log.lock().unwrap().len(), 1);

    c.update_viewport(&visible(5..8)).unwrap();
    assert_eq!(log.lock().unwrap().len(), 2);
    assert_eq!(
        log.lock().unwrap().last().copied(),
        Some((1, PageDirection::Next, 0))
    );
}

#[test]
fn trigger_gate_blocks_repeat_fires_until_rearmed() {
    let options = PagingOptions::new(0).with_next_items_threshold(3);
    let (mut c, log) = recording_controller(options);
    c.start().unwrap();
    let items: Vec<&'static str> = core::iter::repeat_n("x", 10).collect();
    c.append_page(items, Some(1), None).unwrap();

    c.update_viewport(&visible(7..10)).unwrap();
    assert!(!c.new_requests_allowed());

    // Rapid viewport updates between the fire and the mutation landing must
    // not re-enter the check.
    c.update_viewport(&visible(8..10)).unwrap();
    c.update_viewport(&visible(9..10)).unwrap();
    assert_eq!(log.lock().unwrap().len(), 2);

    // The fetch settles; the deferred pass re-arms the gate and the next key
    // fires exactly once.
    c.append_page(vec!["y"], Some(2), None).unwrap();
    c.update_loading_state().unwrap();
    assert_eq!(log.lock().unwrap().len(), 3);
    assert_eq!(
        log.lock().unwrap().last().copied(),
        Some((2, PageDirection::Next, 0))
    );
}

#[test]
fn previous_trigger_fires_near_the_list_start() {
    let options = PagingOptions::new(0)
        .with_first_previous_page_key(Some(10))
        .with_previous_items_threshold(2);
    let (mut c, log) = recording_controller(options);
    c.start().unwrap();
    // Forward direction exhausted so only the backward trigger can fire.
    let items: Vec<&'static str> = core::iter::repeat_n("x", 8).collect();
    c.append_page(items, None, Some(10)).unwrap();

    c.update_viewport(&visible(3..6)).unwrap();
    assert_eq!(log.lock().unwrap().len(), 1);

    c.update_viewport(&visible(2..5)).unwrap();
    assert_eq!(
        log.lock().unwrap().last().copied(),
        Some((10, PageDirection::Previous, 0))
    );
}

#[test]
fn previous_error_after_prepend_reports_previous_page_error() {
    let options = PagingOptions::new(0).with_first_previous_page_key(Some(10));
    let (mut c, _log) = recording_controller(options);
    c.start().unwrap();
    c.append_page(vec!["b"], Some(1), Some(10)).unwrap();
    c.prepend_page(vec!["a"], Some(11), None).unwrap();
    c.set_error(FetchFailed).unwrap();
    assert_eq!(c.status(), LoadStatus::PreviousPageError);
}

#[test]
fn disposed_controller_fails_fast() {
    let (mut c, _log) = recording_controller(PagingOptions::new(0));
    c.start().unwrap();
    c.dispose().unwrap();
    assert!(c.is_disposed());

    assert_eq!(c.start(), Err(PagingError::Disposed));
    assert_eq!(
        c.append_page(vec!["a"], None, None),
        Err(PagingError::Disposed)
    );
    assert_eq!(c.update_viewport(&visible(0..1)), Err(PagingError::Disposed));
    assert_eq!(c.update_loading_state(), Err(PagingError::Disposed));
    assert_eq!(c.refresh(None), Err(PagingError::Disposed));
    assert_eq!(c.dispose(), Err(PagingError::Disposed));
}

#[test]
fn item_access_is_bounds_checked() {
    let (mut c, _log) = recording_controller(PagingOptions::new(0));
    c.start().unwrap();
    c.append_page(vec!["a", "b"], None, None).unwrap();

    assert_eq!(c.item(0), Some(&"a"));
    assert_eq!(c.item(2), None);

    let mut rendered = Vec::new();
    c.for_each_item(|index, item| rendered.push((index, *item)));
    assert_eq!(rendered, vec![(0, "a"), (1, "b")]);
}

#[test]
fn removed_status_listener_stops_receiving() {
    let (mut c, _log) = recording_controller(PagingOptions::new(0));
    let seen = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&seen);
    let id = c
        .add_status_listener(move |_| *sink.lock().unwrap() += 1)
        .unwrap();

    c.start().unwrap();
    assert_eq!(*seen.lock().unwrap(), 1);

    assert!(c.remove_status_listener(id).unwrap());
    c.append_page(vec!["a"], Some(1), None).unwrap();
    assert_eq!(*seen.lock().unwrap(), 1);
}

#[test]
fn viewport_tracker_uses_edge_fractions() {
    let mut tracker = ViewportTracker::new();
    assert_eq!(tracker.first_visible_index(), None);
    assert_eq!(tracker.last_visible_index(), None);

    tracker.update_positions(&[
        // Scrolled fully past the start: not visible.
        ItemPosition::new(2, -1.0, 0.0),
        // Straddles the viewport start.
        ItemPosition::new(3, -0.2, 0.1),
        ItemPosition::new(4, 0.1, 0.5),
        // Straddles the viewport end.
        ItemPosition::new(5, 0.5, 1.2),
        // Fully below the end: not visible.
        ItemPosition::new(6, 1.0, 1.5),
    ]);
    assert_eq!(tracker.first_visible_index(), Some(3));
    assert_eq!(tracker.last_visible_index(), Some(5));

    tracker.detach();
    assert_eq!(tracker.first_visible_index(), None);
}

#[test]
fn scroll_index_prepend_correction() {
    let mut manager = ScrollIndexManager::new();
    manager.apply_prepend(5, Some(2));
    assert_eq!(manager.current_index(), 7);

    // Unknown viewport at prepend time: anchor on the current index.
    manager.apply_prepend(3, None);
    assert_eq!(manager.current_index(), 10);

    manager.reset();
    assert_eq!(manager.current_index(), 0);
}

#[test]
fn request_handles_carry_the_issuing_version() {
    let (mut c, log) = recording_controller(PagingOptions::new(0));
    c.start().unwrap();
    assert_eq!(log.lock().unwrap()[0].2, 0);

    c.refresh(None).unwrap();
    // A fetch holding version 0 must drop its result; the live request
    // carries the bumped version.
    assert_eq!(log.lock().unwrap().last().unwrap().2, 1);
    assert_eq!(c.version(), 1);
}
