// Example: chat-style bidirectional paging. Older messages are prepended
// above without the visible content jumping: the scroll anchor is corrected
// by the prepended count before the new page becomes observable.
use std::sync::{Arc, Mutex};

use pageloader::{ItemPosition, PageDirection, PagingOptions};
use pageloader_adapter::Controller;

fn main() {
    // Seed in the middle of the history: page 50 first, newer pages forward,
    // older pages backward.
    let options = PagingOptions::new(50usize)
        .with_first_previous_page_key(Some(49))
        .with_next_items_threshold(2)
        .with_previous_items_threshold(2);
    let mut c: Controller<usize, String> = Controller::new(options);

    let pending = Arc::new(Mutex::new(Vec::new()));
    let queue = Arc::clone(&pending);
    c.paging_mut()
        .add_page_request_listener(move |req| {
            queue.lock().unwrap().push((req.key, req.direction));
        })
        .unwrap();

    c.paging_mut().start().unwrap();
    for (key, _) in pending.lock().unwrap().drain(..) {
        let items = (0..5).map(|i| format!("msg {key}.{i}")).collect();
        c.paging_mut()
            .append_page(items, Some(key + 1), Some(key - 1))
            .unwrap();
    }
    println!(
        "seeded: {} messages, status={:?}",
        c.paging().item_count(),
        c.paging().status()
    );

    // The user scrolls to the top of the loaded history.
    let positions: Vec<ItemPosition> = (0..3).map(|i| ItemPosition::new(i, 0.0, 1.0)).collect();
    c.on_viewport_positions(&positions).unwrap();

    for (key, direction) in pending.lock().unwrap().drain(..) {
        assert_eq!(direction, PageDirection::Previous);
        let items = (0..5).map(|i| format!("msg {key}.{i}")).collect();
        let previous = key.checked_sub(1);
        c.paging_mut().prepend_page(items, previous, None).unwrap();
    }

    println!(
        "after prepend: {} messages, anchor index={}, status={:?}",
        c.paging().item_count(),
        c.paging().current_scroll_index(),
        c.paging().status()
    );
}
