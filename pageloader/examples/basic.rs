// Example: forward-only feed driven by a simulated fetch callback.
use std::sync::{Arc, Mutex};

use pageloader::{ItemPosition, PagingController, PagingOptions};

fn main() {
    let mut c: PagingController<usize, String> =
        PagingController::new(PagingOptions::new(0).with_next_items_threshold(3));

    // The fetch listener starts the "asynchronous" work; here it just queues
    // the key so the main loop can resolve it.
    let pending = Arc::new(Mutex::new(Vec::new()));
    let queue = Arc::clone(&pending);
    c.add_page_request_listener(move |req| {
        queue.lock().unwrap().push(req.key);
    })
    .unwrap();
    c.add_status_listener(|status| println!("status -> {status:?}"))
        .unwrap();

    // The status notification for LoadingFirstPage issues the first request.
    c.start().unwrap();

    for _ in 0..3 {
        // Resolve whatever the controller asked for: 10 items per page, three
        // pages in total.
        for key in pending.lock().unwrap().drain(..) {
            let items: Vec<String> = (0..10).map(|i| format!("item {}", key * 10 + i)).collect();
            let next_key = if key < 2 { Some(key + 1) } else { None };
            c.append_page(items, next_key, None).unwrap();
        }

        // Simulate the viewport sitting near the end of the loaded list.
        let count = c.item_count();
        let positions: Vec<ItemPosition> = (count.saturating_sub(3)..count)
            .map(|i| ItemPosition::new(i, 0.0, 1.0))
            .collect();
        c.update_viewport(&positions).unwrap();

        println!("loaded={} status={:?}", c.item_count(), c.status());
    }
}
