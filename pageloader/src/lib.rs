//! A headless bidirectional paging engine for infinitely-scrolling lists.
//!
//! For adapter-level utilities (tick pumping, jump-vs-animate scrolling), see
//! the `pageloader-adapter` crate.
//!
//! This crate focuses on the request-coordination core behind an
//! infinitely-scrolling list: a single immutable paging snapshot with a
//! derived load status, viewport-driven prefetch triggers in both directions,
//! in-flight de-duplication with cooperative cancellation, and the
//! scroll-index bookkeeping that keeps the visual position stable when pages
//! are prepended.
//!
//! It is UI-agnostic and performs no I/O. A host layer is expected to
//! provide:
//! - a fetch callback that loads pages for the keys it is handed
//! - visible-item positions from its scrollable viewport
//! - rendering for items and status placeholders
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod coordinator;
mod error;
mod key;
mod options;
mod scroll;
mod state;
mod status;
mod types;
mod viewport;

#[cfg(test)]
mod tests;

pub use controller::PagingController;
pub use coordinator::{
    BuildCallback, ListenerId, PageRequest, PageRequestCallback, RequestCoordinator,
    RequestHandle, StatusCallback,
};
pub use error::PagingError;
pub use options::{
    DEFAULT_NEXT_ITEMS_THRESHOLD, DEFAULT_PREVIOUS_ITEMS_THRESHOLD, PagingOptions,
};
pub use scroll::ScrollIndexManager;
pub use state::{PageError, PagingState};
pub use types::{BuildInfo, ItemPosition, LoadStatus, PageDirection};
pub use viewport::ViewportTracker;

#[doc(hidden)]
pub use key::RequestKey;
