//! Adapter utilities for the `pageloader` crate.
//!
//! The `pageloader` crate is UI-agnostic and focuses on the core paging state
//! machine. This crate provides small, framework-neutral helpers commonly
//! needed by adapters:
//!
//! - Tick-driven pumping of the core's deferred trigger re-checks
//! - The jump-vs-slide scroll policy with a bounded tween
//!
//! This crate is intentionally framework-agnostic (no ratatui/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod controller;
mod key;
mod tween;


pub use controller::{Controller, ScrollAction};
pub use key::PageKey;
pub use tween::{DEFAULT_SCROLL_ANIMATION_MS, Easing, ScrollTween};
