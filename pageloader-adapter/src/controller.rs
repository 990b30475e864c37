use pageloader::{ItemPosition, PagingController, PagingError, PagingOptions};

use crate::{DEFAULT_SCROLL_ANIMATION_MS, Easing, PageKey, ScrollTween};

/// What a scroll request resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollAction {
    /// The destination was off-screen: the index was applied directly.
    Jumped(usize),
    /// The destination was within or adjacent to the visible range: a bounded
    /// slide is running, drive it with [`Controller::tick`].
    Animating { target: usize },
}

/// A framework-neutral controller that wraps a [`PagingController`] and
/// provides common adapter workflows (deferred trigger pumping, jump-vs-slide
/// scrolling).
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_viewport_positions` when the viewport reports visible items
/// - `tick(now_ms)` each frame/timer tick, after the render pass; this pumps
///   the core's deferred trigger re-checks and advances the scroll tween
#[derive(Debug)]
pub struct Controller<K, I> {
    paging: PagingController<K, I>,
    tween: Option<ScrollTween>,
}

impl<K: PageKey, I: Clone> Controller<K, I> {
    pub fn new(options: PagingOptions<K>) -> Self {
        Self {
            paging: PagingController::new(options),
            tween: None,
        }
    }

    pub fn from_paging(paging: PagingController<K, I>) -> Self {
        Self {
            paging,
            tween: None,
        }
    }

    pub fn paging(&self) -> &PagingController<K, I> {
        &self.paging
    }

    pub fn paging_mut(&mut self) -> &mut PagingController<K, I> {
        &mut self.paging
    }

    pub fn into_paging(self) -> PagingController<K, I> {
        self.paging
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn cancel_animation(&mut self) {
        self.tween = None;
    }

    /// Forwards a fresh batch of visible-item positions to the core, which
    /// runs its trigger checks against it.
    pub fn on_viewport_positions(&mut self, positions: &[ItemPosition]) -> Result<(), PagingError> {
        self.paging.update_viewport(positions)
    }

    /// Call when the host viewport is torn down and rebuilt (e.g. after a
    /// full refresh): cancels any slide and drops the stale positions so no
    /// index math runs until the fresh viewport reports in.
    pub fn on_viewport_recreated(&mut self) -> Result<(), PagingError> {
        self.cancel_animation();
        self.paging.detach_viewport()
    }

    /// Advances the controller by one host tick.
    ///
    /// Pumps the core's deferred trigger re-checks (the "after this render
    /// pass" quantum), then advances an active slide and returns the index to
    /// apply, or `None` when no slide is running.
    pub fn tick(&mut self, now_ms: u64) -> Result<Option<usize>, PagingError> {
        self.paging.update_loading_state()?;

        let Some(tween) = self.tween else {
            return Ok(None);
        };
        let index = tween.sample(now_ms);
        self.paging.set_scroll_index(index)?;
        if tween.is_done(now_ms) {
            self.tween = None;
        }
        Ok(Some(index))
    }

    /// Scrolls to `index`: a bounded slide when the destination is within or
    /// adjacent to the visible range, a direct jump otherwise.
    ///
    /// Long slides across off-screen distances are visually jarring, so far
    /// targets never animate; near-boundary targets always get the short
    /// slide, which keeps single-step moves smooth.
    pub fn scroll_to_index(
        &mut self,
        index: usize,
        now_ms: u64,
    ) -> Result<ScrollAction, PagingError> {
        let near = match (
            self.paging.first_visible_index(),
            self.paging.last_visible_index(),
        ) {
            (Some(first), Some(last)) => {
                index.saturating_add(1) >= first && index <= last.saturating_add(1)
            }
            _ => false,
        };

        if !near {
            return Ok(ScrollAction::Jumped(self.jump_to_index(index)?));
        }

        match &mut self.tween {
            Some(tween) => tween.retarget(now_ms, index, DEFAULT_SCROLL_ANIMATION_MS),
            None => {
                let from = self.paging.current_scroll_index();
                self.tween = Some(ScrollTween::new(
                    from,
                    index,
                    now_ms,
                    DEFAULT_SCROLL_ANIMATION_MS,
                    Easing::SmoothStep,
                ));
            }
        }
        Ok(ScrollAction::Animating { target: index })
    }

    /// Applies `index` immediately, cancelling any slide.
    pub fn jump_to_index(&mut self, index: usize) -> Result<usize, PagingError> {
        self.cancel_animation();
        self.paging.set_scroll_index(index)?;
        Ok(index)
    }

    /// Starts (or retargets) a slide to `index` with an explicit duration.
    pub fn animate_to_index(
        &mut self,
        index: usize,
        now_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) -> Result<usize, PagingError> {
        match &mut self.tween {
            Some(tween) => tween.retarget(now_ms, index, duration_ms),
            None => {
                let from = self.paging.current_scroll_index();
                self.tween = Some(ScrollTween::new(from, index, now_ms, duration_ms, easing));
            }
        }
        Ok(index)
    }
}
