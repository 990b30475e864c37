/// Which side of the loaded list the most recent fetch extended.
///
/// This records the provenance of the *current* state snapshot. It is used to
/// disambiguate status, never to gate future requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageDirection {
    /// The seed load (no page had completed yet).
    Initial,
    Next,
    Previous,
}

impl PageDirection {
    /// `Initial` and `Next` both extend the list forward.
    pub fn is_forward(self) -> bool {
        matches!(self, Self::Initial | Self::Next)
    }
}

/// The derived status of a [`crate::PagingState`].
///
/// Exactly one status applies to any reachable state; see
/// [`crate::PagingState::status`] for the resolution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadStatus {
    /// Both directions are exhausted.
    Completed,
    /// Backward pagination is exhausted; forward may continue.
    PreviousCompleted,
    /// Forward pagination is exhausted; backward may continue.
    NextCompleted,
    /// The first page completed with zero items.
    NoItemsFound,
    LoadingFirstPage,
    FirstPageError,
    LoadingNextPage,
    NextPageError,
    LoadingPreviousPage,
    PreviousPageError,
}

impl LoadStatus {
    pub fn is_loading(self) -> bool {
        matches!(
            self,
            Self::LoadingFirstPage | Self::LoadingNextPage | Self::LoadingPreviousPage
        )
    }

    pub fn is_error(self) -> bool {
        matches!(
            self,
            Self::FirstPageError | Self::NextPageError | Self::PreviousPageError
        )
    }
}

/// The position of one currently visible item, pushed by the host viewport.
///
/// Edges are fractions of the viewport extent: `0.0` is the viewport start,
/// `1.0` the viewport end. An item straddling the start has
/// `leading_edge <= 0.0 < trailing_edge` after clamping by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemPosition {
    pub index: usize,
    pub leading_edge: f32,
    pub trailing_edge: f32,
}

impl ItemPosition {
    pub fn new(index: usize, leading_edge: f32, trailing_edge: f32) -> Self {
        Self {
            index,
            leading_edge,
            trailing_edge,
        }
    }
}

/// Snapshot handed to build-completion listeners after a page lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildInfo {
    pub item_count: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}
