/// Precondition violations surfaced by [`crate::PagingController`] operations.
///
/// These are programming errors in the owning code, not recoverable runtime
/// conditions; callers typically propagate them with `?`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PagingError {
    /// The controller was used after [`crate::PagingController::dispose`].
    Disposed,
}

impl core::fmt::Display for PagingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Disposed => f.write_str("paging controller used after disposal"),
        }
    }
}

impl core::error::Error for PagingError {}
