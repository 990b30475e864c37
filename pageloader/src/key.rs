#[cfg(feature = "std")]
pub trait RequestKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<T: core::hash::Hash + Eq + Clone> RequestKey for T {}

#[cfg(not(feature = "std"))]
pub trait RequestKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<T: Ord + Clone> RequestKey for T {}
