#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

mod arena;
mod error;
pub mod nullable;
pub mod ordered_map;

extern crate alloc;

#[cfg(feature = "std")]
type RandomState = std::hash::RandomState;
#[cfg(not(feature = "std"))]
type RandomState = hashbrown::DefaultHashBuilder;

/// A hash map that remembers the order in which keys were set, implemented as
/// a doubly-linked list threaded through a slot arena and indexed by a hash
/// table for O(1) lookups.
///
/// This is the main type alias using the default hasher. For custom hashers,
/// use [`ordered_map::OrderedMap`] directly.
///
/// # Examples
///
/// ```
/// use omap::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// map.set("a", 1);
/// map.set("b", 2);
/// map.set("a", 3);
///
/// // Setting an existing key moves it to the back
/// let entries: Vec<_> = map.iter().collect();
/// assert_eq!(entries, [(&"b", &2), (&"a", &3)]);
/// ```
pub type OrderedMap<K, V> = crate::ordered_map::OrderedMap<K, V, RandomState>;

pub use error::UninitializedError;
pub use ordered_map::IntoIter;
pub use ordered_map::Iter;
pub use ordered_map::Keys;
pub use ordered_map::Values;

/// Index of a slot in the node arena. `usize::MAX` marks the absence of a
/// link.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub(crate) struct Ptr(usize);

impl core::fmt::Debug for Ptr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_null() {
            write!(f, "Ptr(null)")
        } else {
            write!(f, "Ptr({})", self.0)
        }
    }
}

impl Default for Ptr {
    fn default() -> Self {
        Ptr::null()
    }
}

impl Ptr {
    pub(crate) const fn null() -> Self {
        Ptr(usize::MAX)
    }

    pub(crate) fn is_null(self) -> bool {
        self == Ptr::null()
    }

    pub(crate) fn unchecked_from(index: usize) -> Self {
        debug_assert_ne!(index, usize::MAX, "Index must not be usize::MAX");
        Ptr(index)
    }

    pub(crate) fn unchecked_get(self) -> usize {
        self.0
    }

    pub(crate) fn optional(self) -> Option<Ptr> {
        if self.is_null() { None } else { Some(self) }
    }
}
