use core::iter::FusedIterator;

use crate::Ptr;
use crate::arena::Arena;

#[derive(Debug)]
/// An iterator over the entries of an `OrderedMap`, oldest first.
///
/// This struct is created by the [`iter`] method on [`OrderedMap`]. See its
/// documentation for more.
///
/// [`iter`]: super::OrderedMap::iter
/// [`OrderedMap`]: super::OrderedMap
///
/// # Examples
///
/// ```
/// use omap::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// map.set("a", 1);
/// map.set("b", 2);
///
/// for (key, value) in map.iter() {
///     println!("{}: {}", key, value);
/// }
/// ```
pub struct Iter<'a, K, V> {
    pub(crate) nodes: &'a Arena<K, V>,
    pub(crate) forward_ptr: Ptr,
    pub(crate) reverse_ptr: Ptr,
    pub(crate) remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let node = &self.nodes[self.forward_ptr];
        self.forward_ptr = node.next;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let node = &self.nodes[self.reverse_ptr];
        self.reverse_ptr = node.prev;
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

#[derive(Debug)]
/// An owning iterator over the entries of an `OrderedMap`, oldest first.
///
/// This struct is created by the `into_iter` method on `OrderedMap`
/// (provided by the [`IntoIterator`] trait).
///
/// [`IntoIterator`]: core::iter::IntoIterator
///
/// # Examples
///
/// ```
/// use omap::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// map.set("a", 1);
/// map.set("b", 2);
///
/// let entries: Vec<_> = map.into_iter().collect();
/// assert_eq!(entries, [("a", 1), ("b", 2)]);
/// ```
pub struct IntoIter<K, V> {
    pub(crate) nodes: Arena<K, V>,
    pub(crate) forward_ptr: Ptr,
    pub(crate) reverse_ptr: Ptr,
    pub(crate) remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let node = self.nodes.free(self.forward_ptr);
        self.forward_ptr = node.next;
        Some((node.key, node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let node = self.nodes.free(self.reverse_ptr);
        self.reverse_ptr = node.prev;
        Some((node.key, node.value))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

/// An iterator over the keys of an `OrderedMap`, oldest first.
#[derive(Debug, Clone)]
pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of an `OrderedMap`, oldest first.
#[derive(Debug, Clone)]
pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}
