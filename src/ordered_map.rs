//! Ordered map implementation.
//!
//! This module provides the core [`OrderedMap`] type. Entries are kept in the
//! order their keys were last [`set`](OrderedMap::set): setting a key that is
//! already present drops the old entry and appends a new one at the back.
//! [`replace`](OrderedMap::replace) is the way to update a value without
//! moving it.
//!
//! # Examples
//!
//! ```
//! use omap::ordered_map::OrderedMap;
//!
//! let mut map = OrderedMap::new();
//! map.set("first", 1);
//! map.set("second", 2);
//!
//! // Iteration follows insertion order
//! let entries: Vec<_> = map.iter().collect();
//! assert_eq!(entries, [(&"first", &1), (&"second", &2)]);
//! ```
//!
//! # Concurrency
//!
//! The map does no internal locking. Share it across threads by wrapping the
//! whole map in a lock (for example `std::sync::Mutex<OrderedMap<K, V>>`).

mod iter;

use core::borrow::Borrow;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::ops::ControlFlow;
use core::ops::Index;

use hashbrown::HashTable;
pub use iter::IntoIter;
pub use iter::Iter;
pub use iter::Keys;
pub use iter::Values;

use crate::Ptr;
use crate::RandomState;
use crate::arena::Arena;
use crate::arena::Node;

#[cold]
#[inline(never)]
fn index_out_of_sync() -> ! {
    panic!("Order list entry missing from key index");
}

/// A hash map that keeps its entries in insertion order.
///
/// Internally the entries form a doubly-linked list whose nodes live in a
/// slot arena; a hash table maps each key to the slot of its node. The list
/// gives ordered traversal in both directions and O(1) unlinking, the table
/// gives O(1) average lookup.
///
/// The generic parameters are:
/// - `K`: Key type, must implement `Hash + Eq`
/// - `V`: Value type
/// - `S`: Hash builder type, defaults to the standard hasher
///
/// Note that [`set`](Self::set) on an existing key moves that key to the
/// back of the order. Most ordered maps keep the original position on
/// update; this one treats every `set` as a fresh insertion.
///
/// # Examples
///
/// ```
/// use omap::ordered_map::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// map.set("apple", 5);
/// map.set("banana", 3);
/// map.set("cherry", 8);
///
/// for (key, value) in map.iter() {
///     println!("{}: {}", key, value);
/// }
/// // Prints: apple: 5, banana: 3, cherry: 8
/// ```
#[derive(Clone)]
pub struct OrderedMap<K, V, S = RandomState> {
    head: Ptr,
    tail: Ptr,
    nodes: Arena<K, V>,
    table: HashTable<Ptr>,
    hasher: S,
}

impl<K: core::fmt::Debug, V: core::fmt::Debug, S> core::fmt::Debug for OrderedMap<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        struct Entries<'a, K, V, S>(&'a OrderedMap<K, V, S>);

        impl<K: core::fmt::Debug, V: core::fmt::Debug, S> core::fmt::Debug for Entries<'_, K, V, S> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_map().entries(self.0.iter()).finish()
            }
        }

        f.debug_struct("OrderedMap")
            .field("len", &self.len())
            .field("first", &self.first().map(|(key, _)| key))
            .field("last", &self.last().map(|(key, _)| key))
            .field("entries", &Entries(self))
            .finish()
    }
}

impl<K, V, S: Default> Default for OrderedMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty map.
    ///
    /// # Examples
    ///
    /// ```
    /// use omap::OrderedMap;
    ///
    /// let map: OrderedMap<&str, i32> = OrderedMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty map with room for at least `capacity` entries.
    ///
    /// The capacity is only a sizing hint; it has no effect on behavior.
    ///
    /// # Examples
    ///
    /// ```
    /// use omap::OrderedMap;
    ///
    /// let map: OrderedMap<&str, i32> = OrderedMap::with_capacity(10);
    /// assert!(map.capacity() >= 10);
    /// assert!(map.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::default())
    }
}

impl<K, V, S> OrderedMap<K, V, S> {
    /// Creates an empty map which will use the given hash builder.
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    /// Creates an empty map with room for at least `capacity` entries, using
    /// the given hash builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::hash::RandomState;
    ///
    /// use omap::ordered_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::with_capacity_and_hasher(4, RandomState::new());
    /// map.set(1, "one");
    /// assert_eq!(map.get(&1), Some(&"one"));
    /// ```
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        OrderedMap {
            head: Ptr::null(),
            tail: Ptr::null(),
            nodes: Arena::with_capacity(capacity),
            table: HashTable::with_capacity(capacity),
            hasher,
        }
    }

    /// Discards every entry and re-sizes the map for `capacity` entries.
    ///
    /// This is not an additive reserve: the map is re-initialized and comes
    /// back empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use omap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.set("a", 1);
    /// map.reset_with_capacity(16);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 16);
    /// ```
    pub fn reset_with_capacity(&mut self, capacity: usize) {
        log::trace!(
            "resetting ordered map with capacity {capacity}, discarding {} entries",
            self.len()
        );
        self.head = Ptr::null();
        self.tail = Ptr::null();
        self.nodes = Arena::with_capacity(capacity);
        self.table = HashTable::with_capacity(capacity);
    }

    /// Returns a reference to the map's hash builder.
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Returns the number of entries the key index can hold without
    /// reallocating.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use omap::OrderedMap;
    ///
    /// let mut a = OrderedMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.set(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry, keeping the allocated memory for reuse.
    pub fn clear(&mut self) {
        self.table.clear();
        self.nodes.clear();
        self.head = Ptr::null();
        self.tail = Ptr::null();
    }

    /// Returns the oldest entry.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.head.optional().map(|ptr| {
            let node = &self.nodes[ptr];
            (&node.key, &node.value)
        })
    }

    /// Returns the newest entry.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.tail.optional().map(|ptr| {
            let node = &self.nodes[ptr];
            (&node.key, &node.value)
        })
    }

    /// Removes and returns the oldest entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use omap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.set("a", 1);
    /// map.set("b", 2);
    /// assert_eq!(map.pop_first(), Some(("a", 1)));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let ptr = self.head.optional()?;
        let node = self.remove_ptr(ptr);
        Some((node.key, node.value))
    }

    /// Removes and returns the newest entry.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let ptr = self.tail.optional()?;
        let node = self.remove_ptr(ptr);
        Some((node.key, node.value))
    }

    /// Returns an iterator over the entries, oldest first.
    ///
    /// The iterator is double-ended: `iter().rev()` walks newest first.
    ///
    /// # Examples
    ///
    /// ```
    /// use omap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.set("a", 1);
    /// map.set("b", 2);
    /// map.set("c", 3);
    ///
    /// let keys: Vec<_> = map.iter().rev().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, ["c", "b", "a"]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            forward_ptr: self.head,
            reverse_ptr: self.tail,
            remaining: self.len(),
        }
    }

    /// Returns an iterator over the keys, oldest first.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values, oldest first.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Calls `visit` for every entry, oldest first, until it returns
    /// [`ControlFlow::Break`].
    ///
    /// The map cannot be modified while the traversal runs.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::ControlFlow;
    ///
    /// use omap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.set("a", 1);
    /// map.set("b", 2);
    /// map.set("c", 3);
    ///
    /// let mut seen = Vec::new();
    /// map.iterate(|key, _| {
    ///     seen.push(*key);
    ///     if seen.len() == 2 {
    ///         ControlFlow::Break(())
    ///     } else {
    ///         ControlFlow::Continue(())
    ///     }
    /// });
    /// assert_eq!(seen, ["a", "b"]);
    /// ```
    pub fn iterate<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V) -> ControlFlow<()>,
    {
        let _ = self.iter().try_for_each(|(key, value)| visit(key, value));
    }

    /// Calls `visit` for every entry, newest first, until it returns
    /// [`ControlFlow::Break`].
    pub fn iterate_backward<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V) -> ControlFlow<()>,
    {
        let _ = self
            .iter()
            .rev()
            .try_for_each(|(key, value)| visit(key, value));
    }

    /// Appends a new node after the current tail.
    fn push_tail(&mut self, key: K, value: V, hash: u64) -> Ptr {
        let ptr = self.nodes.alloc(key, value, hash, self.tail, Ptr::null());
        if self.tail.is_null() {
            self.head = ptr;
        } else {
            self.nodes[self.tail].next = ptr;
        }
        self.tail = ptr;
        ptr
    }

    /// Frees the node at `ptr` and stitches its neighbors together. The key
    /// index is left alone.
    fn unlink(&mut self, ptr: Ptr) -> Node<K, V> {
        let node = self.nodes.free(ptr);

        if node.prev.is_null() {
            self.head = node.next;
        } else {
            self.nodes[node.prev].next = node.next;
        }

        if node.next.is_null() {
            self.tail = node.prev;
        } else {
            self.nodes[node.next].prev = node.prev;
        }

        node
    }

    /// Removes the node at `ptr` from both the key index and the order list.
    fn remove_ptr(&mut self, ptr: Ptr) -> Node<K, V> {
        let hash = self.nodes[ptr].hash;
        match self.table.find_entry(hash, |&candidate| candidate == ptr) {
            Ok(occupied) => {
                occupied.remove();
            }
            Err(_) => index_out_of_sync(),
        }
        self.unlink(ptr)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> OrderedMap<K, V, S> {
    fn find<Q>(&self, key: &Q) -> Option<Ptr>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.is_empty() {
            return None;
        }

        let hash = self.hasher.hash_one(key);
        self.table
            .find(hash, |&ptr| key.eq(self.nodes[ptr].key.borrow()))
            .copied()
    }

    /// Removes the entry for `key` from both structures and returns its node.
    fn take<Q>(&mut self, key: &Q) -> Option<Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.is_empty() {
            return None;
        }

        let hash = self.hasher.hash_one(key);
        self.take_hashed(hash, key)
    }

    fn take_hashed<Q>(&mut self, hash: u64, key: &Q) -> Option<Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let nodes = &self.nodes;
        let ptr = match self
            .table
            .find_entry(hash, |&ptr| key.eq(nodes[ptr].key.borrow()))
        {
            Ok(occupied) => occupied.remove().0,
            Err(_) => return None,
        };

        Some(self.unlink(ptr))
    }

    /// Returns a reference to the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use omap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.set(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).map(|ptr| &self.nodes[ptr].value)
    }

    /// Returns a clone of the value stored for `key`, or `V::default()` when
    /// the key is absent.
    ///
    /// The default carries no information; use [`contains_key`] to tell a
    /// stored default apart from a missing key.
    ///
    /// [`contains_key`]: Self::contains_key
    ///
    /// # Examples
    ///
    /// ```
    /// use omap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.set("a", 7);
    /// assert_eq!(map.get_or_default("a"), 7);
    /// assert_eq!(map.get_or_default("b"), 0);
    /// ```
    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone + Default,
    {
        self.get(key).cloned().unwrap_or_default()
    }

    /// Returns a mutable reference to the value stored for `key`. Changing
    /// the value through it does not move the entry.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let ptr = self.find(key)?;
        Some(&mut self.nodes[ptr].value)
    }

    /// Returns `true` if the map contains an entry for `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Stores `value` under `key` as the newest entry.
    ///
    /// If the key was already present its old entry is removed first, so the
    /// key moves to the back of the order. The previous value, if any, is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use omap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.set("a", 1);
    /// map.set("b", 2);
    /// map.set("c", 3);
    ///
    /// assert_eq!(map.set("b", 20), Some(2));
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, ["a", "c", "b"]);
    /// ```
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hasher.hash_one(&key);
        let previous = self.take_hashed(hash, &key).map(|node| node.value);

        let ptr = self.push_tail(key, value, hash);
        let nodes = &self.nodes;
        self.table.insert_unique(hash, ptr, |&ptr| nodes[ptr].hash);

        previous
    }

    /// Removes the entry for `key`. Returns `true` if it was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use omap::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.set("test", 1);
    /// assert!(map.delete("test"));
    /// assert!(!map.delete("test"));
    /// ```
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.take(key).is_some()
    }

    /// Removes the entry for `key` and returns its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.take(key).map(|node| node.value)
    }

    /// Removes the entry for `key` and returns the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.take(key).map(|node| (node.key, node.value))
    }

    /// Overwrites the value for an existing `key` without moving it.
    ///
    /// Returns `false` and leaves the map untouched if the key is absent; no
    /// entry is created.
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
    /// assert!(map.replace("a", 10));
    /// assert!(!map.replace("z", 0));
    /// let entries: Vec<_> = map.iter().collect();
    /// assert_eq!(entries, [(&"a", &10), (&"b", &2)]);
    /// ```
    pub fn replace<Q>(&mut self, key: &Q, value: V) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.get_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

impl<K, V, S> PartialEq for OrderedMap<K, V, S>
where
    K: PartialEq,
    V: PartialEq,
{
    /// Two maps are equal when they hold equal entries in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, S> Eq for OrderedMap<K, V, S> {}

impl<K, Q, V, S> Index<&Q> for OrderedMap<K, V, S>
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    type Output = V;

    fn index(&self, key: &Q) -> &Self::Output {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V, S> FromIterator<(K, V)> for OrderedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity_and_hasher(iter.size_hint().0, S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for OrderedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<'a, K, V, S> Extend<(&'a K, &'a V)> for OrderedMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key.clone(), value.clone());
        }
    }
}

impl<K, V, S> IntoIterator for OrderedMap<K, V, S> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        let remaining = self.len();
        IntoIter {
            nodes: self.nodes,
            forward_ptr: self.head,
            reverse_ptr: self.tail,
            remaining,
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a OrderedMap<K, V, S> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
