//! Operations on a map that may never have been constructed.
//!
//! A never-constructed map is `None`. Reads treat it as an empty map and
//! cannot fail. Writes and traversals panic with an [`UninitializedError`]
//! message rather than silently dropping the caller's data; the `try_`
//! variants hand the error back as a value instead.
//!
//! | operation            | on `None`                      |
//! |----------------------|--------------------------------|
//! | [`len`]              | `0`                            |
//! | [`get`]              | `None`                         |
//! | [`delete`]           | `false`                        |
//! | [`set`]              | panics                         |
//! | [`replace`]          | panics                         |
//! | [`iterate`]          | panics                         |
//! | [`iterate_backward`] | panics                         |
//!
//! # Examples
//!
//! ```
//! use std::ops::ControlFlow;
//!
//! use omap::OrderedMap;
//! use omap::nullable;
//!
//! let mut map: Option<OrderedMap<&str, i32>> = None;
//! assert_eq!(nullable::len(map.as_ref()), 0);
//! assert!(!nullable::delete(map.as_mut(), "a"));
//! assert!(nullable::try_set(map.as_mut(), "a", 1).is_err());
//!
//! let mut map = Some(OrderedMap::new());
//! assert_eq!(nullable::set(map.as_mut(), "a", 1), None);
//! assert!(!nullable::replace(map.as_mut(), "b", 2));
//! assert_eq!(nullable::get(map.as_ref(), "a"), Some(&1));
//! nullable::iterate(map.as_ref(), |_, _| ControlFlow::Continue(()));
//! ```
//!
//! ```should_panic
//! use omap::OrderedMap;
//! use omap::nullable;
//!
//! let mut map: Option<OrderedMap<&str, i32>> = None;
//! nullable::set(map.as_mut(), "a", 1);
//! ```

use core::borrow::Borrow;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::ops::ControlFlow;

use crate::error::UninitializedError;
use crate::ordered_map::OrderedMap;

#[cold]
#[inline(never)]
#[track_caller]
fn uninitialized(err: UninitializedError) -> ! {
    panic!("{err}");
}

/// Number of entries; `0` for a missing map.
pub fn len<K, V, S>(map: Option<&OrderedMap<K, V, S>>) -> usize {
    map.map_or(0, OrderedMap::len)
}

/// Looks up `key`; a missing map holds no keys.
pub fn get<'m, K, Q, V, S>(map: Option<&'m OrderedMap<K, V, S>>, key: &Q) -> Option<&'m V>
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    map.and_then(|map| map.get(key))
}

/// Deletes `key`; a missing map has nothing to delete.
pub fn delete<K, Q, V, S>(map: Option<&mut OrderedMap<K, V, S>>, key: &Q) -> bool
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    map.is_some_and(|map| map.delete(key))
}

/// Sets `key` to `value`, moving it to the back of the order.
///
/// # Panics
///
/// Panics if `map` is `None`.
#[track_caller]
pub fn set<K, V, S>(map: Option<&mut OrderedMap<K, V, S>>, key: K, value: V) -> Option<V>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    match try_set(map, key, value) {
        Ok(previous) => previous,
        Err(err) => uninitialized(err),
    }
}

/// Like [`set`], but returns the error instead of panicking.
///
/// # Errors
///
/// Returns [`UninitializedError`] if `map` is `None`.
pub fn try_set<K, V, S>(
    map: Option<&mut OrderedMap<K, V, S>>,
    key: K,
    value: V,
) -> Result<Option<V>, UninitializedError>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    let map = map.ok_or_else(|| UninitializedError::new("set"))?;
    Ok(map.set(key, value))
}

/// Overwrites the value of an existing `key` in place. A missing key is
/// `false`.
///
/// # Panics
///
/// Panics if `map` is `None`.
#[track_caller]
pub fn replace<K, Q, V, S>(map: Option<&mut OrderedMap<K, V, S>>, key: &Q, value: V) -> bool
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    match try_replace(map, key, value) {
        Ok(replaced) => replaced,
        Err(err) => uninitialized(err),
    }
}

/// Like [`replace`], but returns the error instead of panicking.
///
/// # Errors
///
/// Returns [`UninitializedError`] if `map` is `None`. A missing key is
/// `Ok(false)`.
pub fn try_replace<K, Q, V, S>(
    map: Option<&mut OrderedMap<K, V, S>>,
    key: &Q,
    value: V,
) -> Result<bool, UninitializedError>
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    let map = map.ok_or_else(|| UninitializedError::new("replace"))?;
    Ok(map.replace(key, value))
}

/// Visits entries oldest first until `visit` breaks.
///
/// # Panics
///
/// Panics if `map` is `None`; `visit` is not called.
#[track_caller]
pub fn iterate<K, V, S, F>(map: Option<&OrderedMap<K, V, S>>, visit: F)
where
    F: FnMut(&K, &V) -> ControlFlow<()>,
{
    if let Err(err) = try_iterate(map, visit) {
        uninitialized(err);
    }
}

/// Like [`iterate`], but returns the error instead of panicking.
///
/// # Errors
///
/// Returns [`UninitializedError`] if `map` is `None`; `visit` is not called.
pub fn try_iterate<K, V, S, F>(
    map: Option<&OrderedMap<K, V, S>>,
    visit: F,
) -> Result<(), UninitializedError>
where
    F: FnMut(&K, &V) -> ControlFlow<()>,
{
    let map = map.ok_or_else(|| UninitializedError::new("iterate"))?;
    map.iterate(visit);
    Ok(())
}

/// Visits entries newest first until `visit` breaks.
///
/// # Panics
///
/// Panics if `map` is `None`; `visit` is not called.
#[track_caller]
pub fn iterate_backward<K, V, S, F>(map: Option<&OrderedMap<K, V, S>>, visit: F)
where
    F: FnMut(&K, &V) -> ControlFlow<()>,
{
    if let Err(err) = try_iterate_backward(map, visit) {
        uninitialized(err);
    }
}

/// Like [`iterate_backward`], but returns the error instead of panicking.
///
/// # Errors
///
/// Returns [`UninitializedError`] if `map` is `None`; `visit` is not called.
pub fn try_iterate_backward<K, V, S, F>(
    map: Option<&OrderedMap<K, V, S>>,
    visit: F,
) -> Result<(), UninitializedError>
where
    F: FnMut(&K, &V) -> ControlFlow<()>,
{
    let map = map.ok_or_else(|| UninitializedError::new("iterate backward"))?;
    map.iterate_backward(visit);
    Ok(())
}
