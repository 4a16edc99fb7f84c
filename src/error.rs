use core::fmt;

/// Returned when a mutating or iterating operation is attempted on a map that
/// was never constructed.
///
/// This is a usage error on the caller's side, not a lookup miss: a missing
/// key is reported through `bool`/`Option` results and never through this
/// type. The plain `nullable` functions panic with this error's message; the
/// `try_` variants return it.
///
/// # Examples
///
/// ```
/// use omap::OrderedMap;
/// use omap::nullable;
///
/// let mut map: Option<OrderedMap<&str, i32>> = None;
/// let err = nullable::try_set(map.as_mut(), "key", 1).unwrap_err();
/// assert_eq!(err.operation(), "set");
/// assert_eq!(err.to_string(), "cannot set: ordered map is not initialized");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UninitializedError {
    operation: &'static str,
}

impl UninitializedError {
    pub(crate) fn new(operation: &'static str) -> Self {
        log::debug!("{operation} called on an uninitialized ordered map");
        UninitializedError { operation }
    }

    /// Name of the operation that was refused.
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl fmt::Display for UninitializedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot {}: ordered map is not initialized",
            self.operation
        )
    }
}

impl core::error::Error for UninitializedError {}
