//! Type aliases for commonly used shared-state types.
//!
//! The snapping subsystem is single-threaded by design: every collaborator
//! runs on the UI thread in response to toolkit callbacks. State shared
//! between collaborators (configuration, widget registry, coordinate
//! manager) uses `Rc<RefCell<T>>`; these aliases keep the signatures
//! readable and the pattern consistent across crates.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
///
/// This is the fundamental building block for UI-thread state management.
pub type Shared<T> = Rc<RefCell<T>>;

/// An optional shared reference, for lazily-initialized shared state.
pub type SharedOption<T> = Rc<RefCell<Option<T>>>;

/// A shared vector for single-threaded collection management.
pub type SharedVec<T> = Rc<RefCell<Vec<T>>>;

/// A shared hash map for single-threaded key-value storage.
pub type SharedHashMap<K, V> = Rc<RefCell<HashMap<K, V>>>;

/// Create a new `Shared<T>` from a value.
#[inline]
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Create a new `SharedOption<T>` initialized to `None`.
#[inline]
pub fn shared_none<T>() -> SharedOption<T> {
    Rc::new(RefCell::new(None))
}

/// Create a new `SharedOption<T>` initialized to `Some(value)`.
#[inline]
pub fn shared_some<T>(value: T) -> SharedOption<T> {
    Rc::new(RefCell::new(Some(value)))
}
