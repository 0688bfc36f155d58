//! Named events with a shared sender and a shared mutable payload.
//!
//! An [`Event`] is cheap to clone: clones share the same sender and the same
//! [`Payload`]. The engine keeps a clone in its history, and every callback
//! invoked for the event sees the writes made by the callbacks before it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::value::Value;

/// Shared key/value store attached to an event.
///
/// Cloning a payload yields another handle to the same map.
#[derive(Clone, Default)]
pub struct Payload {
    inner: Arc<Mutex<BTreeMap<String, Value>>>,
}

impl Payload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.map().get(key).cloned()
    }

    /// Reads `key` as a float; integers are widened.
    #[must_use]
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.map().get(key).and_then(Value::as_float)
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.map().insert(key.into(), value.into())
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.map().contains_key(key)
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.map().remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }

    /// Runs `f` with exclusive access to the underlying map.
    ///
    /// Use this for read-modify-write updates that must not interleave with
    /// other writers.
    pub fn update<R>(&self, f: impl FnOnce(&mut BTreeMap<String, Value>) -> R) -> R {
        f(&mut self.map())
    }

    /// Returns a point-in-time copy of all entries.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.map().clone()
    }

    /// True if both handles point at the same map.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.map().iter()).finish()
    }
}

/// A named occurrence emitted by a sender.
pub struct Event<S> {
    name: String,
    sender: Arc<S>,
    payload: Payload,
}

impl<S> Event<S> {
    /// Creates an event with a fresh, empty payload.
    pub fn new(name: impl Into<String>, sender: Arc<S>) -> Self {
        Self::with_payload(name, sender, Payload::new())
    }

    /// Creates an event that writes into an existing payload.
    pub fn with_payload(name: impl Into<String>, sender: Arc<S>, payload: Payload) -> Self {
        Self {
            name: name.into(),
            sender,
            payload,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Shared handle to the sender.
    #[must_use]
    pub fn sender_arc(&self) -> &Arc<S> {
        &self.sender
    }

    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }
}

impl<S> Clone for Event<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            sender: Arc::clone(&self.sender),
            payload: self.payload.clone(),
        }
    }
}

impl<S> fmt::Debug for Event<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("payload", &self.payload)
            .finish_non_exhaustive()
    }
}
