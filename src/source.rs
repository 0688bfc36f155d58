//! Event sources: the publish/subscribe capability the engine consumes.
//!
//! [`EventSource`] is the seam. [`Stream`] is the in-memory implementation:
//! a named channel that forwards events to its attached subscribers while it
//! is open. A [`Subject`] is the publishing side; streams watch a subject and
//! receive the events whose name matches their own.
//!
//! Delivery is synchronous. Locks are released before any subscriber runs, and
//! the first subscriber error stops delivery and is returned to the publisher.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DetectResult;
use crate::event::Event;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Unique identifier for an event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(Uuid);

impl SourceId {
    /// Create a new random source id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    /// Create a new random subscriber id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

type Handler<S> = Arc<dyn Fn(&Event<S>) -> DetectResult<()> + Send + Sync>;

/// A delivery target registered on a source.
pub struct Subscriber<S> {
    id: SubscriberId,
    handler: Handler<S>,
}

impl<S> Subscriber<S> {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Event<S>) -> DetectResult<()> + Send + Sync + 'static,
    {
        Self {
            id: SubscriberId::new(),
            handler: Arc::new(handler),
        }
    }

    #[must_use]
    pub const fn id(&self) -> SubscriberId {
        self.id
    }

    /// Hand one event to the subscriber.
    pub fn deliver(&self, event: &Event<S>) -> DetectResult<()> {
        (self.handler)(event)
    }
}

impl<S> Clone for Subscriber<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<S> fmt::Debug for Subscriber<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Publish/subscribe capability consumed by the detector.
pub trait EventSource<S>: Send + Sync {
    fn id(&self) -> SourceId;

    /// Event name this source carries.
    fn name(&self) -> &str;

    /// Register a subscriber. Attaching the same subscriber twice is a no-op.
    fn attach(&self, subscriber: Subscriber<S>);

    /// Remove a subscriber; returns false if it was not attached.
    fn detach(&self, id: SubscriberId) -> bool;

    fn open(&self);

    fn close(&self);

    fn is_open(&self) -> bool;

    /// Start receiving events published by `subject`.
    fn watch(&self, subject: &Subject<S>);

    /// Stop receiving events published by `subject`.
    fn unwatch(&self, subject: &Subject<S>);
}

struct StreamInner<S> {
    id: SourceId,
    name: String,
    open: AtomicBool,
    subscribers: Mutex<Vec<Subscriber<S>>>,
}

/// In-memory named event stream.
///
/// Cloning yields another handle to the same stream.
pub struct Stream<S> {
    inner: Arc<StreamInner<S>>,
}

impl<S> Stream<S> {
    /// Creates a closed stream with no subscribers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(StreamInner {
                id: SourceId::new(),
                name: name.into(),
                open: AtomicBool::new(false),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.subscribers).len()
    }

    /// Forward `event` to every subscriber if the stream is open.
    pub fn deliver(&self, event: &Event<S>) -> DetectResult<()> {
        if !self.inner.open.load(Ordering::Acquire) {
            return Ok(());
        }

        let subscribers: Vec<Subscriber<S>> = lock(&self.inner.subscribers).clone();
        for subscriber in &subscribers {
            subscriber.deliver(event)?;
        }
        Ok(())
    }
}

impl<S> Clone for Stream<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> fmt::Debug for Stream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("open", &self.inner.open.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<S: Send + Sync + 'static> EventSource<S> for Stream<S> {
    fn id(&self) -> SourceId {
        self.inner.id
    }

    fn name(&self) -> &str {
        &self.inner.name
    }

    fn attach(&self, subscriber: Subscriber<S>) {
        let mut subscribers = lock(&self.inner.subscribers);
        if !subscribers.iter().any(|s| s.id == subscriber.id) {
            subscribers.push(subscriber);
        }
    }

    fn detach(&self, id: SubscriberId) -> bool {
        let mut subscribers = lock(&self.inner.subscribers);
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }

    fn open(&self) {
        self.inner.open.store(true, Ordering::Release);
    }

    fn close(&self) {
        self.inner.open.store(false, Ordering::Release);
    }

    fn is_open(&self) -> bool {
        self.inner.open.load(Ordering::Acquire)
    }

    fn watch(&self, subject: &Subject<S>) {
        subject.observe(self.clone());
    }

    fn unwatch(&self, subject: &Subject<S>) {
        subject.forget(self.inner.id);
    }
}

impl<S> From<&str> for Stream<S> {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl<S> From<String> for Stream<S> {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Publishing side of the event plumbing.
///
/// Cloning yields another handle to the same set of watching streams.
pub struct Subject<S> {
    streams: Arc<Mutex<Vec<Stream<S>>>>,
}

impl<S> Subject<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            streams: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn observe(&self, stream: Stream<S>) {
        let mut streams = lock(&self.streams);
        if !streams.iter().any(|s| Arc::ptr_eq(&s.inner, &stream.inner)) {
            streams.push(stream);
        }
    }

    fn forget(&self, id: SourceId) {
        lock(&self.streams).retain(|s| s.inner.id != id);
    }

    /// Number of streams currently watching.
    #[must_use]
    pub fn watcher_count(&self) -> usize {
        lock(&self.streams).len()
    }

    /// Publish `event` to the streams named after it.
    pub fn notify(&self, event: &Event<S>) -> DetectResult<()> {
        self.notify_as(event.name(), event)
    }

    /// Publish `event` to the streams named `name`.
    pub fn notify_as(&self, name: &str, event: &Event<S>) -> DetectResult<()> {
        let targets: Vec<Stream<S>> = lock(&self.streams)
            .iter()
            .filter(|s| s.inner.name == name)
            .cloned()
            .collect();

        for stream in &targets {
            stream.deliver(event)?;
        }
        Ok(())
    }
}

impl<S> Default for Subject<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for Subject<S> {
    fn clone(&self) -> Self {
        Self {
            streams: Arc::clone(&self.streams),
        }
    }
}

impl<S> fmt::Debug for Subject<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("watchers", &self.watcher_count())
            .finish()
    }
}

/// Anything that names an event: plain strings or a stream.
pub trait EventName {
    fn event_name(&self) -> String;
}

impl EventName for str {
    fn event_name(&self) -> String {
        self.to_string()
    }
}

impl EventName for String {
    fn event_name(&self) -> String {
        self.clone()
    }
}

impl<S> EventName for Stream<S> {
    fn event_name(&self) -> String {
        self.inner.name.clone()
    }
}

impl<T: EventName + ?Sized> EventName for &T {
    fn event_name(&self) -> String {
        (**self).event_name()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn counting_subscriber(hits: &Arc<AtomicUsize>) -> Subscriber<()> {
        let hits = Arc::clone(hits);
        Subscriber::new(move |_event| {
            hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn closed_stream_drops_events() {
        let subject = Subject::new();
        let stream: Stream<()> = Stream::new("login");
        let hits = Arc::new(AtomicUsize::new(0));
        stream.attach(counting_subscriber(&hits));
        stream.watch(&subject);

        subject.notify(&Event::new("login", Arc::new(()))).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        stream.open();
        subject.notify(&Event::new("login", Arc::new(()))).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subject_routes_by_name() {
        let subject = Subject::new();
        let login: Stream<()> = Stream::new("login");
        let logout: Stream<()> = Stream::new("logout");
        let hits = Arc::new(AtomicUsize::new(0));
        login.attach(counting_subscriber(&hits));
        login.open();
        logout.open();
        login.watch(&subject);
        logout.watch(&subject);

        subject.notify(&Event::new("logout", Arc::new(()))).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        subject.notify_as("login", &Event::new("logout", Arc::new(()))).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn attach_is_idempotent_and_detach_reports() {
        let stream: Stream<()> = Stream::new("s");
        let hits = Arc::new(AtomicUsize::new(0));
        let sub = counting_subscriber(&hits);
        let id = sub.id();

        stream.attach(sub.clone());
        stream.attach(sub);
        assert_eq!(stream.subscriber_count(), 1);

        assert!(stream.detach(id));
        assert!(!stream.detach(id));
    }

    #[test]
    fn unwatch_stops_delivery() {
        let subject = Subject::new();
        let stream: Stream<()> = Stream::new("tick");
        stream.watch(&subject);
        stream.watch(&subject);
        assert_eq!(subject.watcher_count(), 1);

        stream.unwatch(&subject);
        assert_eq!(subject.watcher_count(), 0);
    }

    #[test]
    fn subscriber_error_reaches_publisher() {
        let subject = Subject::new();
        let stream: Stream<()> = Stream::new("boom");
        stream.attach(Subscriber::new(|_event| Err(crate::DetectError::config("nope"))));
        stream.open();
        stream.watch(&subject);

        let err = subject.notify(&Event::new("boom", Arc::new(()))).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn event_name_accepts_strings_and_streams() {
        let stream: Stream<()> = Stream::new("logout");
        assert_eq!("login".event_name(), "login");
        assert_eq!(String::from("x").event_name(), "x");
        assert_eq!((&stream).event_name(), "logout");
    }
}
