//! The detection engine.
//!
//! A [`Detector`] subscribes to one or more event sources, records every
//! delivered event and evaluates its registered patterns against the history.
//! All evaluation happens synchronously inside the delivering call: by the
//! time `Subject::notify` returns, every callback fired by that event has run.
//!
//! Engine state sits behind a mutex so deliveries from several threads are
//! serialized. Callbacks run with that mutex held and must not publish into a
//! stream the same detector subscribes to.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, info, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{DetectorConfig, PeriodicMode};
use crate::error::{CallbackResult, DetectError, DetectResult};
use crate::event::Event;
use crate::listener::Listener;
use crate::matcher;
use crate::pattern::{PatternKind, Registration, Registry};
use crate::periodic::{PeriodicGate, Ticker};
use crate::source::{EventName, EventSource, Stream, Subject, Subscriber};
use crate::window::{self, TimeUnit, Window};

/// Name under which matched events are republished on the detector's subject.
pub const EMIT: &str = "emit";

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Event history and timing anchors.
struct Session<S> {
    history: Vec<Event<S>>,
    names: Vec<String>,
    amounts: HashMap<String, u64>,
    started_at: Option<DateTime<Utc>>,
    last_event_at: Option<DateTime<Utc>>,
    cursor: usize,
}

impl<S> Session<S> {
    fn new() -> Self {
        Self {
            history: Vec::new(),
            names: Vec::new(),
            amounts: HashMap::new(),
            started_at: None,
            last_event_at: None,
            cursor: 0,
        }
    }
}

struct Core<S> {
    registry: Registry<S>,
    session: Session<S>,
    clock: Arc<dyn Clock>,
    mode: PeriodicMode,
    subject: Subject<S>,
}

impl<S> Core<S> {
    fn ingest(&mut self, event: &Event<S>) -> DetectResult<()> {
        let now = self.clock.now();
        let name = event.name();
        let session = &mut self.session;

        if session.started_at.is_none() {
            session.started_at = Some(now);
        } else {
            session.last_event_at = Some(now);
        }
        session.history.push(event.clone());
        session.names.push(name.to_string());
        *session.amounts.entry(name.to_string()).or_insert(0) += 1;

        trace!(event = name, history = session.names.len(), "event ingested");

        let in_window = window::passes(
            self.registry.windows(),
            session.started_at,
            session.last_event_at,
        );
        let polling = self.mode == PeriodicMode::Polling;

        for registration in self.registry.iter_mut() {
            let kind = registration.kind();
            match registration {
                Registration::Any { event: target, listener } => {
                    if target.as_str() == name && in_window {
                        fire(kind, &mut **listener, event, &self.subject)?;
                    }
                }
                Registration::After {
                    threshold,
                    event: target,
                    listener,
                } => {
                    let reached = *threshold > 0
                        && target.as_str() == name
                        && session.amounts.get(name).copied() == Some(*threshold);
                    if reached && in_window {
                        session.amounts.insert(name.to_string(), 0);
                        fire(kind, &mut **listener, event, &self.subject)?;
                    }
                }
                Registration::Sequence { events, listener } => {
                    if !in_window {
                        continue;
                    }
                    let cursor = session.cursor;
                    let found = matcher::occurrences(events.as_slice(), &session.names[cursor..]).next();
                    if let Some(start) = found {
                        // Consume history up to the end of the first occurrence.
                        session.cursor = cursor + start + events.len();
                        fire(kind, &mut **listener, event, &self.subject)?;
                    }
                }
                Registration::Every { gate, tick } => {
                    if polling && gate.poll(now) {
                        debug!(kind = %kind, interval_secs = gate.interval_secs(), "periodic tick");
                        tick().map_err(|source| DetectError::Callback { kind, source })?;
                    }
                }
                Registration::Within(_) => {}
            }
        }

        Ok(())
    }

    fn poll_periodic(&mut self) {
        let now = self.clock.now();
        for registration in self.registry.iter_mut() {
            if let Registration::Every { gate, tick } = registration {
                if gate.poll(now) {
                    debug!(interval_secs = gate.interval_secs(), "periodic tick");
                    if let Err(error) = tick() {
                        warn!(error = %error, "periodic callback failed");
                    }
                }
            }
        }
    }

    fn close_session(&mut self) {
        self.session.started_at = None;
        self.session.last_event_at = None;
        self.registry.reset_periodic(None);
        self.registry.clear_listeners();
    }
}

fn fire<S>(
    kind: PatternKind,
    listener: &mut dyn Listener<S>,
    event: &Event<S>,
    subject: &Subject<S>,
) -> DetectResult<()> {
    debug!(kind = %kind, event = event.name(), "pattern matched");
    listener
        .on_match(event.sender(), event)
        .map_err(|source| DetectError::Callback { kind, source })?;
    subject.notify_as(EMIT, event)
}

/// Complex-event detector over named event streams.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use detectr::{Detector, Event, Subject};
///
/// let user = Subject::new();
/// let mut detector: Detector<()> = Detector::new();
/// detector.add_stream("login");
/// detector.add_stream("logout");
/// detector.watch(&user);
///
/// let hits = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&hits);
/// detector.sequence(["login", "logout"], move |_, _| {
///     counter.fetch_add(1, Ordering::SeqCst);
///     Ok(())
/// });
///
/// detector.open().unwrap();
/// for name in ["login", "logout", "login", "logout"] {
///     user.notify(&Event::new(name, Arc::new(()))).unwrap();
/// }
/// detector.close();
///
/// assert_eq!(hits.load(Ordering::SeqCst), 2);
/// ```
pub struct Detector<S> {
    core: Arc<Mutex<Core<S>>>,
    sources: Vec<Arc<dyn EventSource<S>>>,
    subscriber: Subscriber<S>,
    config: DetectorConfig,
    ticker: Option<Ticker>,
    open: bool,
}

impl<S: Send + Sync + 'static> Detector<S> {
    /// Detector with default configuration and the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::default())
    }

    /// Detector with the system clock.
    #[must_use]
    pub fn with_config(config: DetectorConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Detector reading time from `clock`.
    #[must_use]
    pub fn with_clock(config: DetectorConfig, clock: Arc<dyn Clock>) -> Self {
        let core = Arc::new(Mutex::new(Core {
            registry: Registry::new(),
            session: Session::new(),
            clock,
            mode: config.periodic_mode,
            subject: Subject::new(),
        }));

        let weak = Arc::downgrade(&core);
        let subscriber = Subscriber::new(move |event: &Event<S>| match weak.upgrade() {
            Some(core) => {
                let mut core = lock(&core);
                core.ingest(event)
            }
            None => Ok(()),
        });

        Self {
            core,
            sources: Vec::new(),
            subscriber,
            config,
            ticker: None,
            open: false,
        }
    }

    fn register(&mut self, registration: Registration<S>) -> &mut Self {
        let kind = registration.kind();
        if registration.is_inert() {
            debug!(kind = %kind, "pattern can never match");
        }
        debug!(kind = %kind, pattern = ?registration, "pattern registered");
        lock(&self.core).registry.register(registration);
        self
    }

    /// Fire `callback` on every `amount`-th occurrence of `event`.
    pub fn after<F>(&mut self, amount: u64, event: impl EventName, callback: F) -> &mut Self
    where
        F: FnMut(&S, &Event<S>) -> CallbackResult + Send + 'static,
    {
        self.after_with(amount, event, callback)
    }

    /// [`after`](Self::after) with any [`Listener`], such as a `Stats`.
    pub fn after_with<L>(&mut self, amount: u64, event: impl EventName, listener: L) -> &mut Self
    where
        L: Listener<S> + 'static,
    {
        self.register(Registration::After {
            threshold: amount,
            event: event.event_name(),
            listener: Box::new(listener),
        })
    }

    /// Fire `callback` on every occurrence of `event`.
    pub fn any<F>(&mut self, event: impl EventName, callback: F) -> &mut Self
    where
        F: FnMut(&S, &Event<S>) -> CallbackResult + Send + 'static,
    {
        self.any_with(event, callback)
    }

    /// [`any`](Self::any) with any [`Listener`], such as a `Stats`.
    pub fn any_with<L>(&mut self, event: impl EventName, listener: L) -> &mut Self
    where
        L: Listener<S> + 'static,
    {
        self.register(Registration::Any {
            event: event.event_name(),
            listener: Box::new(listener),
        })
    }

    /// Fire `callback` when `events` occur back to back, in order.
    pub fn sequence<I, F>(&mut self, events: I, callback: F) -> &mut Self
    where
        I: IntoIterator,
        I::Item: EventName,
        F: FnMut(&S, &Event<S>) -> CallbackResult + Send + 'static,
    {
        self.sequence_with(events, callback)
    }

    /// [`sequence`](Self::sequence) with any [`Listener`], such as a `Stats`.
    pub fn sequence_with<I, L>(&mut self, events: I, listener: L) -> &mut Self
    where
        I: IntoIterator,
        I::Item: EventName,
        L: Listener<S> + 'static,
    {
        self.register(Registration::Sequence {
            events: events.into_iter().map(|e| e.event_name()).collect(),
            listener: Box::new(listener),
        })
    }

    /// Only match `any`, `after` and `sequence` while less than `increment`
    /// units have passed since the first event of the session.
    pub fn within(&mut self, increment: u64, unit: TimeUnit) -> &mut Self {
        self.register(Registration::Within(Window::new(increment, unit)))
    }

    /// Call `callback` at most once per `seconds` interval.
    pub fn every<F>(&mut self, seconds: u64, callback: F) -> &mut Self
    where
        F: FnMut() -> CallbackResult + Send + 'static,
    {
        self.register(Registration::Every {
            gate: PeriodicGate::new(seconds),
            tick: Box::new(callback),
        })
    }

    /// Add an in-memory stream (or a stream created from a name).
    pub fn add_stream(&mut self, stream: impl Into<Stream<S>>) -> Stream<S> {
        let stream = stream.into();
        self.add_source(Arc::new(stream.clone()));
        stream
    }

    /// Add any event source. Adding the same source twice is a no-op.
    pub fn add_source(&mut self, source: Arc<dyn EventSource<S>>) {
        if self.sources.iter().any(|s| s.id() == source.id()) {
            return;
        }

        source.detach(self.subscriber.id());
        source.attach(self.subscriber.clone());
        if self.open {
            source.open();
        }
        debug!(source = source.name(), "source added");
        self.sources.push(source);
    }

    /// Detach and forget `source`. Returns false if it was never added.
    pub fn remove_stream(&mut self, source: &dyn EventSource<S>) -> bool {
        let Some(index) = self.sources.iter().position(|s| s.id() == source.id()) else {
            debug!(source = source.name(), "remove of unknown source ignored");
            return false;
        };

        let removed = self.sources.remove(index);
        removed.detach(self.subscriber.id());
        debug!(source = removed.name(), "source removed");
        true
    }

    /// Make every source watch `subject`.
    pub fn watch(&mut self, subject: &Subject<S>) -> &mut Self {
        for source in &self.sources {
            source.watch(subject);
        }
        self
    }

    /// Make every source stop watching `subject`.
    pub fn unwatch(&mut self, subject: &Subject<S>) -> &mut Self {
        for source in &self.sources {
            source.unwatch(subject);
        }
        self
    }

    /// Subscribe to and open every source.
    ///
    /// Periodic gates restart: in polling mode the next event only anchors
    /// them; in background mode they anchor now and the ticker starts.
    pub fn open(&mut self) -> DetectResult<()> {
        for source in &self.sources {
            source.detach(self.subscriber.id());
            source.attach(self.subscriber.clone());
            source.open();
        }

        let background = self.config.periodic_mode == PeriodicMode::Background;
        {
            let mut core = lock(&self.core);
            let anchor = background.then(|| core.clock.now());
            core.registry.reset_periodic(anchor);
        }

        if background && self.ticker.is_none() {
            let weak = Arc::downgrade(&self.core);
            self.ticker = Some(Ticker::spawn(self.config.background_tick(), move || {
                if let Some(core) = weak.upgrade() {
                    lock(&core).poll_periodic();
                }
            })?);
        }

        self.open = true;
        info!(sources = self.sources.len(), mode = ?self.config.periodic_mode, "detector opened");
        Ok(())
    }

    /// Close and unsubscribe from every source, end the session and clear
    /// listener state. Safe to call repeatedly.
    pub fn close(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop();
        }

        for source in &self.sources {
            source.close();
            source.detach(self.subscriber.id());
        }

        lock(&self.core).close_session();

        if self.open {
            info!(sources = self.sources.len(), "detector closed");
        }
        self.open = false;
    }

    /// Feed one event directly, bypassing the sources.
    pub fn ingest(&self, event: &Event<S>) -> DetectResult<()> {
        lock(&self.core).ingest(event)
    }

    /// True between `open` and `close`.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub const fn config(&self) -> &DetectorConfig {
        &self.config
    }

    #[must_use]
    pub fn sources(&self) -> &[Arc<dyn EventSource<S>>] {
        &self.sources
    }

    /// Publisher on which matched events are republished as [`EMIT`].
    #[must_use]
    pub fn subject(&self) -> Subject<S> {
        lock(&self.core).subject.clone()
    }

    /// Number of events recorded since construction.
    #[must_use]
    pub fn history_len(&self) -> usize {
        lock(&self.core).session.history.len()
    }

    /// Copy of every recorded event, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Event<S>> {
        lock(&self.core).session.history.clone()
    }

    /// Occurrences of `event` since its last `after` fire.
    #[must_use]
    pub fn amount(&self, event: &str) -> u64 {
        lock(&self.core).session.amounts.get(event).copied().unwrap_or(0)
    }

    /// Index in the history before which sequence matches are consumed.
    #[must_use]
    pub fn sequence_cursor(&self) -> usize {
        lock(&self.core).session.cursor
    }

    /// Time of the first event of the current session.
    #[must_use]
    pub fn session_started_at(&self) -> Option<DateTime<Utc>> {
        lock(&self.core).session.started_at
    }

    #[must_use]
    pub fn pattern_count(&self, kind: PatternKind) -> usize {
        lock(&self.core).registry.count(kind)
    }
}

impl<S: Send + Sync + 'static> Default for Detector<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Drop for Detector<S> {
    fn drop(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop();
        }
        for source in &self.sources {
            source.detach(self.subscriber.id());
        }
    }
}

impl<S> fmt::Debug for Detector<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detector")
            .field("open", &self.open)
            .field("sources", &self.sources.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Duration;

    use super::*;
    use crate::clock::ManualClock;
    use crate::stats::{StatOp, Stats};
    use crate::value::Value;

    fn manual() -> (Detector<()>, ManualClock) {
        let clock = ManualClock::new();
        let detector = Detector::with_clock(DetectorConfig::default(), Arc::new(clock.clone()));
        (detector, clock)
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnMut(&(), &Event<()>) -> CallbackResult + Send + 'static) {
        let hits = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&hits);
        (hits, move |_: &(), _: &Event<()>| {
            inner.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn feed(detector: &Detector<()>, names: &[&str]) {
        for name in names {
            detector.ingest(&Event::new(*name, Arc::new(()))).unwrap();
        }
    }

    #[test]
    fn ingest_updates_history_and_amounts() {
        let (detector, clock) = manual();
        let start = clock.now();

        feed(&detector, &["login", "login", "logout"]);

        assert_eq!(detector.history_len(), 3);
        assert_eq!(detector.amount("login"), 2);
        assert_eq!(detector.amount("logout"), 1);
        assert_eq!(detector.amount("idle"), 0);
        assert_eq!(detector.session_started_at(), Some(start));
    }

    #[test]
    fn sequence_cursor_skips_consumed_history() {
        let (mut detector, _clock) = manual();
        let (hits, cb) = counter();
        detector.sequence(["login", "logout"], cb);

        feed(&detector, &["login", "logout"]);
        assert_eq!(detector.sequence_cursor(), 2);

        feed(&detector, &["idle", "login", "logout"]);
        assert_eq!(detector.sequence_cursor(), 5);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn sequence_does_not_reuse_overlapping_positions() {
        let (mut detector, _clock) = manual();
        let (hits, cb) = counter();
        detector.sequence(["a", "a"], cb);

        feed(&detector, &["a", "a", "a"]);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        feed(&detector, &["a"]);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn after_counts_reset_on_fire() {
        let (mut detector, _clock) = manual();
        let (hits, cb) = counter();
        detector.after(3, "login", cb);

        feed(&detector, &["login", "login"]);
        assert_eq!(detector.amount("login"), 2);

        feed(&detector, &["login"]);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(detector.amount("login"), 0);
    }

    #[test]
    fn inert_patterns_never_fire() {
        let (mut detector, _clock) = manual();
        let (zero_hits, zero) = counter();
        let (empty_hits, empty) = counter();
        let (reset_hits, reset) = counter();

        // The threshold-1 pattern resets the amount to 0 before the
        // zero-threshold pattern is evaluated.
        detector.after(1, "x", reset).after(0, "x", zero);
        detector.sequence(Vec::<String>::new(), empty);

        feed(&detector, &["x", "x"]);

        assert_eq!(reset_hits.load(Ordering::SeqCst), 2);
        assert_eq!(zero_hits.load(Ordering::SeqCst), 0);
        assert_eq!(empty_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn within_gates_late_matches() {
        let (mut detector, clock) = manual();
        let (hits, cb) = counter();
        detector.within(1, TimeUnit::Seconds).any("login", cb);

        feed(&detector, &["login"]);
        clock.advance(Duration::milliseconds(500));
        feed(&detector, &["login"]);
        clock.advance(Duration::milliseconds(500));
        feed(&detector, &["login"]);

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_window_keeps_sequence_unconsumed() {
        let (mut detector, clock) = manual();
        let (hits, cb) = counter();
        detector
            .within(1, TimeUnit::Seconds)
            .within(1, TimeUnit::Minutes)
            .sequence(["login", "logout"], cb);

        feed(&detector, &["login"]);
        clock.advance(Duration::seconds(61));
        feed(&detector, &["logout"]);

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(detector.sequence_cursor(), 0);
    }

    #[test]
    fn every_polls_on_event_arrival() {
        let (mut detector, clock) = manual();
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        detector.every(1, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        feed(&detector, &["x"]);
        clock.advance(Duration::seconds(5));
        assert_eq!(ticks.load(Ordering::SeqCst), 0);

        feed(&detector, &["x", "x"]);
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        clock.advance(Duration::seconds(1));
        feed(&detector, &["y"]);
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn close_clears_session_but_keeps_history() {
        let (mut detector, clock) = manual();
        feed(&detector, &["login", "logout"]);
        assert!(detector.session_started_at().is_some());

        detector.close();
        detector.close();
        assert!(detector.session_started_at().is_none());
        assert_eq!(detector.history_len(), 2);

        clock.advance(Duration::seconds(3));
        feed(&detector, &["login"]);
        assert_eq!(detector.session_started_at(), Some(clock.now()));
    }

    #[test]
    fn close_clears_stats_state() {
        struct Price(f64);

        let clock = ManualClock::new();
        let mut detector: Detector<Price> =
            Detector::with_clock(DetectorConfig::default(), Arc::new(clock));
        let stats = Stats::new(StatOp::Variance, |p: &Price| Some(p.0));
        detector.any_with("receive", stats);

        let run = |detector: &Detector<Price>| {
            let payload = crate::event::Payload::new();
            for v in [1.0, 4.0] {
                let event = Event::with_payload("receive", Arc::new(Price(v)), payload.clone());
                detector.ingest(&event).unwrap();
            }
            payload.get_f64("variance")
        };

        assert_eq!(run(&detector), Some(8.0));
        detector.close();
        assert_eq!(run(&detector), Some(8.0));
    }

    #[test]
    fn callback_error_aborts_remaining_patterns() {
        let (mut detector, _clock) = manual();
        let (hits, cb) = counter();
        detector
            .any("x", |_, _| Err("rejected".into()))
            .any("x", cb);

        let err = detector.ingest(&Event::new("x", Arc::new(()))).unwrap_err();

        assert!(matches!(err, DetectError::Callback { kind: PatternKind::Any, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(detector.history_len(), 1);
    }

    #[test]
    fn callbacks_share_the_event_payload() {
        let (mut detector, _clock) = manual();
        detector
            .any("x", |_, e| {
                e.payload().set("seen", 1);
                Ok(())
            })
            .any("x", |_, e| {
                let seen = e.payload().get("seen");
                e.payload().set("second_saw", seen.is_some());
                Ok(())
            });

        let event = Event::new("x", Arc::new(()));
        detector.ingest(&event).unwrap();

        assert_eq!(event.payload().get("second_saw"), Some(Value::Bool(true)));
    }

    #[test]
    fn matches_are_republished_on_subject() {
        let (mut detector, _clock) = manual();
        detector.any("login", |_, _| Ok(()));

        let emitted: Stream<()> = Stream::new(EMIT);
        let (hits, cb) = counter();
        let mut audit: Detector<()> = Detector::new();
        audit.add_stream(emitted.clone());
        audit.any("login", cb);
        audit.watch(&detector.subject());
        audit.open().unwrap();

        feed(&detector, &["login", "logout"]);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(audit.history_len(), 1);
    }

    #[test]
    fn remove_unknown_stream_is_noop() {
        let (mut detector, _clock) = manual();
        let known = detector.add_stream("login");
        let stranger: Stream<()> = Stream::new("login");

        assert!(!detector.remove_stream(&stranger));
        assert_eq!(detector.sources().len(), 1);
        assert!(detector.remove_stream(&known));
        assert!(!detector.remove_stream(&known));
        assert_eq!(known.subscriber_count(), 0);
    }

    #[test]
    fn pattern_count_by_kind() {
        let (mut detector, _clock) = manual();
        detector
            .within(5, TimeUnit::Minutes)
            .any("a", |_, _| Ok(()))
            .every(10, || Ok(()));

        assert_eq!(detector.pattern_count(PatternKind::Within), 1);
        assert_eq!(detector.pattern_count(PatternKind::Any), 1);
        assert_eq!(detector.pattern_count(PatternKind::Every), 1);
        assert_eq!(detector.pattern_count(PatternKind::After), 0);
    }
}
