//! One-pattern detectors.
//!
//! Each constructor builds a [`Detector`], adds the stream(s) the pattern
//! listens to and registers the pattern. The result is ready to `watch` a
//! subject and `open`.

use crate::detector::Detector;
use crate::error::CallbackResult;
use crate::event::Event;
use crate::source::EventName;

/// Detector firing on every occurrence of `event`.
pub fn any<S, F>(event: impl EventName, callback: F) -> Detector<S>
where
    S: Send + Sync + 'static,
    F: FnMut(&S, &Event<S>) -> CallbackResult + Send + 'static,
{
    let name = event.event_name();
    let mut detector = Detector::new();
    detector.add_stream(name.as_str());
    detector.any(name, callback);
    detector
}

/// Detector firing on every `amount`-th occurrence of `event`.
pub fn after<S, F>(amount: u64, event: impl EventName, callback: F) -> Detector<S>
where
    S: Send + Sync + 'static,
    F: FnMut(&S, &Event<S>) -> CallbackResult + Send + 'static,
{
    let name = event.event_name();
    let mut detector = Detector::new();
    detector.add_stream(name.as_str());
    detector.after(amount, name, callback);
    detector
}

/// Detector firing when `events` occur in order. One stream is added per
/// distinct name.
pub fn sequence<S, I, F>(events: I, callback: F) -> Detector<S>
where
    S: Send + Sync + 'static,
    I: IntoIterator,
    I::Item: EventName,
    F: FnMut(&S, &Event<S>) -> CallbackResult + Send + 'static,
{
    let names: Vec<String> = events.into_iter().map(|e| e.event_name()).collect();
    let mut detector = Detector::new();

    let mut seen: Vec<&str> = Vec::new();
    for name in &names {
        if !seen.contains(&name.as_str()) {
            seen.push(name);
            detector.add_stream(name.as_str());
        }
    }

    detector.sequence(&names, callback);
    detector
}

/// Detector ticking at most once per `seconds`. It has no streams; add the
/// ones whose traffic should drive the poll.
pub fn every<S, F>(seconds: u64, callback: F) -> Detector<S>
where
    S: Send + Sync + 'static,
    F: FnMut() -> CallbackResult + Send + 'static,
{
    let mut detector = Detector::new();
    detector.every(seconds, callback);
    detector
}
