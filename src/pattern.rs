//! Pattern registrations and the listener registry.
//!
//! Registrations are grouped into one bucket per [`PatternKind`]. Buckets are
//! evaluated in the order their kind was first registered, and registrations
//! within a bucket in insertion order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::listener::{Listener, Tick};
use crate::periodic::PeriodicGate;
use crate::window::Window;

/// The kinds of pattern a detector understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Every occurrence of one event name.
    Any,
    /// Every `threshold`-th occurrence of one event name.
    After,
    /// An exact ordered run of event names.
    Sequence,
    /// Periodic tick, polled on event arrival.
    Every,
    /// Time budget gating the other kinds.
    Within,
}

impl PatternKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::After => "after",
            Self::Sequence => "sequence",
            Self::Every => "every",
            Self::Within => "within",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured pattern.
#[allow(missing_docs)]
pub enum Registration<S> {
    Any {
        event: String,
        listener: Box<dyn Listener<S>>,
    },
    After {
        threshold: u64,
        event: String,
        listener: Box<dyn Listener<S>>,
    },
    Sequence {
        events: Vec<String>,
        listener: Box<dyn Listener<S>>,
    },
    Every {
        gate: PeriodicGate,
        tick: Tick,
    },
    Within(Window),
}

impl<S> Registration<S> {
    #[must_use]
    pub const fn kind(&self) -> PatternKind {
        match self {
            Self::Any { .. } => PatternKind::Any,
            Self::After { .. } => PatternKind::After,
            Self::Sequence { .. } => PatternKind::Sequence,
            Self::Every { .. } => PatternKind::Every,
            Self::Within(_) => PatternKind::Within,
        }
    }

    /// Patterns that can never match: empty sequences and zero thresholds.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        match self {
            Self::After { threshold, .. } => *threshold == 0,
            Self::Sequence { events, .. } => events.is_empty(),
            _ => false,
        }
    }
}

impl<S> fmt::Debug for Registration<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any { event, .. } => f.debug_struct("Any").field("event", event).finish_non_exhaustive(),
            Self::After { threshold, event, .. } => f
                .debug_struct("After")
                .field("threshold", threshold)
                .field("event", event)
                .finish_non_exhaustive(),
            Self::Sequence { events, .. } => f
                .debug_struct("Sequence")
                .field("events", events)
                .finish_non_exhaustive(),
            Self::Every { gate, .. } => f.debug_struct("Every").field("gate", gate).finish_non_exhaustive(),
            Self::Within(window) => f.debug_tuple("Within").field(window).finish(),
        }
    }
}

/// Registrations grouped by kind.
pub struct Registry<S> {
    buckets: Vec<(PatternKind, Vec<Registration<S>>)>,
}

impl<S> Registry<S> {
    #[must_use]
    pub const fn new() -> Self {
        Self { buckets: Vec::new() }
    }

    /// Append a registration to its kind's bucket.
    pub fn register(&mut self, registration: Registration<S>) {
        let kind = registration.kind();
        match self.buckets.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, bucket)) => bucket.push(registration),
            None => self.buckets.push((kind, vec![registration])),
        }
    }

    /// Number of registrations of `kind`.
    #[must_use]
    pub fn count(&self, kind: PatternKind) -> usize {
        self.bucket(kind).map_or(0, <[Registration<S>]>::len)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|(_, b)| b.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Kinds in evaluation order.
    pub fn kinds(&self) -> impl Iterator<Item = PatternKind> + '_ {
        self.buckets.iter().map(|(k, _)| *k)
    }

    fn bucket(&self, kind: PatternKind) -> Option<&[Registration<S>]> {
        self.buckets
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, b)| b.as_slice())
    }

    /// All configured `within` budgets.
    pub fn windows(&self) -> impl Iterator<Item = &Window> + '_ {
        self.bucket(PatternKind::Within)
            .unwrap_or_default()
            .iter()
            .filter_map(|r| match r {
                Registration::Within(window) => Some(window),
                _ => None,
            })
    }

    /// Every registration in evaluation order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Registration<S>> + '_ {
        self.buckets.iter_mut().flat_map(|(_, bucket)| bucket.iter_mut())
    }

    /// Reset the state held by every listener.
    pub fn clear_listeners(&mut self) {
        for registration in self.iter_mut() {
            match registration {
                Registration::Any { listener, .. }
                | Registration::After { listener, .. }
                | Registration::Sequence { listener, .. } => listener.clear(),
                Registration::Every { .. } | Registration::Within(_) => {}
            }
        }
    }

    /// Re-anchor every periodic gate.
    pub fn reset_periodic(&mut self, anchor: Option<chrono::DateTime<chrono::Utc>>) {
        for registration in self.iter_mut() {
            if let Registration::Every { gate, .. } = registration {
                gate.reset(anchor);
            }
        }
    }
}

impl<S> Default for Registry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.buckets.iter().flat_map(|(_, b)| b.iter()))
            .finish()
    }
}
