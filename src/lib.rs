//! # detectr - complex event detection over named event streams
//!
//! A [`Detector`] observes discrete named events, each carrying a sender and a
//! shared mutable payload, and recognizes higher-level patterns over them:
//!
//! - **any**: every occurrence of an event name
//! - **after**: every N-th occurrence of an event name
//! - **sequence**: an exact ordered run of event names
//! - **every**: a periodic tick, polled as events arrive
//! - **within**: a time budget gating all of the above
//!
//! Matches invoke user callbacks. [`Stats`] accumulators can be plugged in as
//! callbacks to fold a sender attribute into the event payload.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use detectr::{Detector, Event, Stats, StatOp, Subject, TimeUnit};
//!
//! struct Trade {
//!     price: f64,
//! }
//!
//! let market = Subject::new();
//! let mut detector: Detector<Trade> = Detector::new();
//! detector.add_stream("trade");
//! detector.watch(&market);
//! detector
//!     .within(5, TimeUnit::Minutes)
//!     .any_with("trade", Stats::new(StatOp::Sum, |t: &Trade| Some(t.price)));
//! detector.open()?;
//!
//! let payload = detectr::Payload::new();
//! for price in [1.0, 2.5] {
//!     let event = Event::with_payload("trade", Arc::new(Trade { price }), payload.clone());
//!     market.notify(&event)?;
//! }
//! assert_eq!(payload.get_f64("sum"), Some(3.5));
//! # Ok::<(), detectr::DetectError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod clock;
pub mod config;
pub mod detector;
pub mod error;
pub mod event;
pub mod listener;
pub mod matcher;
pub mod pattern;
pub mod periodic;
pub mod source;
pub mod stats;
pub mod value;
pub mod window;

// Re-export primary types at crate root for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{DetectorConfig, PeriodicMode};
pub use detector::{Detector, EMIT};
pub use error::{CallbackError, CallbackResult, DetectError, DetectResult};
pub use event::{Event, Payload};
pub use listener::Listener;
pub use matcher::find_occurrences;
pub use pattern::PatternKind;
pub use source::{EventName, EventSource, SourceId, Stream, Subject, Subscriber, SubscriberId};
pub use stats::{StatOp, Stats};
pub use value::Value;
pub use window::{TimeUnit, Window};
