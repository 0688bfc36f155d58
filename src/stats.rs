//! Running statistics usable as match callbacks.
//!
//! A [`Stats`] accumulator reads one numeric attribute of the event sender
//! through a selector and folds it into the event payload under a key named
//! after the operation (`"count"`, `"sum"`, ...). Because the payload is
//! shared, an accumulator registered on a stream of events that reuse one
//! payload builds a running figure across the whole stream.
//!
//! `mean`, `variance` and `stdev` are NOT the textbook statistics. They are
//! fixed update rules whose outputs downstream consumers rely on:
//!
//! | op         | update                                                    |
//! |------------|-----------------------------------------------------------|
//! | `mean`     | first value, then `mean + value / 2`                      |
//! | `variance` | `variance + value * (value - n)`, `n` = calls so far      |
//! | `stdev`    | `d = value - m; m += d / n; stdev = stdev * d - (value - m)` |
//!
//! When the selector cannot resolve a value the value-bearing operations are
//! skipped; `count` still counts.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::{CallbackResult, DetectError};
use crate::event::{Event, Payload};
use crate::listener::Listener;
use crate::value::Value;

/// Statistic computed by an accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatOp {
    Count,
    Sum,
    Min,
    Max,
    Mean,
    Variance,
    Stdev,
    /// Every individual operation, in declaration order.
    All,
}

impl StatOp {
    /// Individual operations in the order `All` runs them.
    pub const INDIVIDUAL: [Self; 7] = [
        Self::Count,
        Self::Sum,
        Self::Min,
        Self::Max,
        Self::Mean,
        Self::Variance,
        Self::Stdev,
    ];

    /// Payload key the operation writes.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Mean => "mean",
            Self::Variance => "variance",
            Self::Stdev => "stdev",
            Self::All => "all",
        }
    }
}

impl fmt::Display for StatOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StatOp {
    type Err = DetectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(Self::Count),
            "sum" => Ok(Self::Sum),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "mean" => Ok(Self::Mean),
            "variance" => Ok(Self::Variance),
            "stdev" => Ok(Self::Stdev),
            "all" => Ok(Self::All),
            _ => Err(DetectError::InvalidStatOp { op: s.to_string() }),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct RunningState {
    variance_calls: u64,
    stdev_calls: u64,
    stdev_mean: f64,
}

type Selector<S> = Arc<dyn Fn(&S) -> Option<f64> + Send + Sync>;

/// Stateful reducer over one sender attribute.
///
/// Clones share running state, so a handle kept by the caller observes the
/// effect of [`clear`](Stats::clear) performed by a closing detector.
pub struct Stats<S> {
    op: StatOp,
    selector: Selector<S>,
    state: Arc<Mutex<RunningState>>,
}

impl<S> Stats<S> {
    /// Accumulator for `op` over the attribute returned by `selector`.
    pub fn new<F>(op: StatOp, selector: F) -> Self
    where
        F: Fn(&S) -> Option<f64> + Send + Sync + 'static,
    {
        Self {
            op,
            selector: Arc::new(selector),
            state: Arc::new(Mutex::new(RunningState::default())),
        }
    }

    /// Like [`new`](Stats::new) with the operation given by label.
    pub fn parse<F>(op: &str, selector: F) -> Result<Self, DetectError>
    where
        F: Fn(&S) -> Option<f64> + Send + Sync + 'static,
    {
        Ok(Self::new(op.parse()?, selector))
    }

    /// A pure event counter; it reads nothing from the sender.
    #[must_use]
    pub fn counter() -> Self
    where
        S: 'static,
    {
        Self::new(StatOp::Count, |_: &S| None)
    }

    #[must_use]
    pub const fn op(&self) -> StatOp {
        self.op
    }

    /// Reset the running counters and mean.
    pub fn clear(&self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = RunningState::default();
    }

    /// Fold the sender's attribute into `payload`.
    pub fn apply(&self, sender: &S, payload: &Payload) {
        let value = (self.selector)(sender);
        if value.is_none() && self.op != StatOp::Count {
            tracing::debug!(op = %self.op, "stats attribute unresolved");
        }

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        payload.update(|map| match self.op {
            StatOp::All => {
                for op in StatOp::INDIVIDUAL {
                    apply_op(op, value, map, &mut state);
                }
            }
            op => apply_op(op, value, map, &mut state),
        });
    }
}

impl<S> Clone for Stats<S> {
    fn clone(&self) -> Self {
        Self {
            op: self.op,
            selector: Arc::clone(&self.selector),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S> fmt::Debug for Stats<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stats").field("op", &self.op).finish_non_exhaustive()
    }
}

impl<S> Listener<S> for Stats<S> {
    fn on_match(&mut self, sender: &S, event: &Event<S>) -> CallbackResult {
        self.apply(sender, event.payload());
        Ok(())
    }

    fn clear(&mut self) {
        Stats::clear(self);
    }
}

fn current(map: &BTreeMap<String, Value>, key: &str) -> Option<f64> {
    map.get(key).and_then(Value::as_float)
}

#[allow(clippy::cast_precision_loss)]
fn apply_op(op: StatOp, value: Option<f64>, map: &mut BTreeMap<String, Value>, state: &mut RunningState) {
    let key = op.key();

    if op == StatOp::Count {
        let next = match map.get(key) {
            Some(Value::Int(n)) => Value::Int(n.saturating_add(1)),
            Some(Value::Float(n)) => Value::Float(n + 1.0),
            _ => Value::Int(1),
        };
        map.insert(key.to_string(), next);
        return;
    }

    let Some(value) = value else {
        return;
    };

    let next = match op {
        StatOp::Sum => current(map, key).unwrap_or(0.0) + value,
        StatOp::Min => current(map, key).map_or(value, |m| if value < m { value } else { m }),
        StatOp::Max => current(map, key).map_or(value, |m| if value > m { value } else { m }),
        StatOp::Mean => current(map, key).map_or(value, |m| m + value / 2.0),
        StatOp::Variance => {
            state.variance_calls += 1;
            let n = state.variance_calls as f64;
            current(map, key).unwrap_or(0.0) + value * (value - n)
        }
        StatOp::Stdev => {
            state.stdev_calls += 1;
            let d = value - state.stdev_mean;
            state.stdev_mean += d / state.stdev_calls as f64;
            current(map, key).unwrap_or(0.0) * d - (value - state.stdev_mean)
        }
        StatOp::Count | StatOp::All => return,
    };

    map.insert(key.to_string(), Value::Float(next));
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Price {
        value: f64,
    }

    fn feed(stats: &Stats<Price>, values: &[f64]) -> Payload {
        let payload = Payload::new();
        for &value in values {
            stats.apply(&Price { value }, &payload);
        }
        payload
    }

    fn by_value(op: StatOp) -> Stats<Price> {
        Stats::new(op, |p: &Price| Some(p.value))
    }

    #[test]
    fn count_sum_min_max() {
        let values = [1.0, 2.0, 4.0, 8.0];
        assert_eq!(feed(&by_value(StatOp::Count), &values).get("count"), Some(Value::Int(4)));
        assert_eq!(feed(&by_value(StatOp::Sum), &values).get_f64("sum"), Some(15.0));
        assert_eq!(feed(&by_value(StatOp::Min), &values).get_f64("min"), Some(1.0));
        assert_eq!(feed(&by_value(StatOp::Max), &values).get_f64("max"), Some(8.0));
    }

    #[test]
    fn all_reproduces_reference_values() {
        let payload = feed(&by_value(StatOp::All), &[1.0, 4.0]);

        assert_eq!(payload.get("count"), Some(Value::Int(2)));
        assert_eq!(payload.get_f64("sum"), Some(5.0));
        assert_eq!(payload.get_f64("min"), Some(1.0));
        assert_eq!(payload.get_f64("max"), Some(4.0));
        assert_eq!(payload.get_f64("mean"), Some(3.0));
        assert_eq!(payload.get_f64("variance"), Some(8.0));
        assert_eq!(payload.get_f64("stdev"), Some(-1.5));
    }

    #[test]
    fn mean_is_halving_update() {
        let payload = feed(&by_value(StatOp::Mean), &[2.0, 2.0, 2.0]);
        assert_eq!(payload.get_f64("mean"), Some(4.0));
    }

    #[test]
    fn clear_restarts_internal_counters() {
        let stats = by_value(StatOp::Variance);
        let first = feed(&stats, &[1.0, 4.0]);
        assert_eq!(first.get_f64("variance"), Some(8.0));

        stats.clear();
        stats.clear();
        let second = feed(&stats, &[1.0, 4.0]);
        assert_eq!(second.get_f64("variance"), Some(8.0));
    }

    #[test]
    fn clones_share_running_state() {
        let stats = by_value(StatOp::Stdev);
        let handle = stats.clone();
        let payload = Payload::new();

        stats.apply(&Price { value: 1.0 }, &payload);
        handle.clear();
        stats.apply(&Price { value: 4.0 }, &payload);

        // After the clear the second value is treated as the first again.
        assert_eq!(payload.get_f64("stdev"), Some(0.0));
    }

    #[test]
    fn unresolved_attribute_is_a_no_op() {
        let stats: Stats<Price> = Stats::new(StatOp::All, |_| None);
        let payload = feed(&stats, &[1.0, 2.0]);

        assert_eq!(payload.get("count"), Some(Value::Int(2)));
        assert!(!payload.contains("sum"));
        assert!(!payload.contains("stdev"));
    }

    #[test]
    fn counter_needs_no_selector() {
        let stats: Stats<Price> = Stats::counter();
        let payload = feed(&stats, &[0.0, 0.0, 0.0]);
        assert_eq!(payload.get("count"), Some(Value::Int(3)));
    }

    #[test]
    fn parse_labels() {
        assert_eq!("ALL".parse::<StatOp>().unwrap(), StatOp::All);
        assert_eq!(StatOp::Stdev.to_string(), "stdev");
        assert!(Stats::<Price>::parse("median", |p| Some(p.value)).is_err());
    }
}
