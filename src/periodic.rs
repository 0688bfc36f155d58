//! Periodic gate and the optional background ticker.
//!
//! By default `every` registrations are polled from inside event ingestion:
//! the interval is checked only when an event arrives, so a quiet stream never
//! fires. [`Ticker`] is the wall-clock alternative. It runs a dedicated worker
//! thread that polls on a fixed period until stopped.

use std::thread::{self, JoinHandle};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, select, Receiver, Sender};

use crate::error::{DetectError, DetectResult};

/// Interval state for one `every` registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodicGate {
    interval_secs: u64,
    anchor: Option<DateTime<Utc>>,
}

impl PeriodicGate {
    #[must_use]
    pub const fn new(interval_secs: u64) -> Self {
        Self {
            interval_secs,
            anchor: None,
        }
    }

    #[must_use]
    pub const fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    #[must_use]
    pub const fn anchor(&self) -> Option<DateTime<Utc>> {
        self.anchor
    }

    /// Check the gate at `now`.
    ///
    /// The first poll only sets the anchor. Later polls fire once the elapsed
    /// time reaches the interval and move the anchor to `now`. At most one
    /// fire per poll, however many intervals have passed.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        let Some(anchor) = self.anchor else {
            self.anchor = Some(now);
            return false;
        };

        let elapsed = (now - anchor).num_seconds();
        if i128::from(elapsed) >= i128::from(self.interval_secs) {
            self.anchor = Some(now);
            true
        } else {
            false
        }
    }

    /// Forget or replace the anchor; used on open/close.
    pub fn reset(&mut self, anchor: Option<DateTime<Utc>>) {
        self.anchor = anchor;
    }
}

/// Background polling thread.
#[derive(Debug)]
pub struct Ticker {
    stop_tx: Option<Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn a worker that calls `on_tick` every `period` until stopped.
    pub fn spawn<F>(period: StdDuration, on_tick: F) -> DetectResult<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let period = period.max(StdDuration::from_millis(1));
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let join = thread::Builder::new()
            .name("detectr-ticker".to_string())
            .spawn(move || worker_loop(period, &stop_rx, on_tick))
            .map_err(|e| DetectError::Spawn {
                message: e.to_string(),
            })?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            join: Some(join),
        })
    }

    /// Signal the worker and wait for it to exit. Idempotent.
    pub fn stop(&mut self) {
        // Dropping the sender disconnects the worker's receiver.
        drop(self.stop_tx.take());

        if let Some(handle) = self.join.take() {
            if handle.join().is_err() {
                tracing::warn!("ticker worker panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop<F: FnMut()>(period: StdDuration, stop_rx: &Receiver<()>, mut on_tick: F) {
    loop {
        select! {
            recv(stop_rx) -> _ => break,
            default(period) => on_tick(),
        }
    }
}
