//! Match callbacks.

use crate::error::CallbackResult;
use crate::event::Event;

/// Callback invoked with `(sender, event)` when a pattern matches.
///
/// Closures with the matching signature implement this trait. Stateful
/// listeners such as [`Stats`](crate::stats::Stats) override [`clear`] to drop
/// their running state when the owning detector closes.
///
/// [`clear`]: Listener::clear
pub trait Listener<S>: Send {
    fn on_match(&mut self, sender: &S, event: &Event<S>) -> CallbackResult;

    /// Reset internal state. Called on every detector close.
    fn clear(&mut self) {}
}

impl<S, F> Listener<S> for F
where
    F: FnMut(&S, &Event<S>) -> CallbackResult + Send,
{
    fn on_match(&mut self, sender: &S, event: &Event<S>) -> CallbackResult {
        self(sender, event)
    }
}

/// Callback for periodic `every` registrations; it receives no event.
pub type Tick = Box<dyn FnMut() -> CallbackResult + Send>;
