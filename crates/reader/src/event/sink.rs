//! Event sink trait and implementations

use crossbeam_channel::Sender;
use tracing::warn;

use crate::event::Event;

/// Receiver of reader and card lifecycle events
///
/// Delivery is fire-and-forget: the registry does not wait on or retry a sink.
/// A sink may call back into the registry, since no registry or reader lock is
/// held while it runs.
pub trait EventSink: Send + Sync {
    /// Handle an event
    fn emit(&self, event: Event);
}

// Implement sinks for closures
impl<F> EventSink for F
where
    F: Fn(Event) + Send + Sync,
{
    fn emit(&self, event: Event) {
        self(event)
    }
}

impl EventSink for Sender<Event> {
    fn emit(&self, event: Event) {
        if let Err(err) = self.send(event) {
            warn!(kind = %err.0.kind(), "Event receiver disconnected, dropping event");
        }
    }
}

/// Sink that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: Event) {}
}
