//! Channel-based event delivery
//!
//! A [`Sender<Event>`] is itself an [`EventSink`](crate::EventSink), so an event
//! queue consumer can run on its own thread and drain the receiver.

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

use crate::event::Event;

/// Sender for reader and card events
pub type EventSender = Sender<Event>;
/// Receiver for reader and card events
pub type EventReceiver = Receiver<Event>;

/// Create an unbounded channel for events
pub fn channel() -> (EventSender, EventReceiver) {
    unbounded()
}

/// Create a bounded channel with the specified capacity for events
///
/// A full channel blocks the emitting thread until the consumer catches up.
pub fn bounded_channel(capacity: usize) -> (EventSender, EventReceiver) {
    bounded(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, EventSink};
    use crate::reader::Reader;

    #[test]
    fn test_sender_sink_delivers_in_order() {
        let (tx, rx) = channel();
        let reader = Reader::new("Reader 0");

        tx.emit(Event::ReaderInserted(reader.clone()));
        tx.emit(Event::CardRemoved(reader.clone()));

        let kinds: Vec<_> = rx.try_iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, [EventKind::ReaderInserted, EventKind::CardRemoved]);
        assert_eq!(reader.reference_count(), 1);
    }

    #[test]
    fn test_disconnected_receiver_drops_event() {
        let (tx, rx) = bounded_channel(1);
        drop(rx);
        let reader = Reader::new("Reader 0");

        tx.emit(Event::ReaderRemoved(reader.clone()));
        assert_eq!(reader.reference_count(), 1);
    }
}
