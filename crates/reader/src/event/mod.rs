//! Reader and card lifecycle events
//!
//! The registry reports every reader insertion and removal and every change of
//! card membership to an [`EventSink`]. Events are emitted after the change is
//! visible, so a sink that queries the registry observes the new state.

pub mod channel;
mod sink;

pub use channel::*;
pub use sink::{EventSink, NullSink};

use crate::card::CardRef;
use crate::reader::Reader;

/// Kind of an [`Event`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum EventKind {
    /// A reader was added to the registry
    #[display("reader-inserted")]
    ReaderInserted,
    /// A reader was removed from the registry
    #[display("reader-removed")]
    ReaderRemoved,
    /// A card is now inserted in a reader
    #[display("card-inserted")]
    CardInserted,
    /// No card is inserted in a reader
    #[display("card-removed")]
    CardRemoved,
}

/// Reader and card lifecycle events
///
/// Each event holds its own counted references to the reader and card.
#[derive(Debug, Clone)]
pub enum Event {
    /// A reader was added to the registry
    ReaderInserted(Reader),
    /// A reader was removed from the registry
    ReaderRemoved(Reader),
    /// A card is now inserted in a reader
    CardInserted {
        /// Reader holding the card
        reader: Reader,
        /// The inserted card
        card: CardRef,
    },
    /// No card is inserted in a reader
    CardRemoved(Reader),
}

impl Event {
    /// Kind of this event
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::ReaderInserted(_) => EventKind::ReaderInserted,
            Self::ReaderRemoved(_) => EventKind::ReaderRemoved,
            Self::CardInserted { .. } => EventKind::CardInserted,
            Self::CardRemoved(_) => EventKind::CardRemoved,
        }
    }

    /// Reader the event is about
    pub const fn reader(&self) -> &Reader {
        match self {
            Self::ReaderInserted(reader)
            | Self::ReaderRemoved(reader)
            | Self::CardInserted { reader, .. }
            | Self::CardRemoved(reader) => reader,
        }
    }

    /// Inserted card, for [`EventKind::CardInserted`]
    pub const fn card(&self) -> Option<&CardRef> {
        match self {
            Self::CardInserted { card, .. } => Some(card),
            _ => None,
        }
    }
}
