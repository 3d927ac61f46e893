//! Card emulation interface
//!
//! The reader layer does not implement any ISO 7816 command semantics. It holds
//! counted references to cards implementing [`Card`] and forwards power and APDU
//! requests to them.

use std::fmt;
use std::sync::Arc;

use vcard_apdu_core::{Bytes, Command, Response, StatusWord};

/// Requested power state for [`Card::reset`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Power {
    /// Power the card up
    On,
    /// Power the card down
    Off,
}

/// Trait implemented by the card emulation back end
///
/// All methods take `&self`: the same card may be driven from several threads
/// at once, and any serialization of command processing is up to the card.
pub trait Card: Send + Sync + fmt::Debug {
    /// Reset the card into the given power state
    fn reset(&self, power: Power);

    /// Answer-To-Reset of the card
    fn atr(&self) -> Bytes;

    /// Decode raw bytes into a command
    ///
    /// On malformed input this returns the status word the card answers with;
    /// it never fails the exchange itself.
    fn parse_command(&self, bytes: &[u8]) -> Result<Command, StatusWord> {
        Command::from_bytes(bytes).map_err(|e| e.status_word())
    }

    /// Process a command to completion and produce its response
    fn process_command(&self, command: &Command) -> Response;
}

/// Counted reference to a card
pub type CardRef = Arc<dyn Card>;
