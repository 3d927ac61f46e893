//! Error type for APDU parsing
//!
//! Every error here corresponds to an ISO 7816-4 status word, so a card that
//! rejects malformed input can answer with a regular error response instead of
//! failing the exchange.

use crate::response::status::StatusWord;

/// Result alias for APDU operations
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors raised while decoding command or response bytes
#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The command body does not match any ISO 7816-3 case
    #[error("Invalid command length: {0}")]
    InvalidCommandLength(usize),

    /// The class byte is reserved and cannot start a command
    #[error("Class not supported: {0:#04x}")]
    ClassNotSupported(u8),

    /// Response bytes could not be decoded
    #[error("Parse error: {0}")]
    ParseError(&'static str),
}

impl Error {
    /// Create a new parse error
    pub const fn parse(message: &'static str) -> Self {
        Self::ParseError(message)
    }

    /// The status word a card answers with when it rejects input for this reason
    pub const fn status_word(&self) -> StatusWord {
        match self {
            Self::InvalidCommandLength(_) => StatusWord::WRONG_LENGTH,
            Self::ClassNotSupported(_) => StatusWord::CLASS_NOT_SUPPORTED,
            Self::ParseError(_) => StatusWord::NO_PRECISE_DIAGNOSIS,
        }
    }
}

impl From<Error> for StatusWord {
    fn from(error: Error) -> Self {
        error.status_word()
    }
}
