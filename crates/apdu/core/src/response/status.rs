//! Trailing status bytes of a card response
//!
//! The reader layer only inspects a status word to pick a log level and to
//! label the codes it synthesizes for commands that fail to parse.

use std::fmt;

use tracing::Level;

/// SW1 SW2 pair closing every response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord {
    /// SW1
    pub sw1: u8,
    /// SW2
    pub sw2: u8,
}

impl StatusWord {
    /// Normal processing (90 00)
    pub const SUCCESS: Self = Self::new(0x90, 0x00);
    /// Lc or Le does not match the command body (67 00)
    pub const WRONG_LENGTH: Self = Self::new(0x67, 0x00);
    /// Reserved class byte (6E 00)
    pub const CLASS_NOT_SUPPORTED: Self = Self::new(0x6E, 0x00);
    /// Any other rejection (6F 00)
    pub const NO_PRECISE_DIAGNOSIS: Self = Self::new(0x6F, 0x00);

    /// Status word from its two bytes
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self { sw1, sw2 }
    }

    /// The wire bytes, SW1 first
    pub const fn to_bytes(self) -> [u8; 2] {
        [self.sw1, self.sw2]
    }

    /// Whether the card completed the command normally
    pub const fn is_success(&self) -> bool {
        self.sw1 == 0x90 && self.sw2 == 0x00
    }

    /// Level at which an exchange ending in this status is logged
    ///
    /// Warning processing (62 XX, 63 XX) is informational; execution and
    /// checking errors are warnings.
    pub const fn tracing_level(&self) -> Level {
        match self.sw1 {
            0x90 | 0x61 => Level::DEBUG,
            0x62 | 0x63 => Level::INFO,
            _ => Level::WARN,
        }
    }

    /// Short label for the status, used in log lines
    pub const fn description(&self) -> &'static str {
        match (self.sw1, self.sw2) {
            (0x90, 0x00) => "Success",
            (0x61, _) => "More data available",
            (0x62 | 0x63, _) => "Warning",
            (0x67, 0x00) => "Wrong length",
            (0x6E, 0x00) => "Class not supported",
            (0x6F, 0x00) => "No precise diagnosis",
            _ => "Card error",
        }
    }
}

impl From<(u8, u8)> for StatusWord {
    fn from((sw1, sw2): (u8, u8)) -> Self {
        Self::new(sw1, sw2)
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}", self.sw1, self.sw2)
    }
}
