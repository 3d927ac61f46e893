//! APDU command definitions
//!
//! This module provides the command type a virtual card receives, decoded from
//! the raw bytes a client sends according to ISO/IEC 7816-3 and 7816-4.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::Error;

/// Expected response length (Ne), already decoded from the Le field
///
/// A short Le of `00` decodes to 256 and an extended Le of `0000` to 65536.
pub type ExpectedLength = u32;

const SHORT_MAX_DATA: usize = 255;
const SHORT_MAX_LE: ExpectedLength = 256;
const EXTENDED_MAX_LE: ExpectedLength = 65536;
const EXTENDED_MAX_DATA: usize = 65535;

/// Class byte reserved for protocol parameter selection
const CLA_INVALID: u8 = 0xFF;

/// Generic APDU command structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Command data (optional)
    pub data: Option<Bytes>,
    /// Expected length (optional)
    pub le: Option<ExpectedLength>,
}

impl Command {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: None,
        }
    }

    /// Set the data field
    ///
    /// An extended Lc holds at most 65535 bytes; [`Command::to_bytes`] rejects
    /// a longer data field.
    pub fn with_data<T: Into<Bytes>>(mut self, data: T) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the expected length field
    pub const fn with_le(mut self, le: ExpectedLength) -> Self {
        self.le = Some(le);
        self
    }

    /// Command class (CLA)
    pub const fn class(&self) -> u8 {
        self.cla
    }

    /// Instruction code (INS)
    pub const fn instruction(&self) -> u8 {
        self.ins
    }

    /// First parameter (P1)
    pub const fn p1(&self) -> u8 {
        self.p1
    }

    /// Second parameter (P2)
    pub const fn p2(&self) -> u8 {
        self.p2
    }

    /// Command payload data, if any
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Expected response length, if any
    pub const fn expected_length(&self) -> Option<ExpectedLength> {
        self.le
    }

    /// Whether this command needs the extended length encoding
    pub fn is_extended(&self) -> bool {
        self.data().is_some_and(|d| d.len() > SHORT_MAX_DATA)
            || self.le.is_some_and(|le| le > SHORT_MAX_LE)
    }

    /// Parse a command from raw bytes
    ///
    /// Accepts the four short cases and the three extended cases of ISO 7816-3.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() < 4 {
            return Err(Error::InvalidCommandLength(data.len()));
        }
        if data[0] == CLA_INVALID {
            return Err(Error::ClassNotSupported(data[0]));
        }

        let mut command = Self::new(data[0], data[1], data[2], data[3]);
        let body = &data[4..];

        match body {
            // Case 1
            [] => {}
            // Case 2S
            [le] => command.le = Some(decode_short_le(*le)),
            // Extended cases start with a zero byte and carry at least two more
            [0x00, rest @ ..] if rest.len() >= 2 => {
                let first = u16::from_be_bytes([rest[0], rest[1]]) as usize;
                let rest = &rest[2..];
                if rest.is_empty() {
                    // Case 2E
                    command.le = Some(decode_extended_le(first));
                } else if first == 0 {
                    return Err(Error::InvalidCommandLength(data.len()));
                } else if rest.len() == first {
                    // Case 3E
                    command.data = Some(Bytes::copy_from_slice(rest));
                } else if rest.len() == first + 2 {
                    // Case 4E
                    command.data = Some(Bytes::copy_from_slice(&rest[..first]));
                    let le = u16::from_be_bytes([rest[first], rest[first + 1]]) as usize;
                    command.le = Some(decode_extended_le(le));
                } else {
                    return Err(Error::InvalidCommandLength(data.len()));
                }
            }
            [lc, rest @ ..] => {
                let lc = *lc as usize;
                if lc == 0 {
                    return Err(Error::InvalidCommandLength(data.len()));
                }
                if rest.len() == lc {
                    // Case 3S
                    command.data = Some(Bytes::copy_from_slice(rest));
                } else if rest.len() == lc + 1 {
                    // Case 4S
                    command.data = Some(Bytes::copy_from_slice(&rest[..lc]));
                    command.le = Some(decode_short_le(rest[lc]));
                } else {
                    return Err(Error::InvalidCommandLength(data.len()));
                }
            }
        }

        trace!(
            cla = format_args!("{:#04x}", command.cla),
            ins = format_args!("{:#04x}", command.ins),
            lc = command.data().map_or(0, <[u8]>::len),
            le = ?command.le,
            "Parsed APDU command"
        );

        Ok(command)
    }

    /// Calculate length of serialized command
    pub fn command_length(&self) -> usize {
        // Header (CLA, INS, P1, P2) is always 4 bytes
        let mut length = 4;
        let extended = self.is_extended();

        if let Some(data) = self.data() {
            length += if extended { 3 } else { 1 } + data.len();
        }

        if self.le.is_some() {
            length += match (extended, self.data.is_some()) {
                (false, _) => 1,
                (true, true) => 2,
                (true, false) => 3,
            };
        }

        length
    }

    /// Convert to raw APDU bytes
    ///
    /// Fails with [`Error::InvalidCommandLength`] if the data field does not
    /// fit an extended Lc.
    pub fn to_bytes(&self) -> Result<Bytes, Error> {
        let data_len = self.data().map_or(0, <[u8]>::len);
        if data_len > EXTENDED_MAX_DATA {
            return Err(Error::InvalidCommandLength(data_len));
        }

        let mut buffer = BytesMut::with_capacity(self.command_length());
        let extended = self.is_extended();

        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);

        if let Some(data) = self.data() {
            if extended {
                buffer.put_u8(0x00);
                buffer.put_u16(data.len() as u16);
            } else {
                buffer.put_u8(data.len() as u8);
            }
            buffer.put_slice(data);
        }

        if let Some(le) = self.le {
            if extended {
                if self.data.is_none() {
                    buffer.put_u8(0x00);
                }
                // 65536 wraps to the 0000 encoding
                buffer.put_u16(le.min(EXTENDED_MAX_LE) as u16);
            } else {
                buffer.put_u8(le as u8);
            }
        }

        Ok(buffer.freeze())
    }
}

const fn decode_short_le(le: u8) -> ExpectedLength {
    if le == 0 { SHORT_MAX_LE } else { le as ExpectedLength }
}

const fn decode_extended_le(le: usize) -> ExpectedLength {
    if le == 0 {
        EXTENDED_MAX_LE
    } else {
        le as ExpectedLength
    }
}

impl TryFrom<&[u8]> for Command {
    type Error = Error;

    fn try_from(data: &[u8]) -> Result<Self, Error> {
        Self::from_bytes(data)
    }
}
