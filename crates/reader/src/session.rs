//! Power control and APDU exchange with the inserted card
//!
//! Each operation takes a transient reference to the inserted card under the
//! reader lock and calls into the card without holding any lock. Two exchanges
//! on the same card may therefore run concurrently.

use tracing::{Level, debug, info, trace, warn};
use vcard_apdu_core::Response;

use crate::card::Power;
use crate::error::{ReaderError, Result};
use crate::reader::Reader;

impl Reader {
    /// Power the inserted card on
    ///
    /// With an `atr` buffer, copies as much of the card's Answer-To-Reset as
    /// fits and returns the number of bytes written; without one, returns 0.
    /// Fails with [`ReaderError::NoCard`] and leaves `atr` untouched if no card
    /// is inserted.
    pub fn power_on(&self, atr: Option<&mut [u8]>) -> Result<usize> {
        self.reset(Power::On, atr)
    }

    /// Power the inserted card off
    pub fn power_off(&self) -> Result<()> {
        self.reset(Power::Off, None).map(|_| ())
    }

    fn reset(&self, power: Power, atr: Option<&mut [u8]>) -> Result<usize> {
        let card = self.card().ok_or(ReaderError::NoCard)?;
        card.reset(power);
        debug!(reader = ?self.name(), %power, "Card reset");

        // The ATR is only read back when powering on
        let written = match (power, atr) {
            (Power::On, Some(buf)) => copy_truncated(&card.atr(), buf),
            _ => 0,
        };
        Ok(written)
    }

    /// Send an APDU to the inserted card and receive its response
    ///
    /// Returns the number of response bytes written to `recv`, which is the
    /// response length capped at `recv.len()`; a longer response is silently
    /// truncated. Input that does not parse as a command produces an error
    /// response from the card rather than a failure.
    pub fn transmit(&self, send: &[u8], recv: &mut [u8]) -> Result<usize> {
        let card = self.card().ok_or(ReaderError::NoCard)?;
        trace!(reader = ?self.name(), command = %hex::encode(send), "Transmitting APDU");

        let response = match card.parse_command(send) {
            Ok(command) => card.process_command(&command),
            Err(status) => {
                debug!(reader = ?self.name(), %status, "Rejecting malformed APDU");
                Response::error(status)
            }
        };

        let status = response.status();
        let level = status.tracing_level();
        if level == Level::WARN {
            warn!(reader = ?self.name(), %status, "{}", status.description());
        } else if level == Level::INFO {
            info!(reader = ?self.name(), %status, "{}", status.description());
        }

        let bytes = response.to_bytes();
        trace!(reader = ?self.name(), response = %hex::encode(&bytes), "Received APDU response");
        Ok(copy_truncated(&bytes, recv))
    }
}

fn copy_truncated(src: &[u8], dst: &mut [u8]) -> usize {
    let len = src.len().min(dst.len());
    dst[..len].copy_from_slice(&src[..len]);
    len
}
