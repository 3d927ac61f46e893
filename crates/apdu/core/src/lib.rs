//! Command and response types for virtual smart card APDU exchanges
//!
//! This crate provides the value types a virtual card exchanges with the reader
//! layer according to ISO/IEC 7816-4.
//!
//! ## Overview
//!
//! APDU (Application Protocol Data Unit) is the communication format used by smart cards.
//! This crate provides:
//!
//! - Parsing raw command bytes received from a client into a [`Command`]
//! - Building [`Response`] values and serializing them back to wire bytes
//! - Status word interpretation and the status codes used for synthesized
//!   error responses when a command fails to parse
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

pub mod command;
pub mod response;

mod error;
pub use error::{Error, Result};

pub use command::{Command, ExpectedLength};
pub use response::Response;
pub use response::status::StatusWord;

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        Bytes, BytesMut, Command, Error, ExpectedLength, Response, Result,
        StatusWord,
    };
}
