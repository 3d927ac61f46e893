//! Virtual smart card readers
//!
//! This crate models the set of virtual card readers attached to a host, tracks
//! which virtual card is inserted into each reader, and routes APDU exchanges
//! between a client and the inserted card.
//!
//! # Overview
//!
//! - [`Reader`] is a reference-counted handle to one reader slot. Cloning a
//!   handle acquires a reference, dropping it releases one.
//! - [`Registry`] is the ordered, lock-guarded collection of live readers, and
//!   the owner of the [`EventSink`] that hears about reader and card changes.
//! - [`Card`] is the interface of the card emulation back end. The reader layer
//!   only holds and releases [`CardRef`]s and forwards commands to them.
//!
//! # Locking
//!
//! Each reader guards its inserted card with its own lock and the registry
//! guards its list with a separate one. The registry lock is never held while a
//! reader lock is taken, no lock is held while a card processes a command, and
//! events are emitted only after every lock has been released.
//!
//! # Examples
//!
//! ```
//! use vcard_reader::{NullSink, Reader, ReaderId, Registry};
//!
//! let registry = Registry::new(NullSink);
//! let reader = Reader::new("Virtual Reader 0");
//! reader.set_id(ReaderId::new(0));
//! registry.add(&reader)?;
//!
//! let found = registry.lookup_by_id(ReaderId::new(0)).expect("registered");
//! assert!(Reader::same(&found, &reader));
//! assert!(!found.card_is_present());
//! # Ok::<(), vcard_reader::ReaderError>(())
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

mod card;
mod error;
pub mod event;
mod reader;
pub mod registry;
mod session;

pub use card::{Card, CardRef, Power};
pub use error::{ReaderError, Result};
pub use event::{Event, EventKind, EventSink, NullSink};
pub use reader::{Reader, ReaderBuilder, ReaderId};
pub use registry::{ReaderList, Registry, RegistryConfig};

// Re-export the APDU types cards exchange with readers
pub use vcard_apdu_core::{Bytes, Command, Response, StatusWord};
