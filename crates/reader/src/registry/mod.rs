//! Registry of live readers
//!
//! The registry keeps readers in insertion order behind a single lock. Each
//! registered reader is held by one counted reference owned by the registry,
//! taken on [`Registry::add`] and released on [`Registry::remove`] or
//! [`Registry::clear`].
//!
//! The registry lock is held only for appends, unlinks and linear scans. It is
//! never held while a reader lock is taken, while a reader is destroyed, or
//! while the event sink runs.
//!
//! [`Registry::close`] empties the registry for good: once closed, every
//! mutating call fails with [`ReaderError::NotInitialized`] and emits nothing.

mod config;
pub mod global;

pub use config::{DEFAULT_INITIAL_CAPACITY, RegistryConfig};

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::card::CardRef;
use crate::error::{ReaderError, Result};
use crate::event::{Event, EventSink};
use crate::reader::{Reader, ReaderId};

/// Ordered collection of live readers
pub struct Registry {
    /// Registered readers in insertion order
    readers: Mutex<Vec<Reader>>,
    /// Set once by [`Registry::close`], only while `readers` is locked
    closed: AtomicBool,
    /// Receiver of reader and card events
    sink: Box<dyn EventSink>,
    /// Configuration
    config: RegistryConfig,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.len())
            .field("closed", &self.is_closed())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Create an empty registry reporting to `sink`
    pub fn new(sink: impl EventSink + 'static) -> Self {
        Self::with_config(sink, RegistryConfig::default())
    }

    /// Create an empty registry with custom configuration
    pub fn with_config(sink: impl EventSink + 'static, config: RegistryConfig) -> Self {
        Self {
            readers: Mutex::new(Vec::with_capacity(config.initial_capacity)),
            closed: AtomicBool::new(false),
            sink: Box::new(sink),
            config,
        }
    }

    /// Get the registry configuration
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Number of registered readers
    pub fn len(&self) -> usize {
        self.readers.lock().len()
    }

    /// Whether no reader is registered
    pub fn is_empty(&self) -> bool {
        self.readers.lock().is_empty()
    }

    /// Whether the registry has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(ReaderError::NotInitialized);
        }
        Ok(())
    }

    /// Register a reader at the end of the registry
    ///
    /// The registry takes its own reference; the caller keeps theirs. Emits
    /// [`Event::ReaderInserted`] once the reader is visible to lookups. Fails
    /// with [`ReaderError::OutOfMemory`] and links nothing if the registry
    /// cannot grow, or with [`ReaderError::NotInitialized`] once it is closed.
    pub fn add(&self, reader: &Reader) -> Result<()> {
        {
            let mut readers = self.readers.lock();
            self.ensure_open()?;
            if self
                .config
                .max_readers
                .is_some_and(|max| readers.len() >= max)
            {
                return Err(ReaderError::OutOfMemory);
            }
            readers
                .try_reserve(1)
                .map_err(|_| ReaderError::OutOfMemory)?;
            readers.push(reader.clone());
        }

        debug!(reader = ?reader.name(), id = %reader.id(), "Reader added");
        self.sink.emit(Event::ReaderInserted(reader.clone()));
        Ok(())
    }

    /// Unregister a reader
    ///
    /// Matches by identity, not by name or id. Removing a reader that is not
    /// registered is not an error. Emits [`Event::ReaderRemoved`] after the
    /// registry's reference has been released.
    pub fn remove(&self, reader: &Reader) -> Result<()> {
        let entry = {
            let mut readers = self.readers.lock();
            self.ensure_open()?;
            readers
                .iter()
                .position(|r| Reader::same(r, reader))
                .map(|index| readers.remove(index))
        };

        match entry {
            Some(entry) => {
                drop(entry);
                debug!(reader = ?reader.name(), id = %reader.id(), "Reader removed");
            }
            None => debug!(reader = ?reader.name(), "Removing unregistered reader"),
        }

        self.sink.emit(Event::ReaderRemoved(reader.clone()));
        Ok(())
    }

    /// Find the first registered reader with the given id
    ///
    /// [`ReaderId::UNASSIGNED`] never matches.
    pub fn lookup_by_id(&self, id: ReaderId) -> Option<Reader> {
        if !id.is_assigned() {
            return None;
        }
        self.find(|reader| reader.id() == id)
    }

    /// Find the first registered reader with the given name
    pub fn lookup_by_name(&self, name: &str) -> Option<Reader> {
        self.find(|reader| reader.name() == Some(name))
    }

    fn find(&self, predicate: impl Fn(&Reader) -> bool) -> Option<Reader> {
        self.readers.lock().iter().find(|r| predicate(r)).cloned()
    }

    /// Take an independent snapshot of the registered readers
    ///
    /// The snapshot holds its own reference to each reader, so it stays valid
    /// and keeps its readers alive while the registry changes.
    pub fn snapshot(&self) -> ReaderList {
        let readers = self.readers.lock().clone();
        ReaderList { readers }
    }

    /// Insert a card into a reader, or remove it with `None`
    ///
    /// Releases the reference to any previously inserted card, then emits
    /// [`Event::CardInserted`] or [`Event::CardRemoved`] for the new state.
    pub fn insert_card(&self, reader: &Reader, card: Option<CardRef>) -> Result<()> {
        self.ensure_open()?;
        let previous = reader.replace_card(card);
        drop(previous);
        self.notify_card_state(reader);
        Ok(())
    }

    /// Emit the event describing the reader's current card state
    ///
    /// Lets an event consumer replay state without a new insertion or removal.
    /// A closed registry emits nothing.
    pub fn notify_card_state(&self, reader: &Reader) {
        if self.is_closed() {
            debug!(reader = ?reader.name(), "Registry closed, card state not reported");
            return;
        }
        let event = match reader.card() {
            Some(card) => {
                debug!(reader = ?reader.name(), id = %reader.id(), "Card inserted");
                Event::CardInserted {
                    reader: reader.clone(),
                    card,
                }
            }
            None => {
                debug!(reader = ?reader.name(), id = %reader.id(), "Card removed");
                Event::CardRemoved(reader.clone())
            }
        };
        self.sink.emit(event);
    }

    /// Unregister every reader, releasing the registry's references
    ///
    /// No events are emitted.
    pub fn clear(&self) {
        let readers = std::mem::take(&mut *self.readers.lock());
        debug!(count = readers.len(), "Clearing reader registry");
        drop(readers);
    }

    /// Release every registered reader and invalidate the registry
    ///
    /// No events are emitted. Closing twice is a no-op.
    pub fn close(&self) {
        let readers = {
            let mut readers = self.readers.lock();
            self.closed.store(true, Ordering::Release);
            std::mem::take(&mut *readers)
        };
        debug!(count = readers.len(), "Closing reader registry");
        drop(readers);
    }
}

/// Snapshot of the registry, in registration order
///
/// Each entry is a counted reference; dropping the list releases them.
#[derive(Debug, Clone, Default)]
pub struct ReaderList {
    readers: Vec<Reader>,
}

impl ReaderList {
    /// Number of readers in the snapshot
    pub fn len(&self) -> usize {
        self.readers.len()
    }

    /// Whether the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    /// First reader of the snapshot
    pub fn first(&self) -> Option<&Reader> {
        self.readers.first()
    }

    /// Iterate over the readers
    pub fn iter(&self) -> std::slice::Iter<'_, Reader> {
        self.readers.iter()
    }
}

impl IntoIterator for ReaderList {
    type Item = Reader;
    type IntoIter = std::vec::IntoIter<Reader>;

    fn into_iter(self) -> Self::IntoIter {
        self.readers.into_iter()
    }
}

impl<'a> IntoIterator for &'a ReaderList {
    type Item = &'a Reader;
    type IntoIter = std::slice::Iter<'a, Reader>;

    fn into_iter(self) -> Self::IntoIter {
        self.readers.iter()
    }
}
