//! Reader handles

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::card::CardRef;

/// Identifier assigned to a reader by the device front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub struct ReaderId(u32);

impl ReaderId {
    /// Id of a reader that has not been assigned one yet
    pub const UNASSIGNED: Self = Self(u32::MAX);

    /// Create a reader id
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw id value
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this is a real id rather than [`ReaderId::UNASSIGNED`]
    pub const fn is_assigned(self) -> bool {
        self.0 != Self::UNASSIGNED.0
    }
}

impl From<u32> for ReaderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

type Private = Box<dyn Any + Send + Sync>;

struct Inner {
    name: Option<String>,
    id: AtomicU32,
    /// Inserted card; the lock also orders card swaps against readers of it
    card: Mutex<Option<CardRef>>,
    /// Creator payload, dropped exactly once with the last handle
    private: Option<Private>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        debug!(reader = ?self.name, "Destroying reader");
    }
}

/// Counted handle to a virtual card reader
///
/// Cloning a `Reader` acquires a new reference and dropping one releases it.
/// The reader, its card reference and its private payload are released when
/// the last handle goes away, whether that handle belonged to the creator, the
/// [`Registry`](crate::Registry) or a [`ReaderList`](crate::ReaderList) snapshot.
#[derive(Clone)]
pub struct Reader {
    inner: Arc<Inner>,
}

impl fmt::Debug for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("name", &self.inner.name)
            .field("id", &self.id())
            .field("has_card", &self.card_is_present())
            .field("has_private", &self.inner.private.is_some())
            .finish()
    }
}

impl Reader {
    /// Create a named reader with no card and no id
    pub fn new(name: impl Into<String>) -> Self {
        ReaderBuilder::new().name(name).build()
    }

    /// Start building a reader
    pub const fn builder() -> ReaderBuilder {
        ReaderBuilder::new()
    }

    /// Whether two handles refer to the same reader
    pub fn same(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Number of live handles to this reader
    pub fn reference_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Reader id, [`ReaderId::UNASSIGNED`] until [`Reader::set_id`] is called
    pub fn id(&self) -> ReaderId {
        ReaderId(self.inner.id.load(Ordering::Acquire))
    }

    /// Assign the reader id
    pub fn set_id(&self, id: ReaderId) {
        self.inner.id.store(id.0, Ordering::Release);
    }

    /// Display name given at construction
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Private payload, if one of type `T` was given at construction
    pub fn private_data<T: Any>(&self) -> Option<&T> {
        self.inner.private.as_deref()?.downcast_ref()
    }

    /// Acquire a reference to the inserted card
    pub fn card(&self) -> Option<CardRef> {
        self.inner.card.lock().clone()
    }

    /// Whether a card is inserted
    pub fn card_is_present(&self) -> bool {
        self.card().is_some()
    }

    /// Swap the inserted card, returning the reference previously held
    ///
    /// The caller drops the returned reference, outside of the reader lock.
    pub(crate) fn replace_card(&self, card: Option<CardRef>) -> Option<CardRef> {
        std::mem::replace(&mut *self.inner.card.lock(), card)
    }
}

/// Builder for [`Reader`]
#[derive(Default)]
pub struct ReaderBuilder {
    name: Option<String>,
    id: Option<ReaderId>,
    private: Option<Private>,
}

impl fmt::Debug for ReaderBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderBuilder")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("has_private", &self.private.is_some())
            .finish()
    }
}

impl ReaderBuilder {
    /// Create a builder for an unnamed reader
    pub const fn new() -> Self {
        Self {
            name: None,
            id: None,
            private: None,
        }
    }

    /// Set the display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the initial id
    pub const fn id(mut self, id: ReaderId) -> Self {
        self.id = Some(id);
        self
    }

    /// Attach a private payload owned by the reader
    ///
    /// The payload is dropped when the last handle to the reader is released,
    /// so its `Drop` impl is the release hook.
    pub fn private<T: Any + Send + Sync>(mut self, data: T) -> Self {
        self.private = Some(Box::new(data));
        self
    }

    /// Create the reader, returning the creator's handle
    pub fn build(self) -> Reader {
        let id = self.id.unwrap_or(ReaderId::UNASSIGNED);
        debug!(reader = ?self.name, %id, "Creating reader");
        Reader {
            inner: Arc::new(Inner {
                name: self.name,
                id: AtomicU32::new(id.0),
                card: Mutex::new(None),
                private: self.private,
            }),
        }
    }
}
