//! Configuration options for the reader registry

/// Default number of reader slots preallocated by a registry
pub const DEFAULT_INITIAL_CAPACITY: usize = 8;

/// Configuration options for a [`Registry`](crate::Registry)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Number of readers the registry preallocates room for
    pub initial_capacity: usize,

    /// Upper bound on registered readers; reaching it fails `add` with
    /// [`ReaderError::OutOfMemory`](crate::ReaderError::OutOfMemory)
    pub max_readers: Option<usize>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_readers: None,
        }
    }
}

impl RegistryConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the preallocated capacity
    pub const fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the maximum number of registered readers
    pub const fn with_max_readers(mut self, max_readers: usize) -> Self {
        self.max_readers = Some(max_readers);
        self
    }
}
