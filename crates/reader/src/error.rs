//! Error types for reader operations

/// Result alias for reader operations
pub type Result<T, E = ReaderError> = std::result::Result<T, E>;

/// Recoverable outcomes of reader, registry and session calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReaderError {
    /// No card is inserted in the reader
    #[error("No card present in reader")]
    NoCard,

    /// The registry could not grow to hold another reader
    #[error("Out of memory")]
    OutOfMemory,

    /// The process-wide registry has not been initialized, or was torn down
    #[error("Reader registry not initialized")]
    NotInitialized,

    /// The process-wide registry is already initialized
    #[error("Reader registry already initialized")]
    AlreadyInitialized,
}
