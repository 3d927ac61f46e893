//! Process-wide registry
//!
//! Front ends that cannot thread a [`Registry`] handle through their call
//! paths share one instance here. It must be created with [`init`] before use
//! and is invalidated by [`teardown`].

use std::sync::Arc;

use parking_lot::{RwLock, const_rwlock};
use tracing::debug;

use crate::error::{ReaderError, Result};
use crate::event::EventSink;
use crate::registry::{Registry, RegistryConfig};

static REGISTRY: RwLock<Option<Arc<Registry>>> = const_rwlock(None);

/// Create the process-wide registry
pub fn init(sink: impl EventSink + 'static) -> Result<Arc<Registry>> {
    init_with_config(sink, RegistryConfig::default())
}

/// Create the process-wide registry with custom configuration
pub fn init_with_config(
    sink: impl EventSink + 'static,
    config: RegistryConfig,
) -> Result<Arc<Registry>> {
    let mut slot = REGISTRY.write();
    if slot.is_some() {
        return Err(ReaderError::AlreadyInitialized);
    }
    let registry = Arc::new(Registry::with_config(sink, config));
    *slot = Some(Arc::clone(&registry));
    debug!("Reader registry initialized");
    Ok(registry)
}

/// Get the process-wide registry
pub fn get() -> Result<Arc<Registry>> {
    REGISTRY.read().clone().ok_or(ReaderError::NotInitialized)
}

/// Tear down the process-wide registry
///
/// Every reader reference the registry holds is released, including when other
/// handles to the registry are still alive. Those handles see an empty, closed
/// registry that rejects further changes.
pub fn teardown() -> Result<()> {
    let registry = REGISTRY.write().take().ok_or(ReaderError::NotInitialized)?;
    registry.close();
    debug!("Reader registry torn down");
    Ok(())
}
