//! Live-operations registry

use super::types::{BatchOperation, BatchProgress};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// Type-erased handle to a running batch
pub trait LiveOperation: Send + Sync {
    /// Current progress snapshot
    fn status(&self) -> BatchProgress;
    /// Ask the run to stop before its next group
    fn cancel(&self);
}

impl<T: Send, R: Send> LiveOperation for Mutex<BatchOperation<T, R>> {
    fn status(&self) -> BatchProgress {
        self.lock().progress()
    }

    fn cancel(&self) {
        self.lock().cancelled = true;
    }
}

/// Batch runs that have started and not yet finished, keyed by id
#[derive(Default)]
pub struct OperationRegistry {
    operations: DashMap<String, Arc<dyn LiveOperation>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: &str, operation: Arc<dyn LiveOperation>) {
        self.operations.insert(id.to_string(), operation);
    }

    /// Register `operation` until the returned guard is dropped
    pub fn enroll(&self, id: &str, operation: Arc<dyn LiveOperation>) -> Registration<'_> {
        self.register(id, operation);
        Registration {
            registry: self,
            id: id.to_string(),
        }
    }

    pub fn remove(&self, id: &str) -> Option<Arc<dyn LiveOperation>> {
        self.operations.remove(id).map(|(_, operation)| operation)
    }

    pub fn get_status(&self, id: &str) -> Option<BatchProgress> {
        self.operations.get(id).map(|operation| operation.status())
    }

    /// Mark the operation cancelled and forget it
    ///
    /// Returns `false` when no live operation has this id.
    pub fn cancel(&self, id: &str) -> bool {
        match self.remove(id) {
            Some(operation) => {
                operation.cancel();
                info!("Cancelled batch operation {}", id);
                true
            }
            None => false,
        }
    }

    /// Ids of every live operation
    pub fn ids(&self) -> Vec<String> {
        self.operations
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Removes its operation from the registry on drop
///
/// A run whose future is dropped mid-flight unregisters itself the same way
/// as one that finished.
#[must_use = "the operation is unregistered as soon as the guard is dropped"]
pub struct Registration<'a> {
    registry: &'a OperationRegistry,
    id: String,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        if self.registry.remove(&self.id).is_some() {
            debug!("Batch operation {} unregistered", self.id);
        }
    }
}
