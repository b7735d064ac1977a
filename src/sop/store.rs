//! Shared, atomically replaceable handle to the current SOP index.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use super::{
    index::{self, RawDocument, SopIndex},
    resolve::{self, Resolution},
};

/// SOP store for the application.
///
/// Readers take a snapshot of the whole index, and writers swap in a fully built index,
/// so a resolve never sees a mix of old and new documents.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone, Default)]
pub struct SopStore {
    current: Arc<RwLock<Arc<SopIndex>>>,
}

impl SopStore {
    pub fn new(index: SopIndex) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(index))),
        }
    }

    /// Get the index as it is right now.
    pub fn snapshot(&self) -> Arc<SopIndex> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Index the documents in isolation, then publish the result.
    pub fn reindex<I>(&self, documents: I) -> Arc<SopIndex>
    where
        I: IntoIterator<Item = RawDocument>,
    {
        let index = Arc::new(index::index(documents));

        info!("Publishing SOP index with {} documents and {} sections.", index.document_count(), index.section_count());

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = index.clone();

        index
    }

    /// Resolve against a single snapshot of the index.
    pub fn resolve(&self, cabin: &str, issue: &str) -> Resolution {
        let snapshot = self.snapshot();
        resolve::resolve(&snapshot, cabin, issue)
    }
}
