//! Blocking facade over the async repository.
//!
//! Every call delegates to the corresponding async operation and waits for
//! it on a runtime owned by the facade, the same shape the driver's own
//! sync API uses. Both forms therefore share one translation into the
//! driver, and their semantics cannot drift.
//!
//! These types must not be used from inside an async context; `block_on`
//! will panic there.

use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::Collection;
use serde::de::DeserializeOwned;
use tokio::runtime::{Builder, Runtime};

use crate::config::StoreContext;
use crate::core::traits::document::Document;
use crate::core::{Result, StoreError};

/// Blocking counterpart of [`crate::Repository`].
#[derive(Debug)]
pub struct Repository<T: Document> {
    inner: super::Repository<T>,
    runtime: Arc<Runtime>,
}

impl<T: Document> Repository<T> {
    /// Connect to the store and bind the collection declared by `T`,
    /// blocking until the connection is established.
    pub fn connect(context: &StoreContext) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(|e| StoreError::configuration(format!("Failed to start store runtime: {}", e)))?;

        let inner = runtime.block_on(super::Repository::connect(context))?;

        Ok(Repository {
            inner,
            runtime: Arc::new(runtime),
        })
    }

    /// Escape hatch: the raw typed collection handle.
    pub fn collection(&self) -> &Collection<T> {
        self.inner.collection()
    }

    /// Iterate every document matching `filter`, in the store's natural
    /// order. No match yields an empty iterator, not an error.
    pub fn find(&self, filter: bson::Document) -> Result<Cursor<T>> {
        let inner = self.runtime.block_on(self.inner.find(filter))?;
        Ok(Cursor {
            inner,
            runtime: Arc::clone(&self.runtime),
        })
    }

    /// Iterate a store-side projection of every document matching `filter`.
    pub fn find_projected<P>(
        &self,
        filter: bson::Document,
        projection: bson::Document,
    ) -> Result<Cursor<P>>
    where
        P: DeserializeOwned + Send + Sync + Unpin,
    {
        let inner = self
            .runtime
            .block_on(self.inner.find_projected::<P>(filter, projection))?;
        Ok(Cursor {
            inner,
            runtime: Arc::clone(&self.runtime),
        })
    }

    /// First document matching `filter`, or `None`.
    pub fn find_one(&self, filter: bson::Document) -> Result<Option<T>> {
        self.runtime.block_on(self.inner.find_one(filter))
    }

    /// Look a document up by the hex string form of its id.
    pub fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        self.runtime.block_on(self.inner.find_by_id(id))
    }

    pub fn insert_one(&self, document: &T) -> Result<()> {
        self.runtime.block_on(self.inner.insert_one(document))
    }

    pub fn insert_many(&self, documents: &[T]) -> Result<()> {
        self.runtime.block_on(self.inner.insert_many(documents))
    }

    /// Replace the stored document sharing `document`'s id; a missing
    /// identity is a no-op.
    pub fn replace_one(&self, document: &T) -> Result<()> {
        self.runtime.block_on(self.inner.replace_one(document))
    }

    /// Delete at most one document matching `filter`; no match is a no-op.
    pub fn delete_one(&self, filter: bson::Document) -> Result<()> {
        self.runtime.block_on(self.inner.delete_one(filter))
    }

    /// Delete the document with the given id, if it exists. Idempotent.
    pub fn delete_by_id(&self, id: &str) -> Result<()> {
        self.runtime.block_on(self.inner.delete_by_id(id))
    }

    /// Delete every document matching `filter`.
    pub fn delete_many(&self, filter: bson::Document) -> Result<()> {
        self.runtime.block_on(self.inner.delete_many(filter))
    }
}

/// Blocking cursor over query results; advances the underlying stream one
/// document per `next` call.
pub struct Cursor<T> {
    inner: mongodb::Cursor<T>,
    runtime: Arc<Runtime>,
}

impl<T> Iterator for Cursor<T>
where
    T: DeserializeOwned + Send + Sync + Unpin,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.runtime
            .block_on(self.inner.try_next())
            .map_err(StoreError::from)
            .transpose()
    }
}
