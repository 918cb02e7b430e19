pub mod blocking;

use bson::doc;
use mongodb::{Client, Collection, Cursor};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::StoreContext;
use crate::core::traits::document::{self, Document};
use crate::core::{Result, StoreError};

/// Strongly typed repository over exactly one MongoDB collection.
///
/// One instance per document type. The collection handle is bound at
/// construction and never re-bound; there is no other state, so a single
/// instance is safe to share across concurrent callers. Every operation is
/// a 1:1 translation into a driver call, and the driver's outcome is
/// returned unchanged; the layer adds no retry or caching behavior.
///
/// All operations are async; dropping the returned future abandons the call,
/// which is how callers in cooperative schedulers cancel
/// (`tokio::select!` and friends). A blocking counterpart lives in
/// [`blocking`].
#[derive(Debug)]
pub struct Repository<T: Document> {
    collection: Collection<T>,
}

impl<T: Document> Repository<T> {
    /// Connect to the store and bind the collection declared by `T`.
    ///
    /// The collection name is resolved before any I/O and the server is
    /// pinged before the handle is handed out, so every configuration
    /// failure surfaces here rather than on first use.
    pub async fn connect(context: &StoreContext) -> Result<Self> {
        let name = document::collection_name::<T>()?;
        context.validate()?;

        let client = Client::with_uri_str(&context.connection_string)
            .await
            .map_err(|e| StoreError::configuration(format!("Invalid connection string: {}", e)))?;

        let database = client.database(&context.database_name);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::configuration(format!("Database unreachable: {}", e)))?;

        info!(
            collection = name,
            database = %context.database_name,
            "repository bound"
        );

        Ok(Repository {
            collection: database.collection(name),
        })
    }

    /// Escape hatch: the raw typed collection handle, for ad hoc queries the
    /// operation set does not cover.
    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    /// Stream every document matching `filter`, in the store's natural
    /// order. No match yields an empty stream, not an error.
    pub async fn find(&self, filter: bson::Document) -> Result<Cursor<T>> {
        Ok(self.collection.find(filter).await?)
    }

    /// Stream a store-side projection of every document matching `filter`.
    ///
    /// The projection is applied by the server; only the selected fields
    /// travel over the wire, deserialized into `P`.
    pub async fn find_projected<P>(
        &self,
        filter: bson::Document,
        projection: bson::Document,
    ) -> Result<Cursor<P>>
    where
        P: DeserializeOwned + Send + Sync + Unpin,
    {
        let projected = self.collection.clone_with_type::<P>();
        Ok(projected.find(filter).projection(projection).await?)
    }

    /// First document matching `filter` in the store's natural order, or
    /// `None` when nothing matches.
    pub async fn find_one(&self, filter: bson::Document) -> Result<Option<T>> {
        Ok(self.collection.find_one(filter).await?)
    }

    /// Look a document up by the hex string form of its id.
    ///
    /// A malformed id is a caller error, reported before any I/O and
    /// distinct from an absent document.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        let id = document::parse_object_id(id)?;
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// Insert a single document. A duplicate id surfaces the store's
    /// conflict error unchanged.
    pub async fn insert_one(&self, document: &T) -> Result<()> {
        self.collection.insert_one(document).await?;
        Ok(())
    }

    /// Insert a batch of documents.
    ///
    /// A duplicate id anywhere in the batch surfaces the store's conflict
    /// error; documents inserted before the conflict are not rolled back.
    pub async fn insert_many(&self, documents: &[T]) -> Result<()> {
        self.collection.insert_many(documents).await?;
        Ok(())
    }

    /// Replace the stored document sharing `document`'s id with `document`.
    ///
    /// When no stored document has that id this is a no-op, mirroring the
    /// delete operations.
    pub async fn replace_one(&self, document: &T) -> Result<()> {
        self.collection
            .find_one_and_replace(doc! { "_id": document.id() }, document)
            .await?;
        Ok(())
    }

    /// Delete at most one document matching `filter`; no match is a no-op.
    pub async fn delete_one(&self, filter: bson::Document) -> Result<()> {
        self.collection.find_one_and_delete(filter).await?;
        Ok(())
    }

    /// Delete the document with the given id, if it exists. Idempotent.
    pub async fn delete_by_id(&self, id: &str) -> Result<()> {
        let id = document::parse_object_id(id)?;
        self.collection
            .find_one_and_delete(doc! { "_id": id })
            .await?;
        Ok(())
    }

    /// Delete every document matching `filter`; zero matches is a no-op.
    pub async fn delete_many(&self, filter: bson::Document) -> Result<()> {
        let result = self.collection.delete_many(filter).await?;
        debug!(
            collection = T::COLLECTION,
            deleted = result.deleted_count,
            "delete_many"
        );
        Ok(())
    }
}
