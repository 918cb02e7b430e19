use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::{Result, StoreError};

/// Capability contract every persisted type must satisfy.
///
/// Implementors declare their backing collection once, at the type level,
/// and expose their [`ObjectId`] identity. The creation timestamp is always
/// derived from the id, never stored independently, so the two cannot
/// disagree; ids embed a big-endian UNIX timestamp in their leading bytes,
/// which also makes them time-ordered.
///
/// The id field must serialize as `_id` for the driver to treat it as the
/// document key:
///
/// ```
/// use docstore::{Document, ObjectId};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Invoice {
///     #[serde(rename = "_id")]
///     id: ObjectId,
///     total_cents: i64,
/// }
///
/// impl Document for Invoice {
///     const COLLECTION: &'static str = "invoices";
///
///     fn id(&self) -> ObjectId {
///         self.id
///     }
///
///     fn set_id(&mut self, id: ObjectId) {
///         self.id = id;
///     }
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync + Unpin {
    /// Name of the MongoDB collection backing this type.
    const COLLECTION: &'static str;

    /// Unique identifier of this document.
    fn id(&self) -> ObjectId;

    /// Replace the identifier; used when constructing a document that
    /// addresses an existing record by identity.
    fn set_id(&mut self, id: ObjectId);

    /// Creation time, decoded from the identifier's embedded timestamp.
    fn created_at(&self) -> DateTime<Utc> {
        self.id().timestamp().to_chrono()
    }
}

/// Resolve the collection name declared by `T`.
///
/// A blank declaration leaves a repository nothing usable to bind to, so it
/// is rejected here, before any connection is attempted.
pub fn collection_name<T: Document>() -> Result<&'static str> {
    let name = T::COLLECTION;
    if name.trim().is_empty() {
        return Err(StoreError::Configuration(format!(
            "Document type {} declares a blank collection name",
            std::any::type_name::<T>()
        )));
    }
    Ok(name)
}

/// Parse the canonical 24-character hex form of a document id.
pub fn parse_object_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|source| StoreError::InvalidId {
        id: id.to_string(),
        source,
    })
}
