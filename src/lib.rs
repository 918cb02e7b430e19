//! Typed repository layer over MongoDB collections.
//!
//! `docstore` maps each persisted Rust type to a named MongoDB collection and
//! exposes one generic [`Repository`] per type: filter, find-by-id, insert,
//! replace and delete, each as an async operation (cancellable by dropping
//! the future) with a blocking counterpart in [`repository::blocking`].
//!
//! A type opts in by implementing the [`Document`] trait, which declares the
//! backing collection once at the type level and exposes the document's
//! [`ObjectId`] identity. The creation timestamp is always decoded from the
//! id, never stored alongside it.
//!
//! ```no_run
//! use docstore::{doc, Document, ObjectId, Repository, StoreContext};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct User {
//!     #[serde(rename = "_id")]
//!     id: ObjectId,
//!     email: String,
//! }
//!
//! impl Document for User {
//!     const COLLECTION: &'static str = "users";
//!
//!     fn id(&self) -> ObjectId {
//!         self.id
//!     }
//!
//!     fn set_id(&mut self, id: ObjectId) {
//!         self.id = id;
//!     }
//! }
//!
//! # async fn run() -> docstore::Result<()> {
//! let context = StoreContext::new("app", "mongodb://localhost:27017");
//! let users = Repository::<User>::connect(&context).await?;
//!
//! let alice = User { id: ObjectId::new(), email: "alice@example.com".into() };
//! users.insert_one(&alice).await?;
//!
//! let found = users.find_one(doc! { "email": "alice@example.com" }).await?;
//! assert!(found.is_some());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod repository;

pub use crate::config::StoreContext;
pub use crate::core::traits::document::{collection_name, parse_object_id, Document};
pub use crate::core::{Result, StoreError};
pub use crate::repository::{blocking, Repository};

// Re-export the driver and the BSON building blocks callers need for
// filters, projections and ids.
pub use bson;
pub use mongodb;

pub use bson::doc;
pub use bson::oid::ObjectId;
