use std::env;

use serde::Deserialize;

use crate::core::{Result, StoreError};

/// Connection context consumed exactly once when a repository is
/// constructed: which database to select, and how to reach the server.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreContext {
    pub database_name: String,
    pub connection_string: String,
}

impl StoreContext {
    pub fn new(database_name: impl Into<String>, connection_string: impl Into<String>) -> Self {
        StoreContext {
            database_name: database_name.into(),
            connection_string: connection_string.into(),
        }
    }

    /// Load the context from environment variables.
    ///
    /// Reads `MONGODB_URI` and `MONGODB_DATABASE`, loading a `.env` file
    /// first if one is present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let context = StoreContext {
            database_name: env::var("MONGODB_DATABASE")
                .map_err(|_| StoreError::Configuration("MONGODB_DATABASE not set".to_string()))?,
            connection_string: env::var("MONGODB_URI")
                .map_err(|_| StoreError::Configuration("MONGODB_URI not set".to_string()))?,
        };

        context.validate()?;
        Ok(context)
    }

    /// Reject contexts that could never reach a database.
    pub fn validate(&self) -> Result<()> {
        if self.database_name.trim().is_empty() {
            return Err(StoreError::Configuration(
                "Database name must not be empty".to_string(),
            ));
        }

        if self.connection_string.trim().is_empty() {
            return Err(StoreError::Configuration(
                "Connection string must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
