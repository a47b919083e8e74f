use crate::schema::SchemaError;
use crate::store::{Store, StoreError};
use thiserror::Error;

/// Top-level error type for the snake-charm library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid schema: {0}")]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Required entries resolved to their zero value. The store is carried
    /// along so callers can still inspect what did resolve.
    #[error("you must set these config items: {}", .keys.join(", "))]
    MissingRequired { keys: Vec<String>, store: Box<Store> },
}

impl Error {
    /// Dotted names of the missing required entries, if that is what failed.
    pub fn missing_keys(&self) -> &[String] {
        match self {
            Self::MissingRequired { keys, .. } => keys,
            _ => &[],
        }
    }

    /// Recovers the partially-resolved store from a missing-required failure.
    pub fn into_store(self) -> Option<Store> {
        match self {
            Self::MissingRequired { store, .. } => Some(*store),
            _ => None,
        }
    }
}
