//! Bind a declarative configuration schema to command-line flags, environment
//! variables and an optional config file.
//!
//! A schema is a tree of [`ConfigEntry`] values. [`build`] (or [`Builder`])
//! registers every scalar entry with a [`Store`] as a default plus a flag,
//! resolves values with flag > environment > config file > default precedence,
//! and reports required entries that resolved to their zero value.

mod builder;
mod error;
pub mod schema;
pub mod store;

pub use builder::{build, Builder, DEFAULT_CONFIG_NAME, DEFAULT_CONFIG_PATHS};
pub use error::Error;
pub use schema::{ConfigEntry, SchemaError};
pub use store::{Store, StoreError};
