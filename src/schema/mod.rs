//! Configuration schemas and the traversals that bind them to a store.

mod entry;
mod error;
mod register;
mod spec;
mod validate;
mod verify;

pub use entry::{ConfigEntry, DefaultValue, EntryType};
pub use error::SchemaError;
pub use register::register;
pub use spec::{EntrySpec, SpecValue};
pub use validate::validate_schema;
pub use verify::verify_required;
