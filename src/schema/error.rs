use thiserror::Error;

use super::EntryType;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("{name} is of unknown type: {tag}")]
    UnknownType { name: String, tag: String },

    #[error("default of {name} does not match its type {expected}: {found}")]
    DefaultTypeMismatch {
        name: String,
        expected: EntryType,
        found: String,
    },

    #[error("parent entry {0} cannot have a default or be required")]
    GroupWithValue(String),

    #[error("{0} has children but is not a parent entry")]
    ScalarWithChildren(String),

    #[error("invalid entry name '{0}': names use only letters, digits, '_' and '-'")]
    InvalidName(String),

    #[error("duplicate entry name: {0}")]
    DuplicateName(String),

    #[error("bool entry {0} cannot be required")]
    RequiredBool(String),

    #[error("cannot read {name} as {requested}: entry is of type {actual}")]
    WrongType {
        name: String,
        requested: EntryType,
        actual: EntryType,
    },
}
