//! The string-tagged form of a schema entry.
//!
//! Schemas written as data (TOML, YAML, JSON) carry their type as a tag. They
//! deserialize into [`EntrySpec`] and are checked when converted into
//! [`ConfigEntry`], so an entry with an unknown tag never reaches a store.
//!
//! ```
//! use snake_charm::ConfigEntry;
//!
//! #[derive(serde::Deserialize)]
//! struct Schema {
//!     entry: Vec<ConfigEntry>,
//! }
//!
//! let schema: Schema = toml::from_str(
//!     r#"
//!     [[entry]]
//!     type = "int"
//!     name = "port"
//!     help = "Port on which to listen for requests"
//!     required = true
//!     default = 80
//!     "#,
//! )?;
//! assert_eq!(schema.entry[0].as_int()?, 80);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;

use serde::Deserialize;

use super::entry::{ConfigEntry, DefaultValue, EntryType};
use super::SchemaError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntrySpec {
    /// One of `string`, `bool`, `int`, `parent`.
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub required: bool,
    /// Absent means the zero value of the type.
    #[serde(default)]
    pub default: Option<SpecValue>,
    #[serde(default)]
    pub children: Vec<EntrySpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl fmt::Display for SpecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl TryFrom<EntrySpec> for ConfigEntry {
    type Error = SchemaError;

    fn try_from(spec: EntrySpec) -> Result<Self, Self::Error> {
        let entry_type: EntryType = spec.kind.parse().map_err(|tag| SchemaError::UnknownType {
            name: spec.name.clone(),
            tag,
        })?;

        let value = match entry_type {
            EntryType::Parent => {
                if spec.default.is_some() || spec.required {
                    return Err(SchemaError::GroupWithValue(spec.name));
                }
                let children = spec
                    .children
                    .into_iter()
                    .map(ConfigEntry::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(ConfigEntry::parent(spec.name, children).help(spec.help));
            }
            _ if !spec.children.is_empty() => {
                return Err(SchemaError::ScalarWithChildren(spec.name));
            }
            EntryType::String => match spec.default {
                None => DefaultValue::String(String::new()),
                Some(SpecValue::String(s)) => DefaultValue::String(s),
                Some(other) => return Err(mismatch(spec.name, entry_type, other)),
            },
            EntryType::Bool => match spec.default {
                None => DefaultValue::Bool(false),
                Some(SpecValue::Bool(b)) => DefaultValue::Bool(b),
                Some(other) => return Err(mismatch(spec.name, entry_type, other)),
            },
            EntryType::Int => match spec.default {
                None => DefaultValue::Int(0),
                Some(SpecValue::Int(i)) => DefaultValue::Int(i),
                Some(other) => return Err(mismatch(spec.name, entry_type, other)),
            },
        };

        Ok(ConfigEntry::with_default(
            spec.name,
            spec.help,
            spec.required,
            value,
        ))
    }
}

fn mismatch(name: String, expected: EntryType, found: SpecValue) -> SchemaError {
    SchemaError::DefaultTypeMismatch {
        name,
        expected,
        found: found.to_string(),
    }
}
