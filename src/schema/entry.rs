use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::spec::EntrySpec;
use super::SchemaError;

/// The type tag of a schema entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    String,
    Bool,
    Int,
    Parent,
}

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Parent => "parent",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "bool" => Ok(Self::Bool),
            "int" => Ok(Self::Int),
            "parent" => Ok(Self::Parent),
            other => Err(other.to_string()),
        }
    }
}

/// The default of a scalar entry. Its variant is the entry's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    String(String),
    Bool(bool),
    Int(i64),
}

impl DefaultValue {
    pub fn entry_type(&self) -> EntryType {
        match self {
            Self::String(_) => EntryType::String,
            Self::Bool(_) => EntryType::Bool,
            Self::Int(_) => EntryType::Int,
        }
    }
}

impl From<&DefaultValue> for config::Value {
    fn from(value: &DefaultValue) -> Self {
        match value {
            DefaultValue::String(s) => config::Value::from(s.as_str()),
            DefaultValue::Bool(b) => config::Value::from(*b),
            DefaultValue::Int(i) => config::Value::from(*i),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Scalar(DefaultValue),
    Parent(Vec<ConfigEntry>),
}

/// One node of a configuration schema.
///
/// A scalar entry becomes one store key, one flag and one environment
/// variable. A parent entry only contributes a path segment to its children:
/// `db` with a child `port` yields the key `db.port`, the flag `--db-port` and
/// the variable `DB_PORT`.
///
/// ```
/// use snake_charm::ConfigEntry;
///
/// let schema = vec![
///     ConfigEntry::int("port", 80).help("Port to listen on").required(),
///     ConfigEntry::parent(
///         "db",
///         vec![ConfigEntry::string("host", "localhost").help("Database host")],
///     ),
/// ];
/// assert!(schema[1].is_parent());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "EntrySpec")]
pub struct ConfigEntry {
    name: String,
    help: String,
    required: bool,
    node: Node,
    prefix: String,
}

impl ConfigEntry {
    fn scalar(name: impl Into<String>, value: DefaultValue) -> Self {
        Self {
            name: name.into(),
            help: String::new(),
            required: false,
            node: Node::Scalar(value),
            prefix: String::new(),
        }
    }

    pub fn string(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self::scalar(name, DefaultValue::String(default.into()))
    }

    pub fn bool(name: impl Into<String>, default: bool) -> Self {
        Self::scalar(name, DefaultValue::Bool(default))
    }

    pub fn int(name: impl Into<String>, default: i64) -> Self {
        Self::scalar(name, DefaultValue::Int(default))
    }

    pub fn parent(name: impl Into<String>, children: Vec<ConfigEntry>) -> Self {
        Self {
            name: name.into(),
            help: String::new(),
            required: false,
            node: Node::Parent(children),
            prefix: String::new(),
        }
    }

    pub(crate) fn with_default(
        name: impl Into<String>,
        help: impl Into<String>,
        required: bool,
        value: DefaultValue,
    ) -> Self {
        Self::scalar(name, value).help(help).required_if(required)
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Marks the entry as required: its resolved value must not be the zero
    /// value of its type.
    pub fn required(self) -> Self {
        self.required_if(true)
    }

    fn required_if(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help_text(&self) -> &str {
        &self.help
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn entry_type(&self) -> EntryType {
        match &self.node {
            Node::Scalar(value) => value.entry_type(),
            Node::Parent(_) => EntryType::Parent,
        }
    }

    pub fn is_string(&self) -> bool {
        self.entry_type() == EntryType::String
    }

    pub fn is_bool(&self) -> bool {
        self.entry_type() == EntryType::Bool
    }

    pub fn is_int(&self) -> bool {
        self.entry_type() == EntryType::Int
    }

    pub fn is_parent(&self) -> bool {
        self.entry_type() == EntryType::Parent
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        match &self.node {
            Node::Scalar(value) => Some(value),
            Node::Parent(_) => None,
        }
    }

    pub fn as_string(&self) -> Result<&str, SchemaError> {
        match self.default_value() {
            Some(DefaultValue::String(s)) => Ok(s),
            _ => Err(self.wrong_type(EntryType::String)),
        }
    }

    pub fn as_int(&self) -> Result<i64, SchemaError> {
        match self.default_value() {
            Some(DefaultValue::Int(i)) => Ok(*i),
            _ => Err(self.wrong_type(EntryType::Int)),
        }
    }

    pub fn as_bool(&self) -> Result<bool, SchemaError> {
        match self.default_value() {
            Some(DefaultValue::Bool(b)) => Ok(*b),
            _ => Err(self.wrong_type(EntryType::Bool)),
        }
    }

    fn wrong_type(&self, requested: EntryType) -> SchemaError {
        SchemaError::WrongType {
            name: self.fully_qualified_name(),
            requested,
            actual: self.entry_type(),
        }
    }

    /// Children of a parent entry; empty for scalars.
    pub fn children(&self) -> &[ConfigEntry] {
        match &self.node {
            Node::Parent(children) => children,
            Node::Scalar(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut [ConfigEntry] {
        match &mut self.node {
            Node::Parent(children) => children,
            Node::Scalar(_) => Default::default(),
        }
    }

    /// Dotted path of the ancestors, as stamped by the last registration.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub(crate) fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn fully_qualified_name(&self) -> String {
        qualify(&self.prefix, &self.name)
    }

    pub fn flag_name(&self) -> String {
        self.fully_qualified_name().replace('.', "-")
    }
}

/// Joins a dotted prefix and a segment name.
pub(crate) fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
