use std::collections::HashSet;

use super::entry::{qualify, ConfigEntry};
use super::SchemaError;

/// Checks a schema before anything is bound to a store.
///
/// Rejects names that are empty or use anything but ASCII letters, digits,
/// `_` and `-` (store keys and flags are built from them), sibling names that collide (store keys are
/// case-insensitive), required parents, and required bools: `false` cannot be
/// told apart from "never set".
pub fn validate_schema(entries: &[ConfigEntry]) -> Result<(), SchemaError> {
    validate_level("", entries)
}

fn validate_level(prefix: &str, entries: &[ConfigEntry]) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();

    for entry in entries {
        let name = qualify(prefix, entry.name());

        if !is_valid_name(entry.name()) {
            return Err(SchemaError::InvalidName(name));
        }
        if !seen.insert(entry.name().to_lowercase()) {
            return Err(SchemaError::DuplicateName(name));
        }
        if entry.is_required() {
            if entry.is_parent() {
                return Err(SchemaError::GroupWithValue(name));
            }
            if entry.is_bool() {
                return Err(SchemaError::RequiredBool(name));
            }
        }
        if entry.is_parent() {
            validate_level(&name, entry.children())?;
        }
    }

    Ok(())
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
