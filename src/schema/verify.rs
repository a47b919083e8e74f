use log::debug;

use crate::store::Store;

use super::entry::{qualify, ConfigEntry, EntryType};

/// Returns the dotted names of required entries that resolved to their zero
/// value (`""` for strings, `0` for ints), in depth-first pre-order.
///
/// A value that cannot be read as the entry's type counts as missing, so one
/// bad value never hides the others.
///
/// Names are built from `prefix` and each entry's name, so the schema does not
/// need to have been registered first.
pub fn verify_required(store: &Store, prefix: &str, entries: &[ConfigEntry]) -> Vec<String> {
    let mut missing = Vec::new();

    for entry in entries {
        let key = qualify(prefix, entry.name());

        let resolved = match entry.entry_type() {
            EntryType::Parent => {
                missing.extend(verify_required(store, &key, entry.children()));
                continue;
            }
            _ if !entry.is_required() => continue,
            EntryType::String => store.get_string(&key).map(|s| !s.is_empty()),
            EntryType::Int => store.get_int(&key).map(|i| i != 0),
            // Rejected by schema validation; `false` is indistinguishable from unset.
            EntryType::Bool => continue,
        };

        match resolved {
            Ok(true) => {}
            Ok(false) => missing.push(key),
            Err(e) => {
                debug!("{key} has no usable value: {e}");
                missing.push(key);
            }
        }
    }

    missing
}
