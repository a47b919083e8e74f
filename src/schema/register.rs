use log::trace;

use crate::store::{FlagKind, Store, StoreError};

use super::entry::{ConfigEntry, DefaultValue};

/// Registers `entries` with `store`, stamping each entry's prefix on the way.
///
/// Every scalar entry declares a flag named [`ConfigEntry::flag_name`], sets
/// the store default for [`ConfigEntry::fully_qualified_name`], and binds that
/// key to the flag. Parent entries recurse into their children with their own
/// dotted name as the prefix; they declare and bind nothing themselves.
///
/// Registering the same schema twice into one store fails with
/// [`StoreError::DuplicateFlag`]. Registering it into a fresh store stamps the
/// same prefixes again.
pub fn register<'s>(
    store: &'s mut Store,
    prefix: &str,
    entries: &mut [ConfigEntry],
) -> Result<&'s mut Store, StoreError> {
    for entry in entries.iter_mut() {
        entry.set_prefix(prefix);
        let key = entry.fully_qualified_name();

        match entry.default_value().cloned() {
            None => {
                register(store, &key, entry.children_mut())?;
            }
            Some(default) => {
                let flag = entry.flag_name();
                let kind = match default {
                    DefaultValue::Bool(_) => FlagKind::Bool,
                    DefaultValue::Int(_) => FlagKind::Int,
                    DefaultValue::String(_) => FlagKind::String,
                };

                store.declare_flag(flag.clone(), kind, entry.help_text())?;
                store.set_default(&key, &default);
                store.bind_flag(&key, &flag)?;
                trace!("registered {key} as --{flag}");
            }
        }
    }

    Ok(store)
}
