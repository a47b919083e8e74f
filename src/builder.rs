use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::debug;

use crate::schema::{register, validate_schema, verify_required, ConfigEntry};
use crate::store::Store;
use crate::Error;

/// Base name of the optional config file.
pub const DEFAULT_CONFIG_NAME: &str = "config";

/// Directories searched for the config file, in order.
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["/etc/hackbot2000", "."];

/// Binds a schema to a store and resolves it.
///
/// Building runs these steps in order:
///
/// 1. validate the schema; nothing is bound if it is malformed
/// 2. enable environment lookup, `db.port` reading `DB_PORT`
/// 3. read the config file if one is found; failures are ignored
/// 4. register every entry as a default plus a flag
/// 5. parse the command line
/// 6. check that every required entry resolved to a non-zero value
///
/// Values resolve with flag > environment > config file > default precedence.
///
/// ## Example
///
/// ```no_run
/// use snake_charm::{Builder, ConfigEntry};
///
/// let mut schema = vec![
///     ConfigEntry::int("port", 80).help("Port on which to listen").required(),
///     ConfigEntry::parent(
///         "db",
///         vec![ConfigEntry::string("username", "").help("Database user").required()],
///     ),
/// ];
///
/// let store = Builder::new()
///     .with_config_paths(["/etc/myapp", "."])
///     .build(&mut schema)?;
///
/// let port = store.get_int("port")?;
/// let user = store.get_string("db.username")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct Builder {
    store: Option<Store>,
    app_name: Option<String>,
    config_name: String,
    config_paths: Vec<PathBuf>,
    env_prefix: Option<String>,
    args: Option<Vec<OsString>>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            store: None,
            app_name: None,
            config_name: DEFAULT_CONFIG_NAME.to_string(),
            config_paths: DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from).collect(),
            env_prefix: None,
            args: None,
        }
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds into an existing store instead of a fresh one.
    pub fn with_store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }

    /// Program name used in flag usage and help output.
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    pub fn with_config_name(mut self, name: impl Into<String>) -> Self {
        self.config_name = name.into();
        self
    }

    /// Replaces the directories searched for the config file.
    pub fn with_config_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.config_paths = paths
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect();
        self
    }

    /// Environment variables are read as `<PREFIX>_<KEY>`.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Command line to parse, program name first. Defaults to
    /// [`std::env::args_os`].
    pub fn with_args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Registers `entries`, resolves them, and checks required entries.
    ///
    /// Entries get their prefixes stamped. When required entries are missing
    /// the store comes back inside [`Error::MissingRequired`].
    pub fn build(self, entries: &mut [ConfigEntry]) -> Result<Store, Error> {
        validate_schema(entries)?;

        let mut store = self.store.unwrap_or_default();
        if let Some(name) = self.app_name {
            store.set_app_name(name);
        }

        store.set_env_key_replacer([(".", "_")]);
        if let Some(prefix) = self.env_prefix {
            store.set_env_prefix(prefix);
        }
        store.automatic_env();

        store.set_config_name(self.config_name);
        for dir in &self.config_paths {
            store.add_config_path(dir);
        }
        // The file is optional: flags and environment can supply everything.
        if let Err(e) = store.read_in_config() {
            debug!("no config file loaded: {e}");
        }

        register(&mut store, "", entries)?;

        match self.args {
            Some(args) => store.parse_flags(args)?,
            None => store.parse_flags(std::env::args_os())?,
        }

        let missing = verify_required(&store, "", entries);
        if !missing.is_empty() {
            debug!("missing required config: {}", missing.join(", "));
            return Err(Error::MissingRequired {
                keys: missing,
                store: Box::new(store),
            });
        }

        Ok(store)
    }
}

/// Builds `entries` into `store`, or into a fresh store, with the default
/// config file search and the process command line.
pub fn build(store: Option<Store>, entries: &mut [ConfigEntry]) -> Result<Store, Error> {
    let builder = match store {
        Some(store) => Builder::new().with_store(store),
        None => Builder::new(),
    };
    builder.build(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaError;
    use crate::store::StoreError;
    use serial_test::serial;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_search() {
        let builder = Builder::new();
        assert_eq!(builder.config_name, "config");
        assert_eq!(
            builder.config_paths,
            vec![PathBuf::from("/etc/hackbot2000"), PathBuf::from(".")]
        );
    }

    #[test]
    #[serial]
    fn test_custom_config_name_and_path() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("hackbot.json"), r#"{"slack": {"token": "xoxb"}}"#).unwrap();

        let mut schema = vec![ConfigEntry::parent(
            "slack",
            vec![ConfigEntry::string("token", "").required()],
        )];
        let store = Builder::new()
            .with_config_name("hackbot")
            .with_config_paths([dir.path()])
            .with_env_prefix("SNAKE_BUILDER_TEST")
            .with_args(["app"])
            .build(&mut schema)
            .unwrap();

        assert_eq!(store.get_string("slack.token").unwrap(), "xoxb");
        assert_eq!(
            store.config_file_used(),
            Some(dir.path().join("hackbot.json").as_path())
        );
    }

    #[test]
    #[serial]
    fn test_malformed_config_file_is_ignored() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "port = = 1").unwrap();

        let mut schema = vec![ConfigEntry::int("port", 80).required()];
        let store = Builder::new()
            .with_config_paths([dir.path()])
            .with_env_prefix("SNAKE_BUILDER_TEST")
            .with_args(["app"])
            .build(&mut schema)
            .unwrap();

        assert_eq!(store.get_int("port").unwrap(), 80);
        assert_eq!(store.config_file_used(), None);
    }

    #[test]
    #[serial]
    fn test_existing_store_is_reused() {
        let dir = tempdir().unwrap();
        let mut store = Store::new();
        store.set("db.name", "orders");

        let mut schema = vec![ConfigEntry::parent(
            "db",
            vec![ConfigEntry::string("name", "").required()],
        )];
        let store = Builder::new()
            .with_store(store)
            .with_config_paths([dir.path()])
            .with_env_prefix("SNAKE_BUILDER_TEST")
            .with_args(["app"])
            .build(&mut schema)
            .unwrap();

        assert_eq!(store.get_string("db.name").unwrap(), "orders");
        assert_eq!(store.bound_flag("db.name"), Some("db-name"));
    }

    #[test]
    fn test_schema_errors_stop_the_build() {
        let mut schema = vec![ConfigEntry::bool("debug", false).required()];
        let result = Builder::new().with_args(["app"]).build(&mut schema);

        assert!(matches!(
            result,
            Err(Error::Schema(SchemaError::RequiredBool(name))) if name == "debug"
        ));
        assert_eq!(schema[0].prefix(), "");
    }

    #[test]
    #[serial]
    fn test_flag_parse_errors_propagate() {
        let dir = tempdir().unwrap();
        let mut schema = vec![ConfigEntry::int("port", 80)];
        let result = Builder::new()
            .with_config_paths([dir.path()])
            .with_args(["app", "--port", "eighty"])
            .build(&mut schema);

        assert!(matches!(result, Err(Error::Store(StoreError::Flags(_)))));
    }
}
