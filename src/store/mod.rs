//! The layered resolution store.
//!
//! A [`Store`] answers typed lookups by dotted key. Every lookup resolves a
//! [`config::Config`] assembled from the store's layers, lowest precedence
//! first:
//!
//! 1. defaults set with [`Store::set_default`]
//! 2. the config file loaded by [`Store::read_in_config`]
//! 3. environment variables, once [`Store::automatic_env`] is enabled
//! 4. command-line flags bound with [`Store::bind_flag`] and given on the command line
//! 5. explicit overrides set with [`Store::set`]
//!
//! Keys are case-insensitive. A key no layer knows reads as the zero value of
//! the requested type.

mod error;
mod file;
mod flags;
mod layer;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map, Source, Value};
use log::{debug, trace};

use crate::DEFAULT_CONFIG_NAME;
use flags::FlagSet;
use layer::Layer;

pub use error::StoreError;
pub use flags::FlagKind;

const DEFAULT_APP_NAME: &str = "app";

#[derive(Debug)]
pub struct Store {
    app_name: String,
    defaults: Map<String, Value>,
    overrides: Map<String, Value>,
    flags: FlagSet,
    automatic_env: bool,
    env_prefix: Option<String>,
    env_replacer: Vec<(String, String)>,
    file: Layer,
    config_name: String,
    config_paths: Vec<PathBuf>,
    config_file: Option<PathBuf>,
    config_file_used: Option<PathBuf>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            defaults: Map::new(),
            overrides: Map::new(),
            flags: FlagSet::default(),
            automatic_env: false,
            env_prefix: None,
            env_replacer: Vec::new(),
            file: Layer::default(),
            config_name: DEFAULT_CONFIG_NAME.to_string(),
            config_paths: Vec::new(),
            config_file: None,
            config_file_used: None,
        }
    }

    /// Sets the program name shown in flag usage and help output.
    pub fn set_app_name(&mut self, name: impl Into<String>) {
        self.app_name = name.into();
    }

    // Environment

    /// Enables the environment layer: every key with a default can also be
    /// set through the variable derived from it.
    pub fn automatic_env(&mut self) {
        self.automatic_env = true;
    }

    /// Sets the substitutions applied to a key before it becomes a variable name,
    /// e.g. `[(".", "_")]` so that `db.port` reads `DB_PORT`.
    pub fn set_env_key_replacer<F, T>(&mut self, pairs: impl IntoIterator<Item = (F, T)>)
    where
        F: Into<String>,
        T: Into<String>,
    {
        self.env_replacer = pairs
            .into_iter()
            .map(|(from, to)| (from.into(), to.into()))
            .collect();
    }

    /// Prepends `<PREFIX>_` to every variable name. An empty prefix clears it.
    pub fn set_env_prefix(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        self.env_prefix = (!prefix.is_empty()).then_some(prefix);
    }

    /// The environment variable consulted for `key`.
    pub fn env_key(&self, key: &str) -> String {
        let name = self.env_name(key).to_uppercase();
        match &self.env_prefix {
            Some(prefix) => format!("{}_{name}", prefix.to_uppercase()),
            None => name,
        }
    }

    /// `key` with the replacer applied, as `config::Environment` reports it
    /// once the prefix is stripped.
    fn env_name(&self, key: &str) -> String {
        self.env_replacer
            .iter()
            .fold(key.to_lowercase(), |name, (from, to)| name.replace(from.as_str(), to))
    }

    fn env_layer(&self) -> Result<Layer, StoreError> {
        let source = match &self.env_prefix {
            Some(prefix) => Environment::with_prefix(prefix).prefix_separator("_"),
            None => Environment::default(),
        };
        let vars = source.ignore_empty(true).collect()?;

        Ok(Layer::from_dotted(self.defaults.keys().filter_map(|key| {
            let value = vars.get(&self.env_name(key))?;
            trace!("{key} set from environment {}", self.env_key(key));
            Some((key.clone(), value.clone()))
        })))
    }

    // Config file

    /// Base name (without extension) searched for by [`read_in_config`](Self::read_in_config).
    pub fn set_config_name(&mut self, name: impl Into<String>) {
        self.config_name = name.into();
    }

    /// Adds a directory to the config file search. Directories are searched in
    /// the order they were added.
    pub fn add_config_path(&mut self, dir: impl AsRef<Path>) {
        self.config_paths.push(dir.as_ref().to_path_buf());
    }

    /// Uses exactly this file, bypassing the search.
    pub fn set_config_file(&mut self, path: impl AsRef<Path>) {
        self.config_file = Some(path.as_ref().to_path_buf());
    }

    /// The file loaded by the last successful [`read_in_config`](Self::read_in_config).
    pub fn config_file_used(&self) -> Option<&Path> {
        self.config_file_used.as_deref()
    }

    /// Finds, reads and parses the config file, replacing the file layer.
    ///
    /// On failure the file layer is left as it was.
    pub fn read_in_config(&mut self) -> Result<PathBuf, StoreError> {
        let path = match &self.config_file {
            Some(path) => path.clone(),
            None => file::find_config_file(&self.config_name, &self.config_paths)?,
        };

        self.file = file::load_config_file(&path)?;
        debug!("loaded config file {}", path.display());
        self.config_file_used = Some(path.clone());
        Ok(path)
    }

    // Flags

    pub fn declare_flag(
        &mut self,
        name: impl Into<String>,
        kind: FlagKind,
        help: impl Into<String>,
    ) -> Result<(), StoreError> {
        self.flags.declare(name, kind, help)
    }

    /// Resolves `key` from the flag named `flag` whenever that flag is given.
    pub fn bind_flag(&mut self, key: &str, flag: &str) -> Result<(), StoreError> {
        self.flags.bind(key, flag)
    }

    /// The flag bound to `key`, if any.
    pub fn bound_flag(&self, key: &str) -> Option<&str> {
        self.flags.binding(key)
    }

    /// Parses the command line against the declared flags. `args` starts with
    /// the program name, as [`std::env::args_os`] does.
    pub fn parse_flags<I, T>(&mut self, args: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.flags.parse(&self.app_name, args)
    }

    /// Renders `--help` output for the declared flags.
    pub fn flag_help(&self) -> String {
        self.flags.command(&self.app_name).render_help().to_string()
    }

    // Values

    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) {
        self.defaults.insert(key.to_lowercase(), value.into());
    }

    /// Sets a value that wins over every other layer.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.overrides.insert(key.to_lowercase(), value.into());
    }

    /// Raw lookup through all layers.
    pub fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        found(self.resolve()?.get::<Value>(&key.to_lowercase()))
    }

    pub fn is_set(&self, key: &str) -> bool {
        matches!(self.get(key), Ok(Some(_)))
    }

    pub fn get_string(&self, key: &str) -> Result<String, StoreError> {
        let value = found(self.resolve()?.get_string(&key.to_lowercase()))?;
        Ok(value.unwrap_or_default())
    }

    pub fn get_int(&self, key: &str) -> Result<i64, StoreError> {
        let value = found(self.resolve()?.get_int(&key.to_lowercase()))?;
        Ok(value.unwrap_or_default())
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, StoreError> {
        let value = found(self.resolve()?.get_bool(&key.to_lowercase()))?;
        Ok(value.unwrap_or_default())
    }

    /// Assembles the layers into one `Config`. The environment is read anew
    /// on every call.
    fn resolve(&self) -> Result<Config, StoreError> {
        let mut builder = Config::builder();
        for (key, value) in &self.defaults {
            builder = builder.set_default(key.as_str(), value.clone())?;
        }

        builder = builder.add_source(self.file.clone());
        if self.automatic_env {
            builder = builder.add_source(self.env_layer()?);
        }
        builder = builder.add_source(self.flags.layer());

        for (key, value) in &self.overrides {
            builder = builder.set_override(key.as_str(), value.clone())?;
        }

        Ok(builder.build()?)
    }
}

/// Maps `NotFound` to `None`, keeping every other error.
fn found<T>(result: Result<T, ConfigError>) -> Result<Option<T>, StoreError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
