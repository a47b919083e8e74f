use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("config file '{name}' not found in {searched:?}")]
    ConfigFileNotFound { name: String, searched: Vec<PathBuf> },

    #[error("flag --{0} is already declared")]
    DuplicateFlag(String),

    #[error("flag --{0} is reserved")]
    ReservedFlag(String),

    #[error("invalid flag name '{0}'")]
    InvalidFlag(String),

    #[error("cannot bind '{key}': flag --{flag} is not declared")]
    UnknownFlag { key: String, flag: String },

    #[error(transparent)]
    Flags(#[from] clap::Error),

    /// Reading a config file, collecting the environment, or coercing a
    /// resolved value failed.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
