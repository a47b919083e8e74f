//! Command-line flags, declared at runtime and parsed with clap.

use std::collections::BTreeMap;
use std::ffi::OsString;

use clap::builder::BoolishValueParser;
use clap::{value_parser, Arg, ArgAction, Command};
use config::Value;

use super::layer::Layer;
use super::StoreError;

/// Flag names clap claims for itself.
const RESERVED: [&str; 1] = ["help"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Bool,
    Int,
    String,
}

#[derive(Debug, Clone)]
struct FlagSpec {
    name: String,
    kind: FlagKind,
    help: String,
}

impl FlagSpec {
    fn to_arg(&self) -> Arg {
        let arg = Arg::new(self.name.clone())
            .long(self.name.clone())
            .help(self.help.clone())
            .action(ArgAction::Set);

        match self.kind {
            FlagKind::Bool => arg
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_parser(BoolishValueParser::new()),
            FlagKind::Int => arg
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true),
            FlagKind::String => arg.value_parser(value_parser!(String)),
        }
    }
}

/// The flag layer of a store.
///
/// Flags are declared one by one, bound to store keys, and parsed in a single
/// pass. Only flags present on the command line take part in resolution; an
/// absent flag never shadows a lower layer.
#[derive(Debug, Default)]
pub struct FlagSet {
    declared: Vec<FlagSpec>,
    bindings: BTreeMap<String, String>,
    parsed: BTreeMap<String, Value>,
}

impl FlagSet {
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        kind: FlagKind,
        help: impl Into<String>,
    ) -> Result<(), StoreError> {
        let name = name.into();
        if name.is_empty() || name.starts_with('-') || name.contains(char::is_whitespace) {
            return Err(StoreError::InvalidFlag(name));
        }
        if RESERVED.contains(&name.as_str()) {
            return Err(StoreError::ReservedFlag(name));
        }
        if self.is_declared(&name) {
            return Err(StoreError::DuplicateFlag(name));
        }

        self.declared.push(FlagSpec {
            name,
            kind,
            help: help.into(),
        });
        Ok(())
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.iter().any(|spec| spec.name == name)
    }

    pub fn bind(&mut self, key: &str, flag: &str) -> Result<(), StoreError> {
        if !self.is_declared(flag) {
            return Err(StoreError::UnknownFlag {
                key: key.to_string(),
                flag: flag.to_string(),
            });
        }
        self.bindings.insert(key.to_lowercase(), flag.to_string());
        Ok(())
    }

    /// Returns the flag bound to `key`, if any.
    pub fn binding(&self, key: &str) -> Option<&str> {
        self.bindings.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn command(&self, app_name: &str) -> Command {
        Command::new(app_name.to_string())
            .args_override_self(true)
            .args(self.declared.iter().map(FlagSpec::to_arg))
    }

    /// Parses `args` (program name first) and records every flag that was given.
    pub fn parse<I, T>(&mut self, app_name: &str, args: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command(app_name).try_get_matches_from(args)?;

        self.parsed = self
            .declared
            .iter()
            .filter_map(|spec| {
                let id = spec.name.as_str();
                let value = match spec.kind {
                    FlagKind::Bool => matches
                        .try_get_one::<bool>(id)
                        .ok()
                        .flatten()
                        .map(|b| Value::from(*b)),
                    FlagKind::Int => matches
                        .try_get_one::<i64>(id)
                        .ok()
                        .flatten()
                        .map(|i| Value::from(*i)),
                    FlagKind::String => matches
                        .try_get_one::<String>(id)
                        .ok()
                        .flatten()
                        .map(|s| Value::from(s.as_str())),
                }?;
                Some((spec.name.clone(), value))
            })
            .collect();

        Ok(())
    }

    /// Every bound key whose flag was given, as one resolution layer.
    pub fn layer(&self) -> Layer {
        Layer::from_dotted(self.bindings.iter().filter_map(|(key, flag)| {
            let value = self.parsed.get(flag)?;
            Some((key.clone(), value.clone()))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Config;

    fn resolve(flags: &FlagSet) -> Config {
        Config::builder().add_source(flags.layer()).build().unwrap()
    }

    fn sample() -> FlagSet {
        let mut flags = FlagSet::default();
        flags.declare("port", FlagKind::Int, "Port to listen on").unwrap();
        flags.declare("verbose", FlagKind::Bool, "Chatty output").unwrap();
        flags.declare("db-host", FlagKind::String, "Database host").unwrap();
        flags.bind("port", "port").unwrap();
        flags.bind("verbose", "verbose").unwrap();
        flags.bind("db.host", "db-host").unwrap();
        flags
    }

    #[test]
    fn test_declare_duplicate() {
        let mut flags = sample();
        let result = flags.declare("port", FlagKind::String, "again");
        assert!(matches!(result, Err(StoreError::DuplicateFlag(name)) if name == "port"));
    }

    #[test]
    fn test_declare_reserved_and_invalid() {
        let mut flags = FlagSet::default();
        assert!(matches!(
            flags.declare("help", FlagKind::Bool, ""),
            Err(StoreError::ReservedFlag(_))
        ));
        assert!(matches!(
            flags.declare("", FlagKind::Bool, ""),
            Err(StoreError::InvalidFlag(_))
        ));
        assert!(matches!(
            flags.declare("two words", FlagKind::Bool, ""),
            Err(StoreError::InvalidFlag(_))
        ));
    }

    #[test]
    fn test_bind_undeclared_flag() {
        let mut flags = FlagSet::default();
        let result = flags.bind("db", "db");
        assert!(matches!(result, Err(StoreError::UnknownFlag { .. })));
        assert_eq!(flags.binding("db"), None);
    }

    #[test]
    fn test_parse_records_given_flags_only() {
        let mut flags = sample();
        flags.parse("app", ["app", "--port", "9090"]).unwrap();

        let config = resolve(&flags);
        assert_eq!(config.get_int("port").unwrap(), 9090);
        assert!(config.get_bool("verbose").is_err());
        assert!(config.get_string("db.host").is_err());
    }

    #[test]
    fn test_parse_value_forms() {
        let mut flags = sample();
        flags
            .parse("app", ["app", "--port=-1", "--verbose", "--db-host=db.internal"])
            .unwrap();

        let config = resolve(&flags);
        assert_eq!(config.get_int("port").unwrap(), -1);
        assert!(config.get_bool("verbose").unwrap());
        assert_eq!(config.get_string("db.host").unwrap(), "db.internal");

        flags.parse("app", ["app", "--verbose=false"]).unwrap();
        let config = resolve(&flags);
        assert!(!config.get_bool("verbose").unwrap());
        assert!(config.get_int("port").is_err());
    }

    #[test]
    fn test_parse_last_occurrence_wins() {
        let mut flags = sample();
        flags.parse("app", ["app", "--port", "1", "--port", "2"]).unwrap();
        assert_eq!(resolve(&flags).get_int("port").unwrap(), 2);
    }

    #[test]
    fn test_parse_errors() {
        let mut flags = sample();
        assert!(matches!(
            flags.parse("app", ["app", "--port", "eighty"]),
            Err(StoreError::Flags(_))
        ));
        assert!(matches!(
            flags.parse("app", ["app", "--nope"]),
            Err(StoreError::Flags(_))
        ));

        match flags.parse("app", ["app", "--help"]) {
            Err(StoreError::Flags(e)) => {
                assert_eq!(e.kind(), clap::error::ErrorKind::DisplayHelp)
            }
            other => panic!("expected help, got {other:?}"),
        }
    }

    #[test]
    fn test_help_lists_declared_flags() {
        let help = sample().command("app").render_long_help().to_string();
        assert!(help.contains("--port"));
        assert!(help.contains("--db-host"));
        assert!(help.contains("Database host"));
    }
}
