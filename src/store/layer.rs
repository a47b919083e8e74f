//! Fixed value maps fed to the `config` builder as sources.

use config::{ConfigError, Map, Source, Value, ValueKind};

/// A snapshot of values that takes part in resolution as one source.
///
/// Keys may be dotted (`db.port`) or nested tables; `config` merges both
/// shapes into its cache the same way.
#[derive(Clone, Debug, Default)]
pub struct Layer {
    map: Map<String, Value>,
}

impl Layer {
    /// Wraps a nested table, as loaded from a file. Keys are lower-cased and
    /// null values dropped, so an empty key never shadows a lower layer.
    pub fn from_nested(map: Map<String, Value>) -> Self {
        Self {
            map: normalize(map),
        }
    }

    /// Wraps `(dotted key, value)` pairs.
    pub fn from_dotted(pairs: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            map: pairs.into_iter().collect(),
        }
    }
}

fn normalize(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter_map(|(key, value)| {
            let key = key.to_lowercase();
            match value.kind {
                ValueKind::Nil => None,
                ValueKind::Table(table) => Some((key, Value::from(normalize(table)))),
                _ => Some((key, value)),
            }
        })
        .collect()
}

impl Source for Layer {
    fn collect(&self) -> Result<Map<String, Value>, ConfigError> {
        Ok(self.map.clone())
    }

    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }
}
