//! Config file discovery and loading.

use std::path::{Path, PathBuf};

use config::{File, Source};

use super::layer::Layer;
use super::StoreError;

/// Extensions probed in each search directory, in order.
pub const EXTENSIONS: [&str; 4] = ["json", "toml", "yaml", "yml"];

/// Finds `<name>.<ext>` in the first directory that has one.
///
/// Directories are tried in order, and within a directory the extensions in
/// [`EXTENSIONS`] order.
pub fn find_config_file(name: &str, dirs: &[PathBuf]) -> Result<PathBuf, StoreError> {
    dirs.iter()
        .flat_map(|dir| {
            EXTENSIONS
                .into_iter()
                .map(move |ext| dir.join(format!("{name}.{ext}")))
        })
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| StoreError::ConfigFileNotFound {
            name: name.to_string(),
            searched: dirs.to_vec(),
        })
}

/// Reads and parses a config file; the format follows the extension.
pub fn load_config_file(path: &Path) -> Result<Layer, StoreError> {
    let values = File::from(path).required(true).collect()?;
    Ok(Layer::from_nested(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Config;
    use std::fs;
    use tempfile::tempdir;

    fn resolve(layer: Layer) -> Config {
        Config::builder().add_source(layer).build().unwrap()
    }

    #[test]
    fn test_find_prefers_earlier_directory() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        fs::write(first.path().join("config.yaml"), "port: 1").unwrap();
        fs::write(second.path().join("config.json"), "{\"port\": 2}").unwrap();

        let dirs = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let found = find_config_file("config", &dirs).unwrap();
        assert_eq!(found, first.path().join("config.yaml"));
    }

    #[test]
    fn test_find_extension_order_within_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "port = 1").unwrap();
        fs::write(dir.path().join("config.json"), "{\"port\": 2}").unwrap();

        let found = find_config_file("config", &[dir.path().to_path_buf()]).unwrap();
        assert_eq!(found, dir.path().join("config.json"));
    }

    #[test]
    fn test_find_missing() {
        let dir = tempdir().unwrap();
        let result = find_config_file("config", &[dir.path().to_path_buf()]);
        assert!(matches!(result, Err(StoreError::ConfigFileNotFound { .. })));
    }

    #[test]
    fn test_load_each_format() {
        let dir = tempdir().unwrap();
        let files = [
            ("config.toml", "[db]\nport = 5432\n"),
            ("config.yaml", "db:\n  port: 5432\n"),
            ("config.yml", "db:\n  port: 5432\n"),
            ("config.json", "{\"db\": {\"port\": 5432}}"),
        ];

        for (name, contents) in files {
            let path = dir.path().join(name);
            fs::write(&path, contents).unwrap();
            let config = resolve(load_config_file(&path).unwrap());
            assert_eq!(config.get_int("db.port").unwrap(), 5432, "format of {name}");
        }
    }

    #[test]
    fn test_load_keeps_keys_next_to_nulls() {
        let dir = tempdir().unwrap();
        let yaml = dir.path().join("config.yaml");
        let json = dir.path().join("config.json");
        fs::write(&yaml, "db:\n  username: app\n  password:\n").unwrap();
        fs::write(&json, r#"{"db": {"username": "app", "password": null}}"#).unwrap();

        for path in [yaml, json] {
            let config = resolve(load_config_file(&path).unwrap());
            assert_eq!(config.get_string("db.username").unwrap(), "app");
            assert!(config.get_string("db.password").is_err());
        }
    }

    #[test]
    fn test_load_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "port = = 1").unwrap();

        assert!(matches!(load_config_file(&path), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.txt");
        fs::write(&path, "port = 1").unwrap();

        assert!(matches!(load_config_file(&path), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config_file(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(StoreError::Config(_))));
    }
}
