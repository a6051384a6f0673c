//! Layered YAML configuration files.
//!
//! Files are merged in order: nested mappings merge key by key, any other
//! value in a later file replaces the earlier one.

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::{Path, PathBuf};

/// Error raised while loading configuration files.
#[derive(Debug)]
pub enum ConfigError {
    /// A file could not be read.
    Loading { path: PathBuf, source: std::io::Error },
    /// A file, or the merged document, is not valid for the target.
    Unmarshal {
        path: Option<PathBuf>,
        source: serde_yaml::Error,
    },
    /// A file's top level is not a mapping.
    NotAMapping { path: PathBuf },
    /// Loading one of several files failed.
    Merging(Box<ConfigError>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Loading { path, source } => {
                write!(f, "error loading YAML file {}: {}", path.display(), source)
            }
            ConfigError::Unmarshal {
                path: Some(path),
                source,
            } => write!(f, "error unmarshalling YAML file {}: {}", path.display(), source),
            ConfigError::Unmarshal { path: None, source } => {
                write!(f, "error unmarshalling YAML: {}", source)
            }
            ConfigError::NotAMapping { path } => {
                write!(f, "YAML file {} is not a mapping", path.display())
            }
            ConfigError::Merging(inner) => write!(f, "error merging YAML: {}", inner),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Loading { source, .. } => Some(source),
            ConfigError::Unmarshal { source, .. } => Some(source),
            ConfigError::NotAMapping { .. } => None,
            ConfigError::Merging(inner) => Some(inner.as_ref()),
        }
    }
}

/// Merge `src` into `dest`, recursing into mappings present in both.
pub fn merge(dest: &mut Mapping, src: Mapping) {
    for (key, value) in src {
        if let Value::Mapping(src_map) = value {
            if let Some(Value::Mapping(dest_map)) = dest.get_mut(&key) {
                merge(dest_map, src_map);
                continue;
            }
            dest.insert(key, Value::Mapping(src_map));
        } else {
            dest.insert(key, value);
        }
    }
}

/// Load one YAML file as a mapping. An empty file is an empty mapping.
pub fn load_file(path: impl AsRef<Path>) -> Result<Mapping, ConfigError> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Loading {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_yaml::from_str(&data).map_err(|source| ConfigError::Unmarshal {
        path: Some(path.to_path_buf()),
        source,
    })?;

    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Load and merge `paths` in order, skipping empty paths.
pub fn merge_files<P: AsRef<Path>>(paths: &[P]) -> Result<Mapping, ConfigError> {
    let mut merged = Mapping::new();

    for path in paths {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            continue;
        }

        let content = load_file(path).map_err(|err| ConfigError::Merging(Box::new(err)))?;
        merge(&mut merged, content);
    }

    Ok(merged)
}

/// Load, merge and deserialise `paths` into `T`.
pub fn load<T: DeserializeOwned, P: AsRef<Path>>(paths: &[P]) -> Result<T, ConfigError> {
    let merged = merge_files(paths)?;
    serde_yaml::from_value(Value::Mapping(merged))
        .map_err(|source| ConfigError::Unmarshal { path: None, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("plumb-yaml-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_merge_recurses_into_mappings() {
        let mut dest = mapping("server:\n  host: a\n  port: 1\nlog: info\n");
        let src = mapping("server:\n  port: 2\nlog:\n  level: debug\nextra: true\n");

        merge(&mut dest, src);

        assert_eq!(
            dest,
            mapping("server:\n  host: a\n  port: 2\nlog:\n  level: debug\nextra: true\n")
        );
    }

    #[test]
    fn test_merge_overwrites_sequences() {
        let mut dest = mapping("hosts: [a, b]\n");
        merge(&mut dest, mapping("hosts: [c]\n"));
        assert_eq!(dest, mapping("hosts: [c]\n"));
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Settings {
        name: String,
        port: u16,
    }

    #[test]
    fn test_load_layers_files() {
        let base = temp_file("base.yaml", "name: base\nport: 80\n");
        let local = temp_file("local.yaml", "port: 8080\n");
        let empty = temp_file("empty.yaml", "");

        let settings: Settings =
            load(&[base.as_path(), Path::new(""), empty.as_path(), local.as_path()]).unwrap();

        assert_eq!(
            settings,
            Settings {
                name: "base".to_string(),
                port: 8080
            }
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = merge_files(&["/definitely/not/here.yaml"]).unwrap_err();
        assert!(matches!(err, ConfigError::Merging(_)));
        assert!(err.to_string().starts_with("error merging YAML: error loading YAML file"));
    }

    #[test]
    fn test_load_rejects_scalar_document() {
        let path = temp_file("scalar.yaml", "just a string\n");
        assert!(matches!(
            load_file(&path),
            Err(ConfigError::NotAMapping { .. })
        ));
    }
}
