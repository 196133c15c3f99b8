//! Configuration loading for the CLI.

use crate::error::{CliError, Result};
use courier_capture::CourierConfig;
use std::path::{Path, PathBuf};

/// Get the default configuration file path.
pub fn default_path() -> Result<PathBuf> {
    let home = home_dir()?;
    Ok(home.join(".courier").join("config.toml"))
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))
}

/// Load configuration from `path` (or the default path).
///
/// A missing file yields the default configuration. A relative store
/// directory is resolved against the home directory so every invocation
/// sees the same slot regardless of the working directory.
pub fn load(path: Option<&str>) -> Result<CourierConfig> {
    let path = match path {
        Some(p) => PathBuf::from(p),
        None => default_path()?,
    };
    let mut config = CourierConfig::load(&path)?;
    if config.store.dir.is_relative() {
        config.store.dir = resolve_dir(&home_dir()?, &config.store.dir);
    }
    Ok(config)
}

fn resolve_dir(base: &Path, dir: &Path) -> PathBuf {
    if dir.is_relative() {
        base.join(dir)
    } else {
        dir.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_path() {
        if let Ok(path) = default_path() {
            assert!(path.ends_with(".courier/config.toml"));
        }
    }

    #[test]
    fn test_resolve_dir() {
        let base = Path::new("/home/op");
        assert_eq!(
            resolve_dir(base, Path::new(".courier")),
            PathBuf::from("/home/op/.courier")
        );
        assert_eq!(
            resolve_dir(base, Path::new("/var/lib/courier")),
            PathBuf::from("/var/lib/courier")
        );
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let store_dir = dir.path().join("records");
        fs::write(
            &path,
            format!("[store]\ndir = {:?}\n", store_dir.to_string_lossy()),
        )
        .unwrap();

        let config = load(path.to_str()).unwrap();
        assert_eq!(config.store.dir, store_dir);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[store\n").unwrap();

        assert!(load(path.to_str()).is_err());
    }
}
