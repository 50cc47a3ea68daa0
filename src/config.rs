//! Blog configuration (`blog.toml` plus environment overrides)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::content_loader::LoadPolicy;
use crate::front_matter::ParserKind;

pub const DEFAULT_CONFIG_FILE: &str = "blog.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the `*.md` post files
    pub posts_dir: PathBuf,
    /// Served under `/static`
    pub static_dir: PathBuf,
    pub site_title: String,
    pub host: String,
    pub port: u16,
    pub front_matter: ParserKind,
    pub load_policy: LoadPolicy,
    pub max_concurrent_loads: usize,
    /// Enables live reload
    pub development: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            posts_dir: PathBuf::from("./posts"),
            static_dir: PathBuf::from("./static"),
            site_title: "My Awesome Blog".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            front_matter: ParserKind::default(),
            load_policy: LoadPolicy::default(),
            max_concurrent_loads: 16,
            development: false,
        }
    }
}

impl Config {
    /// Load from `path`, or from `./blog.toml` when it exists, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Config file named by `BLOG_CONFIG`, then `PORT`, `POSTS_DIR`,
    /// `STATIC_DIR` and `RUST_ENV` overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os("BLOG_CONFIG").map(PathBuf::from);
        let mut config = Self::load(path.as_deref())?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(port) = var("PORT").and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Some(dir) = var("POSTS_DIR") {
            self.posts_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("STATIC_DIR") {
            self.static_dir = PathBuf::from(dir);
        }
        if let Some(env) = var("RUST_ENV") {
            self.development = env == "development";
        }
    }

    pub fn concurrency(&self) -> usize {
        self.max_concurrent_loads.max(1)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.posts_dir, PathBuf::from("./posts"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.front_matter, ParserKind::Fenced);
        assert_eq!(config.load_policy, LoadPolicy::FailFast);
        assert!(!config.development);
    }

    #[test]
    fn test_parse_config() {
        let raw = r#"
posts_dir = "content/posts"
site_title = "Notes"
port = 3000
front_matter = "gray-matter"
load_policy = "skip-invalid"
max_concurrent_loads = 0
"#;
        let config = Config::from_toml(raw).unwrap();
        assert_eq!(config.posts_dir, PathBuf::from("content/posts"));
        assert_eq!(config.site_title, "Notes");
        assert_eq!(config.port, 3000);
        assert_eq!(config.front_matter, ParserKind::GrayMatter);
        assert_eq!(config.load_policy, LoadPolicy::SkipInvalid);
        assert_eq!(config.concurrency(), 1);
        assert_eq!(config.static_dir, PathBuf::from("./static"));
    }

    #[test]
    fn test_rejects_unknown_enum_values() {
        assert!(Config::from_toml("load_policy = \"sometimes\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blog.toml");
        fs::write(&path, "site_title = \"From disk\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.site_title, "From disk");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "9090"),
            ("POSTS_DIR", "/srv/posts"),
            ("RUST_ENV", "development"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.port, 9090);
        assert_eq!(config.posts_dir, PathBuf::from("/srv/posts"));
        assert_eq!(config.static_dir, PathBuf::from("./static"));
        assert!(config.development);
    }

    #[test]
    fn test_bad_port_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "PORT").then(|| "eighty".to_string()));
        assert_eq!(config.port, 8080);
    }
}
