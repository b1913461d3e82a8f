//! Configuration for shutterdesk.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (SHUTTERDESK_HOME, SHUTTERDESK_BACKEND_URL,
//!    SHUTTERDESK_API_KEY)
//! 2. Config file (.shutterdesk/config.yaml)
//! 3. Defaults (~/.shutterdesk, local backend)
//!
//! Config file discovery:
//! - Searches current directory and parents for .shutterdesk/config.yaml
//! - Paths in the config file are relative to the config file's parent
//!   directory
//!
//! The resolved configuration is a plain value constructed once at
//! startup and passed explicitly to whatever needs it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub backend: Option<BackendFileConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Hub data directory (relative to config file)
    pub home: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendFileConfig {
    /// REST endpoint of the hosted database; local backend when absent
    pub url: Option<String>,
    pub api_key: Option<String>,
}

/// Which persistence backend a session talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// JSON-file backend under the home directory
    Local,

    /// Hosted PostgREST-style backend
    Rest { url: String, api_key: String },
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to the hub home (data + lock files)
    pub home: PathBuf,

    /// Persistence backend to use
    pub backend: BackendConfig,

    /// Path to the config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".shutterdesk").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
pub fn load() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".shutterdesk");

    let config_file = find_config_file();

    let parsed = match config_file {
        Some(ref path) => Some(load_config_file(path)?),
        None => None,
    };

    // Resolve home path
    let home = if let Ok(env_home) = std::env::var("SHUTTERDESK_HOME") {
        PathBuf::from(env_home)
    } else if let Some(home_path) = parsed.as_ref().and_then(|c| c.paths.home.as_ref()) {
        // home is relative to the .shutterdesk/ directory
        let base = config_file
            .as_ref()
            .and_then(|p| p.parent())
            .unwrap_or(Path::new("."));
        resolve_path(base, home_path)
    } else {
        default_home
    };

    // Resolve backend: env URL wins, then config file, then local
    let file_backend = parsed.as_ref().and_then(|c| c.backend.as_ref());
    let url = std::env::var("SHUTTERDESK_BACKEND_URL")
        .ok()
        .or_else(|| file_backend.and_then(|b| b.url.clone()));

    let backend = match url {
        Some(url) => {
            let api_key = std::env::var("SHUTTERDESK_API_KEY")
                .ok()
                .or_else(|| file_backend.and_then(|b| b.api_key.clone()))
                .context("Backend URL is configured but no API key was found; set SHUTTERDESK_API_KEY or backend.api_key")?;
            BackendConfig::Rest { url, api_key }
        }
        None => BackendConfig::Local,
    };

    Ok(ResolvedConfig {
        home,
        backend,
        config_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_dir = temp.path().join(".shutterdesk");
        std::fs::create_dir_all(&config_dir).unwrap();

        let config_path = config_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
paths:
  home: ./
backend:
  url: https://hub.example.co/rest/v1
  api_key: service-key
"#
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.paths.home, Some("./".to_string()));

        let backend = config.backend.unwrap();
        assert_eq!(
            backend.url,
            Some("https://hub.example.co/rest/v1".to_string())
        );
        assert_eq!(backend.api_key, Some("service-key".to_string()));
    }

    #[test]
    fn test_config_file_without_backend_section() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        std::fs::write(&config_path, "version: \"1.0\"\n").unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert!(config.backend.is_none());
        assert!(config.paths.home.is_none());
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
        assert_eq!(
            resolve_path(&base, "../sibling"),
            PathBuf::from("/home/user/project/../sibling")
        );
    }
}
