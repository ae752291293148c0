//! # Server Registry
//!
//! Named server connections kept in `.spectrum_servers.json` files:
//!
//! ```json
//! {
//!   "servers": {
//!     "local": { "url": "http://localhost:8080/", "user": "admin", "password": "admin" }
//!   }
//! }
//! ```
//!
//! [`ServerRegistry::load`] reads the file in the user's home directory, then the one in the
//! working directory. Entries from a later file replace same-named entries from an earlier one.
use crate::server::Server;
use crate::transport::Credentials;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::path::{Path, PathBuf};

pub const REGISTRY_FILE_NAME: &str = ".spectrum_servers.json";

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid server registry '{origin}': {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("No server named '{0}' in the registry")]
    NotFound(String),
}

/// Connection settings of one named server.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    pub url: String,
    pub user: String,
    pub password: String,
}

impl ServerEntry {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.user, &self.password)
    }

    /// A [`Server`] using the default transport.
    pub fn connect(&self) -> Server {
        Server::connect(&self.url, self.credentials())
    }
}

impl Debug for ServerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerEntry")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRegistry {
    #[serde(default)]
    servers: BTreeMap<String, ServerEntry>,
}

impl ServerRegistry {
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        Self::parse(json, "<inline>")
    }

    /// Loads the registry files from the home and working directories.
    ///
    /// Missing files are skipped, so an empty registry is returned when neither exists.
    pub fn load() -> Result<Self, RegistryError> {
        let mut paths = Vec::new();

        if let Some(dirs) = BaseDirs::new() {
            paths.push(dirs.home_dir().join(REGISTRY_FILE_NAME));
        }
        paths.push(PathBuf::from(REGISTRY_FILE_NAME));

        Self::load_from(&paths)
    }

    /// Merges the registry files at `paths`, in order. Missing files are skipped.
    pub fn load_from<P: AsRef<Path>>(paths: &[P]) -> Result<Self, RegistryError> {
        let mut registry = Self::default();

        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                continue;
            }

            let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
                path: path.to_path_buf(),
                source,
            })?;

            let loaded = Self::parse(&content, &path.display().to_string())?;
            registry.servers.extend(loaded.servers);
        }

        Ok(registry)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.servers.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&ServerEntry> {
        self.servers.get(name)
    }

    /// Adds or replaces a named server.
    pub fn insert(&mut self, name: impl Into<String>, entry: ServerEntry) {
        self.servers.insert(name.into(), entry);
    }

    /// Connects to the server registered as `name`.
    pub fn server(&self, name: &str) -> Result<Server, RegistryError> {
        self.get(name)
            .map(ServerEntry::connect)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    fn parse(json: &str, origin: &str) -> Result<Self, RegistryError> {
        serde_json::from_str(json).map_err(|source| RegistryError::Json {
            origin: origin.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const LOCAL: &str = r#"{
        "servers": {
            "local": { "url": "http://localhost:8080/", "user": "admin", "password": "admin" },
            "staging": { "url": "http://staging:8080/", "user": "ops", "password": "secret" }
        }
    }"#;

    #[test]
    fn test_from_json() {
        let registry = ServerRegistry::from_json(LOCAL).unwrap();

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["local", "staging"]);
        assert_eq!(registry.get("staging").unwrap().user, "ops");
        assert!(registry.get("prod").is_none());
    }

    #[test]
    fn test_later_files_override_earlier_ones() {
        let home = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();
        let first = home.path().join(REGISTRY_FILE_NAME);
        let second = cwd.path().join(REGISTRY_FILE_NAME);

        fs::write(&first, LOCAL).unwrap();
        fs::write(
            &second,
            r#"{"servers":{"local":{"url":"http://other:9090/","user":"me","password":"pw"}}}"#,
        )
        .unwrap();

        let missing = cwd.path().join("missing.json");
        let registry = ServerRegistry::load_from(&[first, missing, second]).unwrap();

        assert_eq!(registry.get("local").unwrap().url, "http://other:9090/");
        assert_eq!(registry.get("staging").unwrap().url, "http://staging:8080/");
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REGISTRY_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let err = ServerRegistry::load_from(&[&path]).unwrap_err();
        assert!(matches!(err, RegistryError::Json { .. }));
    }

    #[test]
    fn test_server_lookup() {
        let registry = ServerRegistry::from_json(LOCAL).unwrap();

        let server = registry.server("local").unwrap();
        assert_eq!(server.url(), "http://localhost:8080/");
        assert!(matches!(
            registry.server("prod"),
            Err(RegistryError::NotFound(name)) if name == "prod"
        ));
    }

    #[test]
    fn test_debug_redacts_password() {
        let registry = ServerRegistry::from_json(LOCAL).unwrap();
        let debug = format!("{:?}", registry.get("staging").unwrap());

        assert!(!debug.contains("secret"));
    }
}
