//! Error types for composer

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for composer library operations
pub type Result<T> = std::result::Result<T, ComposerError>;

/// Failures surfaced by the service graph, the config store and the compose invoker
#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("No config file found at {} (run 'composer init' first)", .0.display())]
    ConfigMissing(PathBuf),

    #[error("Error while parsing config file: {0}")]
    ConfigMalformed(String),

    #[error("Service '{service}' is missing required field '{field}'")]
    MissingField {
        service: String,
        field: &'static str,
    },

    #[error("Invalid service name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Service '{0}' is already defined")]
    DuplicateService(String),

    #[error("Service '{service}' depends on undefined service '{dependency}'")]
    UndefinedDependency { service: String, dependency: String },

    #[error("Dependency cycle detected at service '{service}'")]
    CycleDetected { service: String },

    #[error("Services not found in config: {}", .0.join(", "))]
    ServiceNotFound(Vec<String>),

    #[error("Storage error at {}: {source}", .path.display())]
    Persistence { path: PathBuf, source: io::Error },

    #[error("Failed to run '{program}': {source}")]
    Invocation { program: String, source: io::Error },
}

impl ComposerError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_missing_service() {
        let err = ComposerError::ServiceNotFound(vec!["api".into(), "db".into()]);
        assert_eq!(err.to_string(), "Services not found in config: api, db");
    }

    #[test]
    fn persistence_keeps_io_source() {
        let err = ComposerError::persistence(
            "/tmp/composer.yml",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/composer.yml"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
