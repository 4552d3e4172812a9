use crate::error::{ComposerError, Result};

/// A named node of the dependency graph, backed by one overlay compose file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    /// Unique key, used on the command line and in `depends_on`
    pub short_name: String,
    /// Used to derive the overlay file names on disk
    pub compose_name: String,
    /// Services that must be started before this one
    pub depends_on: Vec<String>,
}

impl Service {
    pub fn new(
        short_name: impl Into<String>,
        compose_name: impl Into<String>,
        depends_on: Vec<String>,
    ) -> Self {
        Self {
            short_name: short_name.into(),
            compose_name: compose_name.into(),
            depends_on,
        }
    }

    /// `compose.<compose_name>.yml`
    pub fn overlay_file_name(&self) -> String {
        format!("compose.{}.yml", self.compose_name)
    }

    /// `compose.debug.<compose_name>.yml`
    pub fn debug_overlay_file_name(&self) -> String {
        format!("compose.debug.{}.yml", self.compose_name)
    }
}

/// Checks that a short or compose name is usable both as a CLI argument and
/// as part of a file name.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason: String| ComposerError::InvalidName {
        name: name.to_string(),
        reason,
    };

    let Some(first_char) = name.chars().next() else {
        return Err(invalid("name is empty".into()));
    };

    if !first_char.is_ascii_alphanumeric() {
        return Err(invalid("must start with an ASCII letter or digit".into()));
    }

    if let Some(c) = name
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '_' | '.' | '-'))
    {
        return Err(invalid(format!("contains invalid character '{c}'")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_names_follow_compose_name() {
        let svc = Service::new("api", "backend-api", vec![]);
        assert_eq!(svc.overlay_file_name(), "compose.backend-api.yml");
        assert_eq!(svc.debug_overlay_file_name(), "compose.debug.backend-api.yml");
    }

    #[test]
    fn accepts_common_names() {
        for name in ["web", "db_1", "cache.v2", "auth-service", "9lives"] {
            assert!(validate_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_empty_name() {
        let err = validate_name("").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn rejects_leading_symbol() {
        assert!(matches!(
            validate_name("-web"),
            Err(ComposerError::InvalidName { .. })
        ));
    }

    #[test]
    fn rejects_path_separators() {
        let err = validate_name("../etc").unwrap_err();
        assert!(matches!(err, ComposerError::InvalidName { .. }));
        let err = validate_name("web/api").unwrap_err();
        assert!(err.to_string().contains("'/'"));
    }

    #[test]
    fn rejects_non_ascii_letters() {
        let err = validate_name("éclair").unwrap_err();
        assert!(err.to_string().contains("ASCII"));
        let err = validate_name("cafe\u{301}").unwrap_err();
        assert!(matches!(err, ComposerError::InvalidName { .. }));
        assert!(validate_name("café").is_err());
        assert!(validate_name("١٢٣").is_err());
    }
}
