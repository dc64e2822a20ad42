//! Configuration validation rules.
//!
//! The wizards cannot do anything useful without a repository path, a wiki
//! to talk to and a credential identity, so those must be non-empty.

use crate::config::schema::MabsConfig;
use crate::error::{MabsError, Result};

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Offending config key, dotted
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, field: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration and return all errors.
///
/// This function collects all validation errors rather than stopping
/// at the first one, allowing users to fix multiple issues at once.
pub fn validate_config(config: &MabsConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let required = [
        ("repo", config.repo.as_os_str().is_empty()),
        ("wiki.server", config.wiki.server.trim().is_empty()),
        ("wiki.sitename", config.wiki.sitename.trim().is_empty()),
        ("principal", config.principal.trim().is_empty()),
        ("app_id", config.app_id.trim().is_empty()),
        ("git.binary", config.git.binary.trim().is_empty()),
        ("export.remote", config.export.remote.trim().is_empty()),
    ];
    for (field, missing) in required {
        if missing {
            errors.push(ValidationError::new(
                "missing-value",
                field,
                format!("'{}' must be set", field),
            ));
        }
    }

    if !config.wiki.server.trim().is_empty() && reqwest::Url::parse(&config.api_url()).is_err() {
        errors.push(ValidationError::new(
            "invalid-url",
            "wiki.server",
            format!("'{}' does not form a valid API URL", config.wiki.server),
        ));
    }

    if config.principal.contains('@') {
        errors.push(ValidationError::new(
            "invalid-principal",
            "principal",
            "'principal' must not contain '@'",
        ));
    }

    if config.http.timeout_secs == 0 {
        errors.push(ValidationError::new(
            "invalid-timeout",
            "http.timeout_secs",
            "'http.timeout_secs' must be greater than zero",
        ));
    }

    if config.settings.max_turns == 0 {
        errors.push(ValidationError::new(
            "invalid-max-turns",
            "settings.max_turns",
            "'settings.max_turns' must be greater than zero",
        ));
    }

    errors
}

/// Validate and return the first error, or Ok if valid.
pub fn validate(config: &MabsConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(MabsError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> MabsConfig {
        let mut config = MabsConfig::default();
        config.repo = "/srv/mabs/repo".into();
        config.wiki.server = "https://wiki.example".to_string();
        config.wiki.script_path = "/w".to_string();
        config.wiki.sitename = "Example Wiki".to_string();
        config
    }

    fn rules(config: &MabsConfig) -> Vec<String> {
        validate_config(config).into_iter().map(|e| e.rule).collect()
    }

    #[test]
    fn complete_config_is_valid() {
        assert!(validate(&valid()).is_ok());
    }

    #[test]
    fn default_config_reports_every_missing_value() {
        let errors = validate_config(&MabsConfig::default());
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["repo", "wiki.server", "wiki.sitename"]);
    }

    #[test]
    fn unparseable_server_is_rejected() {
        let mut config = valid();
        config.wiki.server = "wiki.example".to_string();
        assert_eq!(rules(&config), ["invalid-url"]);
    }

    #[test]
    fn principal_with_at_sign_is_rejected() {
        let mut config = valid();
        config.principal = "Admin@mabs".to_string();
        assert_eq!(rules(&config), ["invalid-principal"]);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = valid();
        config.http.timeout_secs = 0;
        assert_eq!(rules(&config), ["invalid-timeout"]);
    }

    #[test]
    fn validate_joins_messages() {
        let mut config = valid();
        config.app_id = String::new();
        config.settings.max_turns = 0;

        match validate(&config) {
            Err(MabsError::ConfigValidationError { message }) => {
                assert!(message.contains("'app_id' must be set"));
                assert!(message.contains("settings.max_turns"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
