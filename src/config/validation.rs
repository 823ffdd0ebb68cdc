//! Settings validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeout > 0, depth > 0)
//! - Reject unknown log levels
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FinderSettings → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::FinderSettings;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("resolver.timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("limits.max_include_depth must be greater than 0")]
    ZeroIncludeDepth,

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Check every setting, collecting all problems.
pub fn validate_settings(settings: &FinderSettings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.resolver.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if settings.limits.max_include_depth == 0 {
        errors.push(ValidationError::ZeroIncludeDepth);
    }
    let level = settings.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            settings.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_settings(&FinderSettings::default()).is_ok());
    }

    #[test]
    fn test_reports_every_problem() {
        let mut settings = FinderSettings::default();
        settings.resolver.timeout_secs = 0;
        settings.limits.max_include_depth = 0;
        settings.observability.log_level = "loud".into();

        let errors = validate_settings(&settings).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroTimeout,
                ValidationError::ZeroIncludeDepth,
                ValidationError::UnknownLogLevel("loud".into()),
            ]
        );
    }
}
