//! Application-wide error types.
//!
//! This module defines the main error type hierarchy for the application,
//! allowing for type-safe error handling throughout the codebase.

pub use crate::api::ApiError;
pub use crate::config::ConfigError;
pub use crate::contact::ContactError;
pub use crate::wizard::{SubmissionError, WizardError};

/// Main application error type.
///
/// This is the top-level error type that encompasses all error types
/// in the application. It uses `thiserror` for automatic error derivation
/// and conversion.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Enrollment API errors
    #[error("Enrollment API error: {0}")]
    Api(#[from] ApiError),

    /// Wizard step errors
    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    /// Final submission errors
    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    /// Contact link errors
    #[error("Contact error: {0}")]
    Contact(#[from] ContactError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Logger initialization errors
    #[error("Logger error: {0}")]
    Logger(String),

    /// Runtime creation errors
    #[error("Failed to create runtime: {0}")]
    RuntimeCreation(String),
}

/// Convenience type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::StepKind;

    #[test]
    fn test_app_error_from_config_error() {
        let config_error = ConfigError::FilePathNotSet;
        let app_error: AppError = config_error.into();
        assert!(matches!(app_error, AppError::Config(_)));
        assert!(app_error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_app_error_from_api_error() {
        let api_error = ApiError::Api {
            status: 500,
            message: "Test error".to_string(),
        };
        let app_error: AppError = api_error.into();
        assert!(matches!(app_error, AppError::Api(_)));
        assert!(app_error.to_string().contains("Enrollment API error"));
        assert!(app_error.to_string().contains("Test error"));
    }

    #[test]
    fn test_app_error_from_wizard_errors() {
        let app_error: AppError = WizardError::MissingStep(StepKind::Student).into();
        assert!(matches!(app_error, AppError::Wizard(_)));

        let app_error: AppError = SubmissionError::ConsentRequired.into();
        assert!(matches!(app_error, AppError::Submission(_)));
        assert!(app_error.to_string().contains("Submission error"));
    }

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert!(matches!(app_error, AppError::Io(_)));
        assert!(app_error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_app_error_terminal() {
        let error = AppError::Terminal("Terminal error".to_string());
        assert!(error.to_string().contains("Terminal error"));
    }
}
