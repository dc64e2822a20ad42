//! Error types for MABS operations.
//!
//! This module defines [`MabsError`], the error type that crosses the
//! wizard engine boundary, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Step handlers convert collaborator failures (git, HTTP, credential
//!   store) into step outcomes; those never surface as `MabsError`
//! - `MabsError::Configuration` is reserved for programming errors in task
//!   definitions and aborts the request immediately
//! - Use `anyhow::Error` (via `MabsError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for MABS operations.
#[derive(Debug, Error)]
pub enum MabsError {
    /// The route names a task that has no wizard.
    #[error("No wizard for this page: {name}")]
    NoSuchWizard { name: String },

    /// A task definition is broken (missing handler, empty step list,
    /// recursive success handling).
    #[error("Wizard misconfigured: {message}")]
    Configuration { message: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MabsError {
    /// Shorthand for a [`MabsError::Configuration`] error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Result type alias for MABS operations.
pub type Result<T> = std::result::Result<T, MabsError>;
