// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Error types
//!
//! Builder calls that receive a bad argument fail immediately; structural
//! problems such as a job without an executor surface when the pipeline is
//! composed. Advisory conditions are logged, never returned.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for ciconf operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main error type for ciconf
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    // ─────────────────────────────────────────────────────────────────────────
    // Builder Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("You must set an executor for `{job}`")]
    #[diagnostic(
        code(ciconf::missing_executor),
        help("Attach one with `.executor(Docker::with_image(..))`, `Machine::new()` or `MacOs::new(..)`")
    )]
    MissingExecutor { job: String },

    #[error("Invalid argument: {reason}")]
    #[diagnostic(code(ciconf::invalid_argument))]
    InvalidArgument {
        reason: String,
        #[help]
        help: Option<String>,
    },

    #[error("Invalid configuration: {reason}")]
    #[diagnostic(code(ciconf::invalid_configuration))]
    InvalidConfiguration {
        reason: String,
        #[help]
        help: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Document Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Invalid document: {reason}")]
    #[diagnostic(code(ciconf::invalid_document))]
    InvalidDocument { reason: String },

    #[error("Workflow '{name}' not found in document")]
    #[diagnostic(
        code(ciconf::unknown_workflow),
        help("Run 'ciconf validate' to list the workflows in this document")
    )]
    UnknownWorkflow { name: String },

    #[error("Circular dependency detected in workflow '{workflow}'")]
    #[diagnostic(
        code(ciconf::circular_dependency),
        help("Review the `requires` lists of the jobs in this workflow to remove the cycle")
    )]
    CircularDependency { workflow: String, jobs: Vec<String> },

    // ─────────────────────────────────────────────────────────────────────────
    // File Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(ciconf::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("Failed to write file '{path}': {error}")]
    #[diagnostic(code(ciconf::file_write_error))]
    FileWriteError { path: PathBuf, error: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/Serialization Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(ciconf::io_error))]
    Io { message: String },

    #[error("YAML error: {message}")]
    #[diagnostic(code(ciconf::yaml_error))]
    Yaml { message: String },

    #[error("JSON error: {message}")]
    #[diagnostic(code(ciconf::json_error))]
    Json { message: String },
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl ConfigError {
    /// Create an invalid argument error without a hint
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
            help: None,
        }
    }

    /// Create an invalid argument error with a hint on how to fix it
    pub fn invalid_argument_with_help(reason: impl Into<String>, help: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
            help: Some(help.into()),
        }
    }

    /// Create an invalid document error
    pub fn invalid_document(reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            reason: reason.into(),
        }
    }

    /// Whether this error was caused by a bad builder argument
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
