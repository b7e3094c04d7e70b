//! Error types for the restgen generator.
//!
//! These are tool-level failures that stop a run. Problems with individual
//! declarations are reported as [`Diagnostic`](crate::diagnostics::Diagnostic)s
//! instead and never abort generation.

use thiserror::Error;

/// Errors that can occur while running the generator.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Failed to read an input file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An input file is not valid Rust
    #[error("Failed to parse '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Emitted code failed to re-parse
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`GeneratorConfig`](crate::config::GeneratorConfig)
    #[error("Failed to load config '{path}': {source}")]
    ConfigParseError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Failed to serialize the generation report
    #[error("Failed to render report: {0}")]
    ReportError(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_the_file() {
        let err = GeneratorError::ParseError {
            path: "src/github.rs".into(),
            message: "expected `;`".into(),
        };
        assert_eq!(err.to_string(), "Failed to parse 'src/github.rs': expected `;`");
    }

    #[test]
    fn write_error_keeps_source() {
        let err = GeneratorError::WriteError {
            path: "out/a.rs".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
