//! Centralized error types for emlview.

use std::path::PathBuf;
use thiserror::Error;

/// All errors that abort a conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The input path does not carry the accepted extension.
    #[error("Input must be a .{expected} file: {path}")]
    InvalidExtension { path: PathBuf, expected: String },

    /// The input file could not be opened or read.
    #[error("Error reading '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The message does not have the expected block/field layout.
    #[error("Malformed message: {reason}")]
    MalformedMessage { reason: String },

    /// The payload block is not valid standard base64.
    #[error("Unrecoverable error decoding the email payload: {0}")]
    PayloadDecode(#[from] base64::DecodeError),

    /// The output file could not be created.
    #[error("Error creating '{path}': {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The output file could not be written.
    #[error("Error writing '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias for `Result<T, ConvertError>`.
pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    /// Create a `MalformedMessage` variant from any displayable reason.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedMessage {
            reason: reason.into(),
        }
    }
}

/// Failures of best-effort side effects (browser launch, delayed removal).
///
/// These are logged and reported, never turned into a failed run.
#[derive(Error, Debug)]
pub enum SideEffectError {
    /// The browser (or platform opener) could not be started.
    #[error("Could not launch '{browser}' for '{path}': {source}")]
    Launch {
        browser: String,
        path: PathBuf,
        source: std::io::Error,
    },

    /// The generated file could not be removed after the delay.
    #[error("Could not remove '{path}': {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A config file that exists but cannot be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_display() {
        let err = ConvertError::malformed("expected 3 blocks, found 1");
        assert_eq!(
            err.to_string(),
            "Malformed message: expected 3 blocks, found 1"
        );
    }

    #[test]
    fn test_invalid_extension_display() {
        let err = ConvertError::InvalidExtension {
            path: PathBuf::from("mail.txt"),
            expected: "eml".to_string(),
        };
        assert_eq!(err.to_string(), "Input must be a .eml file: mail.txt");
    }
}
