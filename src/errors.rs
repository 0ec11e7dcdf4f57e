/*!
 * Error types for the yaomt library.
 *
 * This module contains custom error types for different parts of the library,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading installed package descriptors
#[derive(Error, Debug)]
pub enum PackageError {
    /// Error reading package files from disk
    #[error("Failed to read package data: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a package's metadata.json
    #[error("Invalid package metadata in {path}: {source}")]
    InvalidMetadata {
        /// Directory of the offending package
        path: PathBuf,
        /// Underlying deserialization error
        source: serde_json::Error,
    },

    /// A translation package without both language codes
    #[error("Package at {0} is missing its language pair")]
    MissingLanguagePair(PathBuf),
}

/// Errors that can occur when selecting or applying a translation
#[derive(Error, Debug)]
pub enum TranslateError {
    /// The requested language pair has no edge in the graph, even after closure
    #[error("No translation installed from '{from}' to '{to}'")]
    UnsupportedLanguage {
        /// Requested source language code
        from: String,
        /// Requested target language code
        to: String,
    },

    /// An installed package's underlying engine failed to initialize
    #[error("Failed to load model for package '{package}': {reason}")]
    ModelLoad {
        /// Package directory or pair label
        package: String,
        /// Underlying failure description
        reason: String,
    },

    /// A batch inference call failed at runtime
    #[error("Inference failed: {0}")]
    Inference(String),

    /// A remote translation service failed after exhausting retries
    #[error("Remote translation service failed: {0}")]
    RemoteService(String),

    /// Error from the package layer
    #[error("Package error: {0}")]
    Package(#[from] PackageError),
}

impl TranslateError {
    /// Builds the unsupported-pair error from a pair of language codes
    pub fn unsupported(from: &str, to: &str) -> Self {
        Self::UnsupportedLanguage {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
