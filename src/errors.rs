/*!
 * Error types for the exhibit-linker application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by a document tree provider
#[derive(Error, Debug, PartialEq)]
pub enum DocumentError {
    /// A node handle that does not resolve inside the tree
    #[error("Node not found at path {0}")]
    NodeNotFound(String),

    /// A text operation was requested on a container, or vice versa
    #[error("Node at path {path} is not a {expected} node")]
    WrongNodeKind {
        /// Path of the offending node
        path: String,
        /// The kind the operation needed
        expected: &'static str,
    },

    /// A link range that is empty, out of bounds or splits a character
    #[error("Invalid link range {start}..{end} for text of length {len} at path {path}")]
    InvalidRange {
        path: String,
        start: usize,
        end: usize,
        len: usize,
    },

    /// The document source could not be parsed
    #[error("Failed to parse document: {0}")]
    Parse(String),
}

/// Errors that can occur while building or validating a reference table
#[derive(Error, Debug, PartialEq)]
pub enum ReferenceError {
    /// The same key was defined twice
    #[error("Duplicate exhibit key: {0}")]
    DuplicateKey(String),

    /// A key that the citation grammar can never produce
    #[error("Invalid exhibit key '{key}': {reason}")]
    InvalidKey {
        key: String,
        reason: &'static str,
    },

    /// An entry without a label
    #[error("Empty label for exhibit key: {0}")]
    EmptyLabel(String),

    /// An entry whose URL does not parse
    #[error("Invalid URL for exhibit key '{key}': {url} ({message})")]
    InvalidUrl {
        key: String,
        url: String,
        message: String,
    },

    /// The exhibit map source could not be parsed
    #[error("Failed to parse exhibit map: {0}")]
    Parse(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the document provider
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from the reference table
    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
