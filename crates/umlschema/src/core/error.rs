//! Core error types for model export
//!
//! This module defines the error types used throughout the export pipeline.
//! Only conditions that prevent an export from starting are errors; unresolved
//! types and per-operation failures are accumulated as diagnostics instead.

use thiserror::Error;

/// Core error types for model export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Model load error: {message}")]
    ModelLoad { message: String },

    #[error("Unknown element: {reference}")]
    UnknownElement { reference: String },

    #[error("Invalid query '{query}': {message}")]
    InvalidQuery { query: String, message: String },

    #[error("Config error: {message}")]
    Config { message: String },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Create a new model load error
    pub fn model_load(message: impl Into<String>) -> Self {
        Self::ModelLoad {
            message: message.into(),
        }
    }

    /// Create a new unknown element error
    pub fn unknown_element(reference: impl Into<String>) -> Self {
        Self::UnknownElement {
            reference: reference.into(),
        }
    }

    /// Create a new invalid query error
    pub fn invalid_query(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            query: query.into(),
            message: message.into(),
        }
    }

    /// Create a new config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
