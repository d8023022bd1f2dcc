#![forbid(unsafe_code)]

//! Error types for column view operations and configuration loading.

use std::io;

use thiserror::Error;

use crate::column::ColumnId;

/// Contract violations reported by [`ColumnView`](crate::ColumnView) and
/// [`ColumnSequence`](crate::ColumnSequence).
///
/// None of these are recoverable conditions of the algorithms themselves;
/// they indicate a caller that drove the view with inconsistent input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnViewError {
    #[error("column index {index} out of range for {len} columns")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown column {0}")]
    UnknownColumn(ColumnId),

    #[error("no drag session in progress")]
    NoDragSession,

    #[error("a drag session is already in progress")]
    DragInProgress,
}

/// Errors raised while loading a [`ViewConfig`](crate::ViewConfig) or
/// installing the log subscriber.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T, E = ColumnViewError> = std::result::Result<T, E>;
