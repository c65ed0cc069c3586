//! Error handling for configuration loading and saving.
//!
//! Stack operations themselves are infallible: disposing a handler that is
//! already gone and popping an empty stack are silent no-ops, not errors.

use compact_str::CompactString;
use thiserror::Error;

pub type EscResult<T> = Result<T, EscError>;

/// Errors produced while reading or writing a [`StackConfig`] file.
///
/// [`StackConfig`]: crate::config::StackConfig
#[derive(Error, Debug, Clone)]
pub enum EscError {
    #[error("Failed to access config file {path}: {message}")]
    ConfigIo {
        path: CompactString,
        message: CompactString,
    },

    #[error("Config parse error: {0}")]
    ConfigParse(CompactString),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(CompactString),
}

impl EscError {
    /// Create a config I/O error with path conversion
    #[inline]
    pub fn config_io(path: &std::path::Path, io_error: &std::io::Error) -> Self {
        Self::ConfigIo {
            path: CompactString::from(path.to_string_lossy()),
            message: CompactString::from(io_error.to_string()),
        }
    }
}
