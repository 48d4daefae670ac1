//! Error types for the expansion engine and its scope-file loader.

use std::path::PathBuf;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `pop` was called with only the global frame left.
    #[error("scope stack imbalance: cannot pop the global scope")]
    ImbalancedScope,

    /// `expand_key` was asked for a name the innermost frame does not define.
    #[error("key '{key}' is not defined in the innermost scope")]
    KeyNotInScope { key: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scope file error: {0}")]
    Config(#[from] ConfigError),
}
