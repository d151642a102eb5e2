//! Error type for spark-tokenizer.

use thiserror::Error;

/// Errors surfaced while rendering components or writing to the terminal.
#[derive(Debug, Error)]
pub enum Error {
    /// A selected value has no field under the configured label key.
    #[error("option has no label under key `{key}`")]
    MissingLabel { key: String },

    /// The label field exists but is not a string.
    #[error("option label under key `{key}` is not a string")]
    InvalidLabel { key: String },

    /// A size tag other than `large`/`lg`, `small`/`sm` or `default`.
    #[error("unknown size tag `{tag}`")]
    UnknownSize { tag: String },

    #[error("failed to serialize option: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
