//! Load errors.
//!
//! Every failure of the document pipeline ends up as a [`LoadError`]. The
//! inspector shows its `Display` text inline instead of the diagram.

use std::fmt;
use std::io;

use super::storage::EXAMPLES_PREFIX;

/// Appended to fetch failures for a non-empty URL.
pub const CORS_HINT: &str = "it may be a CORS issue if the server does not send \
     \"'Access-Control-Allow-Origin': '*'\" header.";

/// Failure while staging or loading a composition document.
#[derive(Debug)]
pub enum LoadError {
    /// The text is not a well-formed composition document.
    Validation(String),
    /// The storage key does not exist and is not in a fetchable namespace.
    NotFound(String),
    /// The remote document could not be fetched.
    Fetch(String),
    /// A stored token could not be decompressed.
    Decode(String),
    /// The local store failed.
    Storage(io::Error),
}

impl LoadError {
    /// Build a fetch error for `url`, adding the CORS hint when a URL was given.
    pub fn fetch(url: &str, message: impl fmt::Display) -> Self {
        if url.is_empty() {
            Self::Fetch(message.to_string())
        } else {
            Self::Fetch(format!("{message}: {CORS_HINT}"))
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "Invalid composition JSON format: {msg}"),
            Self::NotFound(key) if key.starts_with(EXAMPLES_PREFIX) => {
                write!(f, "No such example: {key}")
            }
            Self::NotFound(key) => write!(f, "Composition not found: {key}"),
            Self::Fetch(msg) => f.write_str(msg),
            Self::Decode(msg) => write!(f, "Stored composition is corrupt: {msg}"),
            Self::Storage(err) => write!(f, "Storage error: {err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        Self::Storage(err)
    }
}
