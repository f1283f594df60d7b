//! Error type shared by every collision generator.

use std::io;

use thiserror::Error;

/// Errors raised while generating or loading colliding keys.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied value or an algorithm configuration is unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A pre-built key resource could not be found, read or decoded.
    #[error("Resource unavailable: {name}")]
    ResourceUnavailable {
        /// Resource name as requested by the caller.
        name: String,
        #[source]
        source: io::Error,
    },

    /// A search task failed; the whole generation is discarded.
    #[error("Computation failure: {0}")]
    Computation(String),

    /// A key cannot be represented in the requested output format.
    #[error("Encoding failure: {0}")]
    Encoding(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`].
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Shorthand for [`Error::Computation`].
    #[must_use]
    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }

    /// Wraps an I/O failure for the named resource.
    #[must_use]
    pub fn resource(name: impl Into<String>, source: io::Error) -> Self {
        Self::ResourceUnavailable {
            name: name.into(),
            source,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_message() {
        let err = Error::invalid_argument("count must be positive");
        assert_eq!(err.to_string(), "Invalid argument: count must be positive");
    }

    #[test]
    fn test_resource_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::resource(
            "djbx31a.txt",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.to_string(), "Resource unavailable: djbx31a.txt");
        assert!(err.source().is_some());
    }
}
