//! Crate-level error type.

use crate::pagination::CursorError;

/// Errors surfaced by the pagination engine and its inbound/outbound seams.
///
/// Only the codec, request parsing and configuration can fail before the
/// store is reached; building a plan and assembling a page never fail.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A supplied cursor string is malformed.
    #[error("invalid cursor: {0}")]
    InvalidCursor(#[from] CursorError),

    /// The `limit` request parameter is not an integer.
    #[error("invalid limit '{0}': expected an integer")]
    InvalidLimit(String),

    /// A column or table name is not a safe SQL identifier.
    #[error("invalid SQL {context} name '{name}'")]
    InvalidIdentifier {
        /// What the name was used for.
        context: &'static str,
        /// The rejected name.
        name: String,
    },

    /// Paging configuration is unusable.
    #[error("invalid paging config: {0}")]
    Config(String),

    /// The backing store failed to execute the page query.
    #[error("store query failed: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Returns `true` for errors caused by client input (4xx class).
    ///
    /// Retrying these is pointless: the input itself is invalid.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidCursor(_) | Self::InvalidLimit(_))
    }

    /// The cursor error, if this is one.
    #[must_use]
    pub const fn as_cursor_error(&self) -> Option<&CursorError> {
        match self {
            Self::InvalidCursor(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(Error::InvalidCursor(CursorError::Encoding).is_client_error());
        assert!(Error::InvalidLimit("ten".into()).is_client_error());
        assert!(!Error::Config("max-limit must be positive".into()).is_client_error());

        let io = std::io::Error::other("connection reset");
        assert!(!Error::Store(Box::new(io)).is_client_error());
    }

    #[test]
    fn test_cursor_error_from() {
        let err: Error = CursorError::Malformed.into();
        assert_eq!(err.as_cursor_error(), Some(&CursorError::Malformed));
        assert!(err.to_string().starts_with("invalid cursor: "));
    }

    #[test]
    fn test_store_error_keeps_source() {
        let io = std::io::Error::other("disk on fire");
        let err = Error::Store(Box::new(io));
        assert_eq!(err.to_string(), "store query failed: disk on fire");
        assert!(std::error::Error::source(&err).is_some());
    }
}
