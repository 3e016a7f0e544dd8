/* src/error.rs */

use thiserror::Error;

/// Result type alias for operations that may fail with `RealIpError`.
pub type Result<T> = std::result::Result<T, RealIpError>;

/// Errors raised by the fallible helpers around selection.
///
/// The selectors themselves never fail; these surface only from
/// [`split_host_port`](crate::peer::split_host_port) and from parsing a
/// [`Strategy`](crate::extractor::Strategy).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RealIpError {
    /// The address has no `:port` suffix.
    #[error("missing port in address: {0}")]
    MissingPort(String),

    /// An unbracketed host contains a colon.
    #[error("too many colons in address: {0}")]
    TooManyColons(String),

    /// A `[` was opened without a matching `]`.
    #[error("missing ']' in address: {0}")]
    MissingBracket(String),

    /// A bracket appears outside the host part.
    #[error("unexpected bracket in address: {0}")]
    UnexpectedBracket(String),

    /// Strategy name is neither `secure` nor `naive`.
    #[error("unknown selection strategy: {0}")]
    UnknownStrategy(String),
}
