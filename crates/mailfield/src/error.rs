//! Error types for header field and media type operations.
//!
//! Grammar mismatches are not errors: productions report "no match" by
//! returning the index they were given. This type covers the failures a
//! caller can actually act on.

/// Result type alias for header field operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Header field error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Media type text did not match `type "/" subtype *(";" parameter)`.
    #[error("Invalid media type: {0}")]
    InvalidMediaType(String),

    /// Parameter name outside the RFC 6838 restricted-name grammar.
    #[error("Invalid parameter name: {0}")]
    InvalidParameterName(String),

    /// Parameter value that cannot be represented.
    #[error("Invalid parameter value: {0}")]
    InvalidParameterValue(String),

    /// Content-Disposition type that is not a MIME token.
    #[error("Invalid disposition type: {0}")]
    InvalidDispositionType(String),

    /// Charset label with no known decoder.
    #[error("Unknown charset: {0}")]
    UnknownCharset(String),

    /// Text that looked like an RFC 2047 encoded word but could not be decoded.
    #[error("Invalid encoded word: {0}")]
    InvalidEncodedWord(String),

    /// Base64 decode error inside a `B` encoded word.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Rejected parser configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
