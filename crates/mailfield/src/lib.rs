//! # mailfield
//!
//! Grammar-driven parsing of Internet message header field values.
//!
//! ## Features
//!
//! - **Header grammar**: RFC 5322 and MIME productions as a backtracking
//!   recursive-descent parser with a rollback-capable token log
//! - **Encoded words**: RFC 2047 decoding that knows where encoded words
//!   may appear in each registered header field
//! - **Media types**: `Content-Type` parsing with RFC 2231 parameter
//!   continuations and charset defaults
//! - **Content-Disposition**: the same parameter handling for RFC 2183
//!
//! ## Quick Start
//!
//! ### Decoding header values
//!
//! ```
//! use mailfield::decode_header_value;
//!
//! // Unstructured: every encoded word is decoded.
//! let subject = decode_header_value("Subject", "=?iso-8859-1?q?caf=E9?= au lait");
//! assert_eq!(subject, "caf\u{e9} au lait");
//!
//! // Structured: only display names and comments are decoded.
//! let from = decode_header_value(
//!     "From",
//!     "=?US-ASCII?Q?Keith_Moore?= <moore@cs.utk.edu>",
//! );
//! assert_eq!(from, "Keith Moore <moore@cs.utk.edu>");
//! ```
//!
//! ### Media types
//!
//! ```
//! use mailfield::MediaType;
//!
//! let mt = MediaType::parse("text/plain; format=flowed", None).unwrap();
//! assert_eq!(mt.get_charset(), "us-ascii");
//! assert_eq!(mt.get_parameter("format"), Some("flowed"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod params;

pub mod charset;
pub mod config;
pub mod content_disposition;
pub mod encoded_word;
pub mod grammar;
pub mod header_fields;
pub mod media_type;

pub use config::{ParserConfig, ParserConfigBuilder};
pub use content_disposition::ContentDisposition;
pub use encoded_word::EncodedWordContext;
pub use error::{Error, Result};
pub use header_fields::{
    HeaderFieldPolicy, decode_header_value, get_header_policy, replace_encoded_words,
};
pub use media_type::{MediaType, MediaTypeBuilder, QuotedStringRule};
