//! MIME media types (`Content-Type` values).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};
use crate::grammar::is_mime_charset_char;
use crate::params::{ParamParser, is_restricted_name, resolve_extended, write_parameters};

pub use crate::params::QuotedStringRule;

/// Text subtypes whose charset defaults to US-ASCII.
const ASCII_DEFAULT_SUBTYPES: [&str; 10] = [
    "plain",
    "xml",
    "xml-external-parsed-entity",
    "sgml",
    "troff",
    "enriched",
    "richtext",
    "rfc822-headers",
    "dns",
    "directory",
];

/// Text subtypes whose charset defaults to UTF-8.
const UTF8_DEFAULT_SUBTYPES: [&str; 7] = [
    "csv",
    "vnd.graphviz",
    "calendar",
    "vcard",
    "markdown",
    "vnd.debian.copyright",
    "vtt",
];

/// A media type: top-level type, subtype and parameters.
///
/// Type, subtype and parameter names are lowercase. The `charset`
/// parameter value is lowercased too; other values keep their case.
/// Parameters are kept sorted by name, so two values that differ only in
/// parameter order compare equal and display the same.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaType {
    top_level_type: String,
    sub_type: String,
    parameters: BTreeMap<String, String>,
}

impl MediaType {
    fn new(top_level_type: &str, sub_type: &str, mut parameters: BTreeMap<String, String>) -> Self {
        if let Some(charset) = parameters.get_mut("charset") {
            charset.make_ascii_lowercase();
        }
        Self {
            top_level_type: top_level_type.to_ascii_lowercase(),
            sub_type: sub_type.to_ascii_lowercase(),
            parameters,
        }
    }

    fn with_charset(top_level_type: &str, sub_type: &str, charset: &str) -> Self {
        let parameters = BTreeMap::from([("charset".to_string(), charset.to_string())]);
        Self::new(top_level_type, sub_type, parameters)
    }

    /// `text/plain; charset=us-ascii`, the default for MIME bodies.
    #[must_use]
    pub fn text_plain_ascii() -> Self {
        Self::with_charset("text", "plain", "us-ascii")
    }

    /// `text/plain; charset=utf-8`.
    #[must_use]
    pub fn text_plain_utf8() -> Self {
        Self::with_charset("text", "plain", "utf-8")
    }

    /// `message/rfc822`.
    #[must_use]
    pub fn message_rfc822() -> Self {
        Self::new("message", "rfc822", BTreeMap::new())
    }

    /// `application/octet-stream`.
    #[must_use]
    pub fn application_octet_stream() -> Self {
        Self::new("application", "octet-stream", BTreeMap::new())
    }

    /// Parses a `Content-Type` value with RFC 5322 syntax.
    ///
    /// Returns `default` if the value is not a valid media type.
    ///
    /// ```
    /// use mailfield::MediaType;
    ///
    /// let mt = MediaType::parse("text/html; charset=\"UTF-8\"", None).unwrap();
    /// assert_eq!(mt.type_and_subtype(), "text/html");
    /// assert_eq!(mt.get_charset(), "utf-8");
    ///
    /// let fallback = MediaType::parse("not a type", Some(MediaType::text_plain_ascii()));
    /// assert_eq!(fallback, Some(MediaType::text_plain_ascii()));
    /// ```
    #[must_use]
    pub fn parse(value: &str, default: Option<Self>) -> Option<Self> {
        Self::parse_with_rule(value, QuotedStringRule::Rfc5322, default)
    }

    /// Parses a media type under the given quoted-string rule.
    ///
    /// Returns `default` if the value is not a valid media type.
    #[must_use]
    pub fn parse_with_rule(
        value: &str,
        rule: QuotedStringRule,
        default: Option<Self>,
    ) -> Option<Self> {
        match Self::try_parse(value, rule) {
            Ok(media_type) => Some(media_type),
            Err(reason) => {
                debug!(value, reason, "media type falls back to default");
                default
            }
        }
    }

    fn try_parse(value: &str, rule: QuotedStringRule) -> std::result::Result<Self, &'static str> {
        let mut parser = ParamParser::new(value, rule);
        let type_start = parser.skip_space(0);
        let type_end = parser.restricted_name(type_start);
        if type_end == type_start {
            return Err("missing type");
        }
        let slash = parser.skip_space(type_end);
        if !parser.is(slash, b'/') {
            return Err("missing '/'");
        }
        let sub_start = parser.skip_space(slash + 1);
        let sub_end = parser.restricted_name(sub_start);
        if sub_end == sub_start {
            return Err("missing subtype");
        }
        let params = parser
            .parameters(sub_end)
            .ok_or("malformed or repeated parameter")?;
        let params = resolve_extended(params, rule).ok_or("invalid extended parameter")?;
        Ok(Self::new(
            parser.slice(type_start, type_end),
            parser.slice(sub_start, sub_end),
            params,
        ))
    }

    /// Returns the top-level type, such as `text`.
    #[must_use]
    pub fn top_level_type(&self) -> &str {
        &self.top_level_type
    }

    /// Returns the subtype, such as `plain`.
    #[must_use]
    pub fn sub_type(&self) -> &str {
        &self.sub_type
    }

    /// Returns `type/subtype`.
    #[must_use]
    pub fn type_and_subtype(&self) -> String {
        format!("{}/{}", self.top_level_type, self.sub_type)
    }

    /// Checks if this is a `text` type.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.top_level_type == "text"
    }

    /// Checks if this is a `multipart` type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.top_level_type == "multipart"
    }

    /// Returns the parameters, keyed by lowercase name.
    #[must_use]
    pub const fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// Returns a parameter value, ignoring ASCII case in `name`.
    #[must_use]
    pub fn get_parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns the charset of the content.
    ///
    /// This is the declared `charset` parameter, lowercased. An ill-formed
    /// declaration yields `us-ascii`. Without one, text types registered
    /// with a default get it (`us-ascii` for `text/plain` and `text/xml`,
    /// `utf-8` for `text/csv` and `text/vnd.graphviz`, among others), and
    /// everything else gets the empty string.
    #[must_use]
    pub fn get_charset(&self) -> &str {
        if let Some(charset) = self.parameters.get("charset") {
            let well_formed = !charset.is_empty() && charset.bytes().all(is_mime_charset_char);
            return if well_formed { charset } else { "us-ascii" };
        }
        if self.is_text() {
            let sub_type = self.sub_type.as_str();
            if ASCII_DEFAULT_SUBTYPES.contains(&sub_type) {
                return "us-ascii";
            }
            if UTF8_DEFAULT_SUBTYPES.contains(&sub_type) {
                return "utf-8";
            }
        }
        ""
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.top_level_type, self.sub_type)?;
        write_parameters(f, &self.parameters)
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_parse(s, QuotedStringRule::Rfc5322)
            .map_err(|reason| Error::InvalidMediaType(format!("{s}: {reason}")))
    }
}

/// Builder for media types.
///
/// Names are checked against the RFC 6838 restricted-name grammar when
/// [`build`](Self::build) runs.
///
/// ```
/// use mailfield::MediaTypeBuilder;
///
/// let mt = MediaTypeBuilder::new("multipart", "mixed")
///     .set_parameter("boundary", "simple boundary")
///     .build()
///     .unwrap();
/// assert_eq!(mt.to_string(), "multipart/mixed; boundary=\"simple boundary\"");
/// ```
#[derive(Debug, Clone)]
pub struct MediaTypeBuilder {
    top_level_type: String,
    sub_type: String,
    parameters: BTreeMap<String, String>,
}

impl Default for MediaTypeBuilder {
    fn default() -> Self {
        Self::new("application", "octet-stream")
    }
}

impl From<MediaType> for MediaTypeBuilder {
    fn from(media_type: MediaType) -> Self {
        Self {
            top_level_type: media_type.top_level_type,
            sub_type: media_type.sub_type,
            parameters: media_type.parameters,
        }
    }
}

impl MediaTypeBuilder {
    /// Creates a builder for `top_level_type/sub_type`.
    #[must_use]
    pub fn new(top_level_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            top_level_type: top_level_type.into(),
            sub_type: sub_type.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Sets the top-level type.
    #[must_use]
    pub fn set_top_level_type(mut self, top_level_type: impl Into<String>) -> Self {
        self.top_level_type = top_level_type.into();
        self
    }

    /// Sets the subtype.
    #[must_use]
    pub fn set_sub_type(mut self, sub_type: impl Into<String>) -> Self {
        self.sub_type = sub_type.into();
        self
    }

    /// Sets a parameter, replacing any value under the same name.
    #[must_use]
    pub fn set_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Removes a parameter.
    #[must_use]
    pub fn remove_parameter(mut self, name: &str) -> Self {
        self.parameters.remove(&name.to_ascii_lowercase());
        self
    }

    /// Builds the media type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMediaType`] if the type or subtype is not a
    /// restricted name, [`Error::InvalidParameterName`] for a bad parameter
    /// name, or [`Error::InvalidParameterValue`] for a value holding a line
    /// break or NUL.
    pub fn build(self) -> Result<MediaType> {
        if !is_restricted_name(&self.top_level_type) || !is_restricted_name(&self.sub_type) {
            return Err(Error::InvalidMediaType(format!(
                "{}/{}",
                self.top_level_type, self.sub_type
            )));
        }
        for (name, value) in &self.parameters {
            if !is_restricted_name(name) {
                return Err(Error::InvalidParameterName(name.clone()));
            }
            if value.contains(['\r', '\n', '\0']) {
                return Err(Error::InvalidParameterValue(name.clone()));
            }
        }
        Ok(MediaType::new(
            &self.top_level_type,
            &self.sub_type,
            self.parameters,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let mt = MediaType::parse("Text/HTML; Charset=UTF-8; Format=Flowed", None).unwrap();
        assert_eq!(mt.top_level_type(), "text");
        assert_eq!(mt.sub_type(), "html");
        assert_eq!(mt.get_parameter("CHARSET"), Some("utf-8"));
        assert_eq!(mt.get_parameter("format"), Some("Flowed"));
        assert!(mt.is_text());
        assert!(!mt.is_multipart());
    }

    #[test]
    fn test_parse_with_comments() {
        let mt = MediaType::parse("text/plain (Plain text) ; charset=us-ascii (ascii)", None).unwrap();
        assert_eq!(mt.get_charset(), "us-ascii");
    }

    #[test]
    fn test_invalid_falls_back_to_default() {
        let default = Some(MediaType::text_plain_ascii());
        assert_eq!(MediaType::parse("text", default.clone()), default);
        assert_eq!(MediaType::parse("text/plain; charset", default.clone()), default);
        assert_eq!(MediaType::parse("text/plain; a=1; a=2", default.clone()), default);
        assert_eq!(MediaType::parse("text/plain; x*=bogus''a", default.clone()), default);
        assert!(MediaType::parse("text/plain extra", None).is_none());
    }

    #[test]
    fn test_get_charset_defaults() {
        let charset = |v: &str| MediaType::parse(v, None).unwrap().get_charset().to_string();
        assert_eq!(charset("text/plain"), "us-ascii");
        assert_eq!(charset("text/xml"), "us-ascii");
        assert_eq!(charset("text/csv"), "utf-8");
        assert_eq!(charset("text/vnd.graphviz"), "utf-8");
        assert_eq!(charset("text/html"), "");
        assert_eq!(charset("image/png"), "");
        assert_eq!(charset("text/plain; charset=ISO-8859-1"), "iso-8859-1");
        assert_eq!(charset("text/plain; charset=\"bad charset\""), "us-ascii");
    }

    #[test]
    fn test_rfc2231_extensions() {
        let mt = MediaType::parse(
            "text/plain; charset*0=ab;charset*1*=iso-8859-1'en'xyz",
            Some(MediaType::text_plain_ascii()),
        )
        .unwrap();
        assert_eq!(mt.get_parameter("charset"), Some("abiso-8859-1'en'xyz"));
    }

    #[test]
    fn test_from_str() {
        let mt: MediaType = "application/json".parse().unwrap();
        assert_eq!(mt, MediaTypeBuilder::new("application", "json").build().unwrap());
        let err = "application/".parse::<MediaType>().unwrap_err();
        assert!(matches!(err, Error::InvalidMediaType(_)));
    }

    #[test]
    fn test_display() {
        let mt = MediaType::parse("text/plain; charset=utf-8; name=\"a b.txt\"", None).unwrap();
        assert_eq!(mt.to_string(), "text/plain; charset=utf-8; name=\"a b.txt\"");
        let mt = MediaTypeBuilder::new("text", "plain")
            .set_parameter("title", "caf\u{e9}")
            .build()
            .unwrap();
        assert_eq!(mt.to_string(), "text/plain; title*=utf-8''caf%C3%A9");
        let reparsed = MediaType::parse(&mt.to_string(), None).unwrap();
        assert_eq!(reparsed, mt);
    }

    #[test]
    fn test_parameters_sorted_by_name() {
        let a = MediaType::parse("text/plain; format=flowed; charset=utf-8", None).unwrap();
        let b = MediaType::parse("text/plain; charset=UTF-8; format=flowed", None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "text/plain; charset=utf-8; format=flowed");
        let names: Vec<&str> = a.parameters().keys().map(String::as_str).collect();
        assert_eq!(names, ["charset", "format"]);
    }

    #[test]
    fn test_builder_validation() {
        assert!(matches!(
            MediaTypeBuilder::new("text", "pl ain").build(),
            Err(Error::InvalidMediaType(_))
        ));
        assert!(matches!(
            MediaTypeBuilder::new("text", "plain").set_parameter("na*me", "x").build(),
            Err(Error::InvalidParameterName(_))
        ));
        assert!(matches!(
            MediaTypeBuilder::new("text", "plain").set_parameter("name", "a\r\nb").build(),
            Err(Error::InvalidParameterValue(_))
        ));
        let mt = MediaTypeBuilder::from(MediaType::text_plain_utf8())
            .set_sub_type("html")
            .remove_parameter("Charset")
            .build()
            .unwrap();
        assert_eq!(mt.to_string(), "text/html");
    }

    #[test]
    fn test_http_rule() {
        let mt = MediaType::parse_with_rule(
            "text/plain;charset=utf-8",
            QuotedStringRule::Http,
            None,
        )
        .unwrap();
        assert_eq!(mt.get_charset(), "utf-8");
        assert!(
            MediaType::parse_with_rule("text/plain (c)", QuotedStringRule::Http, None).is_none()
        );
    }
}
