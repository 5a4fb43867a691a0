//! `Content-Disposition` values (RFC 2183).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};
use crate::params::{ParamParser, QuotedStringRule, resolve_extended, write_parameters};

/// A disposition type with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentDisposition {
    disposition_type: String,
    parameters: BTreeMap<String, String>,
}

impl ContentDisposition {
    /// `inline`.
    #[must_use]
    pub fn inline() -> Self {
        Self {
            disposition_type: "inline".to_string(),
            parameters: BTreeMap::new(),
        }
    }

    /// `attachment`, with an optional filename.
    #[must_use]
    pub fn attachment(filename: Option<&str>) -> Self {
        let mut parameters = BTreeMap::new();
        if let Some(name) = filename {
            parameters.insert("filename".to_string(), name.to_string());
        }
        Self {
            disposition_type: "attachment".to_string(),
            parameters,
        }
    }

    /// Parses a `Content-Disposition` value, returning `default` if it is
    /// malformed.
    ///
    /// ```
    /// use mailfield::ContentDisposition;
    ///
    /// let cd = ContentDisposition::parse(
    ///     "attachment; filename*=utf-8''na%C3%AFve.txt",
    ///     None,
    /// )
    /// .unwrap();
    /// assert!(cd.is_attachment());
    /// assert_eq!(cd.filename(), Some("na\u{ef}ve.txt"));
    /// ```
    #[must_use]
    pub fn parse(value: &str, default: Option<Self>) -> Option<Self> {
        match Self::try_parse(value) {
            Ok(disposition) => Some(disposition),
            Err(reason) => {
                debug!(value, reason, "content disposition falls back to default");
                default
            }
        }
    }

    fn try_parse(value: &str) -> std::result::Result<Self, &'static str> {
        let mut parser = ParamParser::new(value, QuotedStringRule::Rfc5322);
        let start = parser.skip_space(0);
        let end = parser.token(start);
        if end == start {
            return Err("missing disposition type");
        }
        let params = parser
            .parameters(end)
            .ok_or("malformed or repeated parameter")?;
        let parameters = resolve_extended(params, QuotedStringRule::Rfc5322)
            .ok_or("invalid extended parameter")?;
        Ok(Self {
            disposition_type: parser.slice(start, end).to_ascii_lowercase(),
            parameters,
        })
    }

    /// Returns the lowercase disposition type.
    #[must_use]
    pub fn disposition_type(&self) -> &str {
        &self.disposition_type
    }

    /// Checks if the type is `inline`.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.disposition_type == "inline"
    }

    /// Checks if the type is `attachment`.
    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.disposition_type == "attachment"
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

    /// Returns the `filename` parameter.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.get_parameter("filename")
    }
}

impl fmt::Display for ContentDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.disposition_type)?;
        write_parameters(f, &self.parameters)
    }
}

impl FromStr for ContentDisposition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_parse(s).map_err(|reason| Error::InvalidDispositionType(format!("{s}: {reason}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attachment() {
        let cd = ContentDisposition::parse(
            "Attachment; FileName=\"genome.jpeg\";\r\n modification-date=\"Wed, 12 Feb 1997 16:29:51 -0500\"",
            None,
        )
        .unwrap();
        assert!(cd.is_attachment());
        assert!(!cd.is_inline());
        assert_eq!(cd.filename(), Some("genome.jpeg"));
        assert_eq!(
            cd.get_parameter("Modification-Date"),
            Some("Wed, 12 Feb 1997 16:29:51 -0500")
        );
    }

    #[test]
    fn test_continued_filename() {
        let cd = ContentDisposition::parse(
            "attachment; filename*0*=iso-8859-1''r%E9sum; filename*1=\"e.pdf\"",
            None,
        )
        .unwrap();
        assert_eq!(cd.filename(), Some("r\u{e9}sume.pdf"));
    }

    #[test]
    fn test_malformed_uses_default() {
        let default = Some(ContentDisposition::inline());
        assert_eq!(ContentDisposition::parse("", default.clone()), default);
        assert_eq!(
            ContentDisposition::parse("attachment; filename=", default.clone()),
            default
        );
        let err = "; filename=a".parse::<ContentDisposition>().unwrap_err();
        assert!(matches!(err, Error::InvalidDispositionType(_)));
    }

    #[test]
    fn test_display() {
        assert_eq!(ContentDisposition::inline().to_string(), "inline");
        assert_eq!(
            ContentDisposition::attachment(Some("my file.txt")).to_string(),
            "attachment; filename=\"my file.txt\""
        );
        let cd: ContentDisposition = "attachment; filename=report.pdf".parse().unwrap();
        assert_eq!(cd, ContentDisposition::attachment(Some("report.pdf")));
    }
}
