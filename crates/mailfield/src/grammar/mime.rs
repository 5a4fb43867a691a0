//! MIME productions: RFC 2045 tokens and parameters, RFC 2231 extended
//! parameters, RFC 6838 type names and the MIME header fields built on
//! them.

use super::{
    HeaderParser, is_attribute_char, is_mime_charset_char, is_mime_token_char,
    is_restricted_name_char,
};

impl HeaderParser<'_> {
    /// RFC 2045 `token = 1*<any (US-ASCII) CHAR except SPACE, CTLs, or tspecials>`
    pub fn parse_mime_token(&mut self, index: usize) -> usize {
        self.skip_while(index, is_mime_token_char)
    }

    /// RFC 6838 `restricted-name = restricted-name-first *126restricted-name-chars`
    pub fn parse_restricted_name(&mut self, index: usize) -> usize {
        if !self.byte(index).is_some_and(|b| b.is_ascii_alphanumeric()) {
            return index;
        }
        let mut i = index + 1;
        while i - index < 127 && self.byte(i).is_some_and(is_restricted_name_char) {
            i += 1;
        }
        i
    }

    /// `value = token / quoted-string`
    pub fn parse_mime_value(&mut self, index: usize) -> usize {
        let end = self.parse_mime_token(index);
        if end != index {
            return end;
        }
        self.parse_bare_quoted_string(index)
    }

    /// `parameter = regular-parameter / extended-parameter`, with CFWS
    /// allowed around the name, the `=` and the value.
    pub fn parse_parameter(&mut self, index: usize) -> usize {
        let end = self.parse_regular_parameter(index);
        if end != index {
            return end;
        }
        self.parse_extended_parameter(index)
    }

    /// `regular-parameter = regular-parameter-name "=" value`
    pub fn parse_regular_parameter(&mut self, index: usize) -> usize {
        self.parse_name_value(
            index,
            Self::parse_regular_parameter_name,
            Self::parse_mime_value,
            false,
        )
    }

    /// `regular-parameter-name = attribute [section]`
    pub fn parse_regular_parameter_name(&mut self, index: usize) -> usize {
        let end = self.parse_attribute(index);
        if end == index {
            return index;
        }
        self.parse_section(end)
    }

    /// `extended-parameter = (extended-initial-name "=" extended-initial-value)
    ///                     / (extended-other-names "=" extended-other-values)`
    pub fn parse_extended_parameter(&mut self, index: usize) -> usize {
        let end = self.parse_name_value(
            index,
            Self::parse_extended_initial_name,
            Self::parse_extended_initial_value,
            false,
        );
        if end != index {
            return end;
        }
        self.parse_name_value(
            index,
            Self::parse_extended_other_names,
            Self::parse_extended_section_value,
            true,
        )
    }

    /// `[CFWS] name [CFWS] "=" [CFWS] value [CFWS]`.
    fn parse_name_value(
        &mut self,
        index: usize,
        name: fn(&mut Self, usize) -> usize,
        value: fn(&mut Self, usize) -> usize,
        allow_empty: bool,
    ) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let name_end = name(self, start);
        if name_end == start {
            return self.fail(index, checkpoint);
        }
        let equals = self.parse_cfws(name_end);
        if !self.is(equals, b'=') {
            return self.fail(index, checkpoint);
        }
        let value_start = self.parse_cfws(equals + 1);
        let value_end = value(self, value_start);
        if value_end == value_start && !allow_empty {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(value_end)
    }

    /// `extended-initial-name = attribute [initial-section] "*"`
    pub fn parse_extended_initial_name(&mut self, index: usize) -> usize {
        let name_end = self.parse_attribute(index);
        if name_end == index {
            return index;
        }
        let mut i = name_end;
        if self.is(i, b'*') && self.is(i + 1, b'0') {
            i += 2;
        }
        if self.is(i, b'*') {
            return i + 1;
        }
        index
    }

    /// `extended-other-names = attribute other-sections "*"`
    pub fn parse_extended_other_names(&mut self, index: usize) -> usize {
        let name_end = self.parse_attribute(index);
        if name_end == index {
            return index;
        }
        let section_end = self.parse_other_sections(name_end);
        if section_end == name_end || !self.is(section_end, b'*') {
            return index;
        }
        section_end + 1
    }

    /// `extended-initial-value = [charset] "'" [language] "'" extended-other-values`
    pub fn parse_extended_initial_value(&mut self, index: usize) -> usize {
        let charset_end = self.parse_charset(index);
        if !self.is(charset_end, b'\'') {
            return index;
        }
        let language_end = self.parse_language_tag(charset_end + 1);
        if !self.is(language_end, b'\'') {
            return index;
        }
        self.parse_extended_other_values(language_end + 1)
    }

    /// `extended-other-values = *(ext-octet / attribute-char)`
    pub fn parse_extended_other_values(&mut self, index: usize) -> usize {
        let mut i = index;
        loop {
            let next = self.parse_ext_octet(i);
            if next != i {
                i = next;
            } else if self.byte(i).is_some_and(is_attribute_char) {
                i += 1;
            } else {
                return i;
            }
        }
    }

    /// `extended-other-values` that also admits `'`.
    ///
    /// A later `*N*` section may carry what looks like a charset and
    /// language prefix; it is kept as part of the value.
    pub fn parse_extended_section_value(&mut self, index: usize) -> usize {
        let mut i = index;
        loop {
            let next = self.parse_extended_other_values(i);
            if self.is(next, b'\'') {
                i = next + 1;
            } else {
                return next;
            }
        }
    }

    /// `ext-octet = "%" 2(DIGIT / "A" / "B" / "C" / "D" / "E" / "F")`
    ///
    /// Lowercase hex digits are accepted too.
    pub fn parse_ext_octet(&mut self, index: usize) -> usize {
        if self.is(index, b'%')
            && self.byte(index + 1).is_some_and(|b| b.is_ascii_hexdigit())
            && self.byte(index + 2).is_some_and(|b| b.is_ascii_hexdigit())
        {
            index + 3
        } else {
            index
        }
    }

    /// `charset = <registered character set name>` (RFC 2978 `mime-charset`)
    pub fn parse_charset(&mut self, index: usize) -> usize {
        self.skip_while(index, is_mime_charset_char)
    }

    /// `attribute = 1*attribute-char`
    pub fn parse_attribute(&mut self, index: usize) -> usize {
        self.skip_while(index, is_attribute_char)
    }

    /// `section = initial-section / other-sections`; matching nothing is
    /// allowed since the section is optional wherever it appears.
    pub fn parse_section(&mut self, index: usize) -> usize {
        if self.is(index, b'*') && self.is(index + 1, b'0') {
            return index + 2;
        }
        self.parse_other_sections(index)
    }

    /// `other-sections = "*" ("1" / "2" / "3" / "4" / "5" / "6" / "7" / "8" / "9") *DIGIT`
    pub fn parse_other_sections(&mut self, index: usize) -> usize {
        if self.is(index, b'*') && self.byte(index + 1).is_some_and(|b| matches!(b, b'1'..=b'9'))
        {
            self.skip_while(index + 2, |b| b.is_ascii_digit())
        } else {
            index
        }
    }

    /// `*(";" parameter)`, tolerating a trailing `;`.
    fn parse_parameter_list(&mut self, index: usize) -> usize {
        let mut i = index;
        loop {
            let semicolon = self.parse_cfws(i);
            if !self.is(semicolon, b';') {
                return semicolon;
            }
            let next = self.parse_parameter(semicolon + 1);
            if next == semicolon + 1 {
                return self.parse_cfws(semicolon + 1);
            }
            i = next;
        }
    }

    /// `content := "Content-Type" ":" type "/" subtype *(";" parameter)`
    pub fn parse_header_content_type(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let type_start = self.parse_cfws(index);
        let type_end = self.parse_restricted_name(type_start);
        if type_end == type_start {
            return self.fail(index, checkpoint);
        }
        let slash = self.parse_cfws(type_end);
        if !self.is(slash, b'/') {
            return self.fail(index, checkpoint);
        }
        let subtype_start = self.parse_cfws(slash + 1);
        let subtype_end = self.parse_restricted_name(subtype_start);
        if subtype_end == subtype_start {
            return self.fail(index, checkpoint);
        }
        self.parse_parameter_list(subtype_end)
    }

    /// RFC 2183 `disposition := "Content-Disposition" ":" disposition-type *(";" disposition-parm)`
    pub fn parse_header_content_disposition(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let end = self.parse_mime_token(start);
        if end == start {
            return self.fail(index, checkpoint);
        }
        self.parse_parameter_list(end)
    }

    /// `encoding := "Content-Transfer-Encoding" ":" mechanism`
    pub fn parse_header_content_transfer_encoding(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let end = self.parse_mime_token(start);
        if end == start {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(end)
    }

    /// `version := "MIME-Version" ":" 1*DIGIT "." 1*DIGIT`, CFWS allowed
    /// around each part.
    pub fn parse_header_mime_version(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let major = self.digits_with_cfws(index);
        if major == index || !self.is(major, b'.') {
            return self.fail(index, checkpoint);
        }
        let minor = self.digits_with_cfws(major + 1);
        if minor == major + 1 {
            return self.fail(index, checkpoint);
        }
        minor
    }

    /// RFC 3803 `Content-Duration: [CFWS] 1*10DIGIT [CFWS]`
    pub fn parse_header_content_duration(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let end = self.digits(start, 1, 10);
        if end == start || self.byte(end).is_some_and(|b| b.is_ascii_digit()) {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(end)
    }

    /// `Content-ID: msg-id`
    pub fn parse_header_content_id(&mut self, index: usize) -> usize {
        self.parse_msg_id(index)
    }

    /// `[CFWS] 1*DIGIT [CFWS]`
    pub(super) fn digits_with_cfws(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let end = self.skip_while(start, |b| b.is_ascii_digit());
        if end == start {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(end)
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::HeaderParser;

    fn full<'a>(value: &'a str, production: fn(&mut HeaderParser<'a>, usize) -> usize) -> bool {
        let mut parser = HeaderParser::new(value);
        production(&mut parser, 0) == value.len()
    }

    #[test]
    fn test_content_type() {
        let ct = HeaderParser::parse_header_content_type;
        assert!(full("text/plain", ct));
        assert!(full("text/plain; charset=us-ascii (Plain text)", ct));
        assert!(full("multipart/mixed; boundary=\"simple boundary\"", ct));
        assert!(full("text/plain;", ct));
        assert!(!full("text", ct));
        assert!(!full("text/", ct));
        assert!(!full("text/plain; charset", ct));
    }

    #[test]
    fn test_rfc2231_parameters() {
        let ct = HeaderParser::parse_header_content_type;
        assert!(full("application/x-stuff; title*=us-ascii'en-us'This%20is%20%2A%2A%2Afun%2A%2A%2A", ct));
        assert!(full(
            "message/external-body; access-type=URL; URL*0=\"ftp://\"; URL*1=\"cs.utk.edu/pub/moore/bulk-mailer/bulk-mailer.tar\"",
            ct
        ));
        assert!(full(
            "application/x-stuff; title*0*=us-ascii'en'This%20is%20even%20more%20; title*1*=%2A%2A%2Afun%2A%2A%2A%20; title*2=\"isn't it!\"",
            ct
        ));
        assert!(full("text/plain; name*=''", ct));
        assert!(full("text/plain; charset*0=ab;charset*1*=iso-8859-1'en'xyz", ct));
        assert!(!full("text/plain; name*='en", ct));
    }

    #[test]
    fn test_sections() {
        let mut parser = HeaderParser::new("*0*12*01");
        assert_eq!(parser.parse_section(0), 2);
        assert_eq!(parser.parse_other_sections(2), 2);
        assert_eq!(parser.parse_other_sections(3), 6);
        assert_eq!(parser.parse_other_sections(6), 6);
    }

    #[test]
    fn test_ext_octet() {
        let mut parser = HeaderParser::new("%2a%G0");
        assert_eq!(parser.parse_ext_octet(0), 3);
        assert_eq!(parser.parse_ext_octet(3), 3);
    }

    #[test]
    fn test_mime_version() {
        assert!(full("1.0", HeaderParser::parse_header_mime_version));
        assert!(full("1.(produced by MetaSend Vx.x)0", HeaderParser::parse_header_mime_version));
        assert!(!full("1.", HeaderParser::parse_header_mime_version));
    }

    #[test]
    fn test_content_disposition() {
        let cd = HeaderParser::parse_header_content_disposition;
        assert!(full("attachment; filename=genome.jpeg; modification-date=\"Wed, 12 Feb 1997 16:29:51 -0500\"", cd));
        assert!(full("inline", cd));
        assert!(!full("; filename=x", cd));
    }

    #[test]
    fn test_content_duration() {
        assert!(full(" 1234 ", HeaderParser::parse_header_content_duration));
        assert!(!full("12345678901", HeaderParser::parse_header_content_duration));
    }
}
