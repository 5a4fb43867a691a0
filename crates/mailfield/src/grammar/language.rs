//! Language tags (RFC 5646, in the simplified form MIME headers carry)
//! and the Content-Language / Accept-Language fields.

use super::HeaderParser;

impl HeaderParser<'_> {
    /// `Language-Tag = 1*8ALPHA *("-" 1*8alphanum)`
    ///
    /// Covers `langtag`, `privateuse` (`x-…`) and the irregular
    /// grandfathered forms, all of which share this outline.
    pub fn parse_language_tag(&mut self, index: usize) -> usize {
        let primary = self.alnum_run(index, false);
        if primary == index {
            return index;
        }
        let mut i = primary;
        while self.is(i, b'-') {
            let next = self.alnum_run(i + 1, true);
            if next == i + 1 {
                break;
            }
            i = next;
        }
        i
    }

    /// `Language-List = [CFWS] Language-Tag [CFWS] *("," [CFWS] Language-Tag [CFWS])`
    pub fn parse_language_list(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let mut i = self.cfws_language_tag(index);
        if i == index {
            return self.fail(index, checkpoint);
        }
        while self.is(i, b',') {
            let next = self.cfws_language_tag(i + 1);
            if next == i + 1 {
                return self.fail(index, checkpoint);
            }
            i = next;
        }
        i
    }

    /// `language-q = language-range [";" [CFWS] "q=" qvalue] [CFWS]`, one
    /// element of Accept-Language; `language-range` is a tag or `*`.
    pub fn parse_language_q(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let mut end = self.parse_language_tag(start);
        if end == start {
            end = self.char_at(start, b'*');
        }
        if end == start {
            return self.fail(index, checkpoint);
        }
        let i = self.parse_cfws(end);
        if !self.is(i, b';') {
            return i;
        }
        let q = self.parse_cfws(i + 1);
        let after_q = self.keyword(q, "q");
        if after_q == q || !self.is(after_q, b'=') {
            return self.fail(index, checkpoint);
        }
        let value_end = self.parse_qvalue(after_q + 1);
        if value_end == after_q + 1 {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(value_end)
    }

    /// `qvalue = ("0" ["." 0*3DIGIT]) / ("1" ["." 0*3("0")])`
    pub fn parse_qvalue(&mut self, index: usize) -> usize {
        match self.byte(index) {
            Some(b'0') => {
                if self.is(index + 1, b'.') {
                    self.digits(index + 2, 0, 3)
                } else {
                    index + 1
                }
            }
            Some(b'1') => {
                if self.is(index + 1, b'.') {
                    let mut i = index + 2;
                    while i - (index + 2) < 3 && self.is(i, b'0') {
                        i += 1;
                    }
                    i
                } else {
                    index + 1
                }
            }
            _ => index,
        }
    }

    /// `Accept-Language: language-q *("," language-q)`
    pub fn parse_header_accept_language(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let mut i = self.parse_language_q(index);
        if i == index {
            return self.fail(index, checkpoint);
        }
        while self.is(i, b',') {
            let next = self.parse_language_q(i + 1);
            if next == i + 1 {
                return self.fail(index, checkpoint);
            }
            i = next;
        }
        i
    }

    /// `Content-Language: Language-List`
    pub fn parse_header_content_language(&mut self, index: usize) -> usize {
        self.parse_language_list(index)
    }

    fn cfws_language_tag(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let end = self.parse_language_tag(start);
        if end == start {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(end)
    }

    /// `1*8ALPHA`, or `1*8alphanum` when `digits` is set.
    fn alnum_run(&self, index: usize, digits: bool) -> usize {
        let mut i = index;
        while i - index < 8
            && self
                .byte(i)
                .is_some_and(|b| b.is_ascii_alphabetic() || (digits && b.is_ascii_digit()))
        {
            i += 1;
        }
        if self.byte(i).is_some_and(|b| b.is_ascii_alphanumeric()) {
            return index;
        }
        i
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
    fn test_language_tag() {
        assert!(full("en", HeaderParser::parse_language_tag));
        assert!(full("en-US", HeaderParser::parse_language_tag));
        assert!(full("zh-Hant-TW", HeaderParser::parse_language_tag));
        assert!(full("x-klingon", HeaderParser::parse_language_tag));
        assert!(full("de-419", HeaderParser::parse_language_tag));
        assert!(!full("toolongprimary", HeaderParser::parse_language_tag));
        assert!(!full("1en", HeaderParser::parse_language_tag));
    }

    #[test]
    fn test_content_language() {
        let cl = HeaderParser::parse_header_content_language;
        assert!(full("en, fr (French)", cl));
        assert!(full(" i-navajo ", cl));
        assert!(!full("en,", cl));
    }

    #[test]
    fn test_accept_language() {
        let al = HeaderParser::parse_header_accept_language;
        assert!(full("da, en-gb;q=0.8, en;q=0.7", al));
        assert!(full("*;q=1.000", al));
        assert!(!full("en;q=2", al));
        assert!(!full("en;q=1.5", al));
    }

    #[test]
    fn test_qvalue() {
        let mut parser = HeaderParser::new("0.123");
        assert_eq!(parser.parse_qvalue(0), 5);
        let mut parser = HeaderParser::new("1.0");
        assert_eq!(parser.parse_qvalue(0), 3);
        let mut parser = HeaderParser::new("2");
        assert_eq!(parser.parse_qvalue(0), 0);
    }
}
