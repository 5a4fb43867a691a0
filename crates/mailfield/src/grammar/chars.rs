//! Character classes from RFC 5322, RFC 2045, RFC 2231 and RFC 6838.
//!
//! Classes that admit internationalized text (RFC 6532) accept every byte
//! `>= 0x80`, so runs of them never stop in the middle of a UTF-8 sequence.

/// `WSP`: space or horizontal tab.
#[must_use]
pub const fn is_wsp(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// `obs-NO-WS-CTL`.
#[must_use]
pub const fn is_obs_no_ws_ctl(b: u8) -> bool {
    matches!(b, 0x01..=0x08 | 0x0b | 0x0c | 0x0e..=0x1f | 0x7f)
}

/// `VCHAR`.
#[must_use]
pub const fn is_vchar(b: u8) -> bool {
    matches!(b, 0x21..=0x7e)
}

/// `atext` plus UTF-8 bytes.
#[must_use]
pub const fn is_atext(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'/'
                | b'='
                | b'?'
                | b'^'
                | b'_'
                | b'`'
                | b'{'
                | b'|'
                | b'}'
                | b'~'
        )
        || b >= 0x80
}

/// `ctext` including `obs-ctext` and UTF-8 bytes.
#[must_use]
pub const fn is_ctext(b: u8) -> bool {
    matches!(b, 0x21..=0x27 | 0x2a..=0x5b | 0x5d..=0x7e) || b >= 0x80 || is_obs_no_ws_ctl(b)
}

/// `qtext` including `obs-qtext` and UTF-8 bytes.
#[must_use]
pub const fn is_qtext(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x5b | 0x5d..=0x7e) || b >= 0x80 || is_obs_no_ws_ctl(b)
}

/// `dtext` including `obs-dtext` and UTF-8 bytes.
#[must_use]
pub const fn is_dtext(b: u8) -> bool {
    matches!(b, 0x21..=0x5a | 0x5e..=0x7e) || b >= 0x80 || is_obs_no_ws_ctl(b)
}

/// RFC 2045 `tspecials`.
#[must_use]
pub const fn is_tspecial(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')'
            | b'<'
            | b'>'
            | b'@'
            | b','
            | b';'
            | b':'
            | b'\\'
            | b'"'
            | b'/'
            | b'['
            | b']'
            | b'?'
            | b'='
    )
}

/// RFC 2045 `token` character.
#[must_use]
pub const fn is_mime_token_char(b: u8) -> bool {
    is_vchar(b) && !is_tspecial(b)
}

/// RFC 2231 `attribute-char`.
#[must_use]
pub const fn is_attribute_char(b: u8) -> bool {
    is_mime_token_char(b) && !matches!(b, b'*' | b'\'' | b'%')
}

/// RFC 6838 `restricted-name-chars`.
#[must_use]
pub const fn is_restricted_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#' | b'$' | b'&' | b'-' | b'^' | b'_' | b'.' | b'+'
        )
}

/// RFC 2978 `mime-charset-chars`.
#[must_use]
pub const fn is_mime_charset_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'+'
                | b'-'
                | b'^'
                | b'_'
                | b'`'
                | b'{'
                | b'}'
                | b'~'
        )
}

/// Letter, digit or hyphen (`ldh-str` body).
#[must_use]
pub const fn is_ldh(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-'
}

/// Length of the UTF-8 sequence introduced by `lead`.
#[must_use]
pub const fn utf8_len(lead: u8) -> usize {
    match lead {
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xff => 4,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atext() {
        assert!(is_atext(b'a'));
        assert!(is_atext(b'='));
        assert!(is_atext(b'?'));
        assert!(is_atext(0xc3));
        assert!(!is_atext(b'.'));
        assert!(!is_atext(b'('));
        assert!(!is_atext(b' '));
    }

    #[test]
    fn test_ctext_excludes_delimiters() {
        assert!(!is_ctext(b'('));
        assert!(!is_ctext(b')'));
        assert!(!is_ctext(b'\\'));
        assert!(!is_ctext(b' '));
        assert!(is_ctext(0x7f));
    }

    #[test]
    fn test_qtext_and_dtext() {
        assert!(!is_qtext(b'"'));
        assert!(!is_qtext(b'\\'));
        assert!(is_qtext(b'['));
        assert!(!is_dtext(b'['));
        assert!(!is_dtext(b']'));
        assert!(!is_dtext(b'\\'));
    }

    #[test]
    fn test_mime_token_classes() {
        assert!(is_mime_token_char(b'*'));
        assert!(is_mime_token_char(b'%'));
        assert!(!is_mime_token_char(b'/'));
        assert!(!is_attribute_char(b'*'));
        assert!(!is_attribute_char(b'\''));
        assert!(!is_restricted_name_char(b'*'));
        assert!(is_restricted_name_char(b'+'));
    }

    #[test]
    fn test_utf8_len() {
        assert_eq!(utf8_len(b'a'), 1);
        assert_eq!(utf8_len(0xc2), 2);
        assert_eq!(utf8_len(0xe2), 3);
        assert_eq!(utf8_len(0xf0), 4);
    }
}
