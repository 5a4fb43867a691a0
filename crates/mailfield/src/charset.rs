//! Charset lookup and byte decoding for encoded words and RFC 2231
//! parameter values.

use encoding_rs::Encoding;

/// Returns true if `label` names a charset this crate can decode.
///
/// An empty label counts as US-ASCII.
#[must_use]
pub fn is_known(label: &str) -> bool {
    is_utf8(label) || is_ascii(label) || lookup(label).is_some()
}

/// Decodes `bytes` in the charset named by `label`.
///
/// Returns `None` if the charset is unknown. Malformed sequences become
/// U+FFFD. Bytes above 0x7F in US-ASCII text are malformed too.
#[must_use]
pub fn decode_bytes(label: &str, bytes: &[u8]) -> Option<String> {
    if is_utf8(label) {
        return Some(String::from_utf8_lossy(bytes).into_owned());
    }
    if is_ascii(label) {
        return Some(
            bytes
                .iter()
                .map(|&b| if b.is_ascii() { char::from(b) } else { '\u{fffd}' })
                .collect(),
        );
    }
    let encoding = lookup(label)?;
    let (decoded, _, _) = encoding.decode(bytes);
    Some(decoded.into_owned())
}

fn is_utf8(label: &str) -> bool {
    label.eq_ignore_ascii_case("utf-8") || label.eq_ignore_ascii_case("utf8")
}

fn is_ascii(label: &str) -> bool {
    label.is_empty()
        || label.eq_ignore_ascii_case("us-ascii")
        || label.eq_ignore_ascii_case("ascii")
        || label.eq_ignore_ascii_case("ansi_x3.4-1968")
}

/// WHATWG label lookup. The `replacement` encoding stands for labels that
/// must never be decoded, so it counts as unknown.
fn lookup(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes()).filter(|e| *e != encoding_rs::REPLACEMENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_and_ascii() {
        assert_eq!(decode_bytes("UTF-8", "h\u{e9}".as_bytes()).unwrap(), "h\u{e9}");
        assert_eq!(decode_bytes("us-ascii", b"abc").unwrap(), "abc");
        assert_eq!(decode_bytes("", b"a\xe9").unwrap(), "a\u{fffd}");
    }

    #[test]
    fn test_legacy_charsets() {
        assert_eq!(decode_bytes("iso-8859-1", b"caf\xe9").unwrap(), "caf\u{e9}");
        assert_eq!(decode_bytes("windows-1252", b"\x80").unwrap(), "\u{20ac}");
        assert_eq!(decode_bytes("koi8-r", b"\xc1").unwrap(), "\u{430}");
    }

    #[test]
    fn test_unknown_charset() {
        assert!(decode_bytes("x-no-such-charset", b"abc").is_none());
        assert!(decode_bytes("iso-2022-kr", b"abc").is_none());
        assert!(!is_known("x-no-such-charset"));
        assert!(is_known("Shift_JIS"));
    }
}
