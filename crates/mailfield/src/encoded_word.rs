//! RFC 2047 encoded words.
//!
//! An encoded word has the form `=?charset?encoding?encoded-text?=`, where
//! the encoding is `B` (Base64) or `Q` (a quoted-printable variant with `_`
//! standing for a space). The charset may carry an RFC 2231 language
//! suffix (`utf-8*en`), which is ignored when decoding.
//!
//! Which characters may appear in the encoded text depends on where the
//! word sits, see [`EncodedWordContext`].

use std::fmt::Write as _;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::trace;

use crate::charset;
use crate::config::ParserConfig;
use crate::error::{Error, Result};

/// Longest encoded word allowed on output.
pub const MAX_ENCODED_WORD_LEN: usize = 75;

const Q_PREFIX: &str = "=?utf-8?q?";
const SUFFIX: &str = "?=";

/// Where an encoded word appears, which decides its allowed alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodedWordContext {
    /// `*text` in unstructured fields.
    Unstructured,
    /// A word of a `phrase`. `Q` text is limited to letters, digits and
    /// `!*+-/=_`.
    Phrase,
    /// Inside a `comment`. The text may not contain `(`, `)` or `\`.
    Comment,
}

/// Decodes one encoded word.
///
/// # Errors
///
/// Returns [`Error::InvalidEncodedWord`] if `word` is not a well-formed
/// encoded word for `context`, [`Error::Base64Decode`] for bad `B` text,
/// or [`Error::UnknownCharset`] if the charset is not known.
pub fn decode_encoded_word(word: &str, context: EncodedWordContext) -> Result<String> {
    decode_encoded_word_with(word, context, &ParserConfig::default())
}

/// Like [`decode_encoded_word`], using `config` to decide what happens to
/// unknown charsets.
///
/// # Errors
///
/// See [`decode_encoded_word`]. With
/// [`ParserConfig::decode_unknown_charsets`] set, an unknown charset is
/// decoded as lossy UTF-8 instead of failing.
pub fn decode_encoded_word_with(
    word: &str,
    context: EncodedWordContext,
    config: &ParserConfig,
) -> Result<String> {
    let parts = split_word(word).ok_or_else(|| Error::InvalidEncodedWord(word.to_string()))?;
    let bytes = match parts.encoding {
        b'B' | b'b' => decode_base64(parts.text)?,
        _ => decode_q(parts.text, context)
            .ok_or_else(|| Error::InvalidEncodedWord(word.to_string()))?,
    };
    if context == EncodedWordContext::Comment && parts.text.contains(['(', ')', '\\']) {
        return Err(Error::InvalidEncodedWord(word.to_string()));
    }
    match charset::decode_bytes(parts.charset, &bytes) {
        Some(text) => Ok(text),
        None if config.decode_unknown_charsets => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        None => Err(Error::UnknownCharset(parts.charset.to_string())),
    }
}

/// Returns true if `word` has the outline of an encoded word.
#[must_use]
pub fn is_encoded_word(word: &str) -> bool {
    split_word(word).is_some()
}

/// Decodes every whitespace-delimited encoded word in unstructured text.
///
/// Whitespace between two adjacent encoded words is dropped; any other
/// whitespace is kept as is.
#[must_use]
pub fn decode_unstructured(text: &str, config: &ParserConfig) -> String {
    decode_runs(text, EncodedWordContext::Unstructured, config)
}

/// Decodes encoded words in the text between a comment's parentheses.
///
/// Words are delimited by whitespace or parentheses, so nested comments
/// are decoded too. Decoded `(`, `)` and `\` are escaped.
#[must_use]
pub(crate) fn decode_comment_text(text: &str, config: &ParserConfig) -> String {
    decode_runs(text, EncodedWordContext::Comment, config)
}

/// Encodes `text` as one or more `Q` encoded words in UTF-8, separated by
/// single spaces.
///
/// Each word is at most [`MAX_ENCODED_WORD_LEN`] characters, and no
/// character's bytes are split across two words. The alphabet used is
/// safe in every context.
#[must_use]
pub fn encode_encoded_words(text: &str) -> String {
    let budget = MAX_ENCODED_WORD_LEN - Q_PREFIX.len() - SUFFIX.len();
    let mut words = Vec::new();
    let mut current = String::new();
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        let mut piece = String::new();
        for &b in ch.encode_utf8(&mut buf).as_bytes() {
            match b {
                b' ' => piece.push('_'),
                b'!' | b'*' | b'+' | b'-' | b'/' => piece.push(char::from(b)),
                _ if b.is_ascii_alphanumeric() => piece.push(char::from(b)),
                _ => {
                    let _ = write!(piece, "={b:02X}");
                }
            }
        }
        if !current.is_empty() && current.len() + piece.len() > budget {
            words.push(std::mem::take(&mut current));
        }
        current.push_str(&piece);
    }
    if !current.is_empty() || words.is_empty() {
        words.push(current);
    }
    words
        .iter()
        .map(|w| format!("{Q_PREFIX}{w}{SUFFIX}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decodes Base64 `B` text.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data).map_err(Into::into)
}

struct WordParts<'a> {
    charset: &'a str,
    encoding: u8,
    text: &'a str,
}

/// Splits `=?charset?encoding?text?=` into its parts.
fn split_word(word: &str) -> Option<WordParts<'_>> {
    let inner = word.strip_prefix("=?")?.strip_suffix("?=")?;
    let mut parts = inner.splitn(3, '?');
    let charset_and_lang = parts.next()?;
    let encoding = parts.next()?;
    let text = parts.next()?;
    // An empty text leaves `inner` as `cs?q?`, whose third part is "".
    let charset = charset_and_lang
        .split_once('*')
        .map_or(charset_and_lang, |(cs, _)| cs);
    if charset.is_empty() || !charset.bytes().all(is_charset_char) {
        return None;
    }
    let encoding = match encoding.as_bytes() {
        [b @ (b'B' | b'b' | b'Q' | b'q')] => *b,
        _ => return None,
    };
    if text.bytes().any(|b| b == b'?' || !(0x21..=0x7e).contains(&b)) {
        return None;
    }
    Some(WordParts {
        charset,
        encoding,
        text,
    })
}

/// RFC 2047 `token` character: printable ASCII except `especials`.
const fn is_charset_char(b: u8) -> bool {
    matches!(b, 0x21..=0x7e)
        && !matches!(
            b,
            b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'"' | b'/' | b'[' | b']'
                | b'?' | b'.' | b'=' | b'\\'
        )
}

fn decode_q(text: &str, context: EncodedWordContext) -> Option<Vec<u8>> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'_' => {
                out.push(b' ');
                i += 1;
            }
            b'=' => {
                let hex = bytes.get(i + 1..i + 3)?;
                if !hex.iter().all(u8::is_ascii_hexdigit) {
                    return None;
                }
                let hex = std::str::from_utf8(hex).ok()?;
                out.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            b if context == EncodedWordContext::Phrase
                && !(b.is_ascii_alphanumeric() || matches!(b, b'!' | b'*' | b'+' | b'-' | b'/')) =>
            {
                return None;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    Some(out)
}

/// Splits `text` at whitespace (and parentheses in comments), decodes each
/// run that is an encoded word, and joins adjacent decoded words.
fn decode_runs(text: &str, context: EncodedWordContext, config: &ParserConfig) -> String {
    let is_delimiter = |b: u8| {
        matches!(b, b' ' | b'\t' | b'\r' | b'\n')
            || (context == EncodedWordContext::Comment && matches!(b, b'(' | b')'))
    };
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    let mut gap_start = 0;
    let mut previous_decoded = false;
    while i < bytes.len() {
        if is_delimiter(bytes[i]) {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && !is_delimiter(bytes[i]) {
            i += 1;
        }
        let run = &text[start..i];
        let gap = &text[gap_start..start];
        let decoded = if run.starts_with("=?") {
            match decode_encoded_word_with(run, context, config) {
                Ok(decoded) if is_substitutable(&decoded, context) => Some(decoded),
                Ok(_) => {
                    trace!(word = run, "decoded text would change the field, left undecoded");
                    None
                }
                Err(e) => {
                    trace!(word = run, error = %e, "encoded word left undecoded");
                    None
                }
            }
        } else {
            None
        };
        match decoded {
            Some(decoded) => {
                let gap_is_space = gap.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'));
                // Joining `=` to a leading `?` would spell a new encoded word.
                let joins_marker = out.ends_with('=') && decoded.starts_with('?');
                if !(previous_decoded && gap_is_space) || joins_marker {
                    out.push_str(gap);
                }
                if context == EncodedWordContext::Comment {
                    escape_comment_text(&decoded, &mut out);
                } else {
                    out.push_str(&decoded);
                }
                previous_decoded = true;
            }
            None => {
                out.push_str(gap);
                out.push_str(run);
                previous_decoded = false;
            }
        }
        gap_start = i;
    }
    out.push_str(&text[gap_start..]);
    out
}

/// Returns true if decoded text can stand in for its encoded word.
///
/// Control characters other than tab would break the field apart (a bare
/// CR or LF ends the header line). In unstructured text a decoded `=?`
/// would read as a fresh encoded word on the next pass.
pub(crate) fn is_substitutable(decoded: &str, context: EncodedWordContext) -> bool {
    if decoded.chars().any(|ch| ch.is_ascii_control() && ch != '\t') {
        return false;
    }
    context != EncodedWordContext::Unstructured || !decoded.contains("=?")
}

/// Escapes comment delimiters, and the `=` of any `=?` so decoded text is
/// never taken for another encoded word.
fn escape_comment_text(text: &str, out: &mut String) {
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if matches!(ch, '(' | ')' | '\\') || (ch == '=' && chars.peek() == Some(&'?')) {
            out.push('\\');
        }
        out.push(ch);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_b_and_q() {
        let ctx = EncodedWordContext::Unstructured;
        assert_eq!(decode_encoded_word("=?utf-8?B?SMOpbGxv?=", ctx).unwrap(), "H\u{e9}llo");
        assert_eq!(decode_encoded_word("=?UTF-8?Q?H=C3=A9llo?=", ctx).unwrap(), "H\u{e9}llo");
        assert_eq!(decode_encoded_word("=?iso-8859-1?q?caf=e9_au_lait?=", ctx).unwrap(), "caf\u{e9} au lait");
        assert_eq!(decode_encoded_word("=?us-ascii?q??=", ctx).unwrap(), "");
    }

    #[test]
    fn test_language_suffix_ignored() {
        let decoded =
            decode_encoded_word("=?US-ASCII*EN?Q?Keith_Moore?=", EncodedWordContext::Phrase).unwrap();
        assert_eq!(decoded, "Keith Moore");
    }

    #[test]
    fn test_malformed_words() {
        let ctx = EncodedWordContext::Unstructured;
        assert!(matches!(decode_encoded_word("=?utf-8?x?abc?=", ctx), Err(Error::InvalidEncodedWord(_))));
        assert!(matches!(decode_encoded_word("=??q?abc?=", ctx), Err(Error::InvalidEncodedWord(_))));
        assert!(matches!(decode_encoded_word("=?utf-8?q?a=4?=", ctx), Err(Error::InvalidEncodedWord(_))));
        assert!(matches!(decode_encoded_word("=?utf-8?q?a b?=", ctx), Err(Error::InvalidEncodedWord(_))));
        assert!(matches!(decode_encoded_word("=?utf-8?b?!!!?=", ctx), Err(Error::Base64Decode(_))));
        assert!(!is_encoded_word("=?utf-8?q?abc"));
    }

    #[test]
    fn test_context_alphabets() {
        assert!(decode_encoded_word("=?utf-8?q?a.b?=", EncodedWordContext::Unstructured).is_ok());
        assert!(decode_encoded_word("=?utf-8?q?a.b?=", EncodedWordContext::Phrase).is_err());
        assert!(decode_encoded_word("=?utf-8?q?a(b?=", EncodedWordContext::Comment).is_err());
        assert!(decode_encoded_word("=?utf-8?q?a=28b?=", EncodedWordContext::Comment).is_ok());
    }

    #[test]
    fn test_unknown_charset() {
        let word = "=?x-unknown?q?abc?=";
        assert!(matches!(
            decode_encoded_word(word, EncodedWordContext::Unstructured),
            Err(Error::UnknownCharset(cs)) if cs == "x-unknown"
        ));
        let config = ParserConfig::builder().decode_unknown_charsets(true).build().unwrap();
        let decoded =
            decode_encoded_word_with(word, EncodedWordContext::Unstructured, &config).unwrap();
        assert_eq!(decoded, "abc");
    }

    #[test]
    fn test_unstructured_merges_adjacent_words() {
        let config = ParserConfig::default();
        assert_eq!(decode_unstructured("=?us-ascii?q?x?= =?us-ascii?q?y?=", &config), "xy");
        assert_eq!(decode_unstructured("=?us-ascii?q?x?=\r\n =?us-ascii?q?y?=", &config), "xy");
        assert_eq!(decode_unstructured("=?us-ascii?q?a?= plainb", &config), "a plainb");
        assert_eq!(decode_unstructured("plain =?us-ascii?q?a?=  end ", &config), "plain a  end ");
        assert_eq!(decode_unstructured("x=?us-ascii?q?a?=", &config), "x=?us-ascii?q?a?=");
        assert_eq!(decode_unstructured("=?bad?q?a?= =?us-ascii?q?b?=", &config), "=?bad?q?a?= b");
    }

    #[test]
    fn test_line_breaks_are_not_decoded() {
        let config = ParserConfig::default();
        let word = "=?utf-8?q?a=0D=0AX-Evil=3A_1?=";
        assert_eq!(decode_unstructured(word, &config), word);
        assert_eq!(decode_unstructured("=?utf-8?q?a=00b?=", &config), "=?utf-8?q?a=00b?=");
        assert_eq!(decode_unstructured("=?utf-8?q?a=09b?=", &config), "a\tb");
        assert_eq!(decode_comment_text("=?utf-8?q?x=0Ay?=", &config), "=?utf-8?q?x=0Ay?=");
    }

    #[test]
    fn test_unstructured_decoding_is_stable() {
        let config = ParserConfig::default();
        let nested = "=?us-ascii?q?=3D=3Fus-ascii=3Fq=3Fx=3F=3D?=";
        assert_eq!(decode_unstructured(nested, &config), nested);

        let split = "=?us-ascii?q?=3D?= =?us-ascii?q?=3Fus-ascii=3Fq=3Fx=3F=3D?=";
        let once = decode_unstructured(split, &config);
        assert_eq!(once, "= ?us-ascii?q?x?=");
        assert_eq!(decode_unstructured(&once, &config), once);
    }

    #[test]
    fn test_charset_especials_rejected() {
        let ctx = EncodedWordContext::Unstructured;
        assert!(decode_encoded_word("=?utf.8?q?a?=", ctx).is_err());
        assert!(decode_encoded_word("=?utf\\8?q?a?=", ctx).is_err());
        assert!(decode_encoded_word("=?utf-8?q?a?=", ctx).is_ok());
    }

    #[test]
    fn test_comment_text_escapes() {
        let config = ParserConfig::default();
        assert_eq!(decode_comment_text("=?utf-8?q?a=29?=", &config), "a\\)");
        assert_eq!(decode_comment_text("x (=?utf-8?q?y?=)", &config), "x (y)");
        assert_eq!(
            decode_comment_text("=?utf-8?q?=3D=3Fa=3Fq=3Fb=3F=3D?=", &config),
            "\\=?a?q?b?=",
        );
    }

    #[test]
    fn test_encode_encoded_words() {
        assert_eq!(encode_encoded_words("x\u{a0}"), "=?utf-8?q?x=C2=A0?=");
        assert_eq!(encode_encoded_words("a b"), "=?utf-8?q?a_b?=");
        assert_eq!(encode_encoded_words(""), "=?utf-8?q??=");
    }

    #[test]
    fn test_encode_splits_long_text() {
        let text = "\u{e9}".repeat(40);
        let encoded = encode_encoded_words(&text);
        let words: Vec<&str> = encoded.split(' ').collect();
        assert!(words.len() > 1);
        assert!(words.iter().all(|w| w.len() <= MAX_ENCODED_WORD_LEN));
        assert!(words.iter().all(|w| !w.contains("=C3?=")));
        let config = ParserConfig::default();
        assert_eq!(decode_unstructured(&encoded, &config), text);
    }
}
