//! Parameter lists shared by media types and content dispositions.
//!
//! Parsing happens in two passes. The first reads `*(";" name "=" value)`
//! with names lowercased and values unquoted, rejecting duplicates. The
//! second resolves RFC 2231 extended parameters:
//!
//! 1. `name*` values of the form `charset'language'%XX…` are decoded.
//! 2. `name*0`/`name*0*` heads are joined with `name*1`, `name*2`, … until
//!    a section is missing. Bytes of `*N*` sections are decoded with the
//!    charset of the head and literal `*N` sections are kept as written.
//!    When the head names no charset every section is appended as written.
//! 3. Every remaining name must be an RFC 6838 restricted name.

use std::collections::BTreeMap;
use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use crate::charset;
use crate::grammar::{HeaderParser, is_mime_token_char};

/// Characters escaped in an RFC 2231 `name*=utf-8''…` value: everything
/// but `attribute-char`.
const ATTRIBUTE_CHAR_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'*')
    .add(b'\'')
    .add(b'%')
    .add(b'(')
    .add(b')')
    .add(b'<')
    .add(b'>')
    .add(b'@')
    .add(b',')
    .add(b';')
    .add(b':')
    .add(b'\\')
    .add(b'"')
    .add(b'/')
    .add(b'[')
    .add(b']')
    .add(b'?')
    .add(b'=');

/// Which quoted-string syntax a parameter value follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuotedStringRule {
    /// RFC 7230: optional whitespace only (no comments or folding) and a
    /// single-segment `name*` extension.
    Http,
    /// RFC 5322: CFWS between tokens and folding inside quoted strings.
    #[default]
    Rfc5322,
    /// RFC 5321 quoted strings (no folding or tabs) with CFWS between
    /// tokens.
    Smtp,
}

/// Reads the syntax shared by `Content-Type` and `Content-Disposition`.
pub(crate) struct ParamParser<'a> {
    text: &'a str,
    rule: QuotedStringRule,
    grammar: HeaderParser<'a>,
}

impl<'a> ParamParser<'a> {
    pub(crate) const fn new(text: &'a str, rule: QuotedStringRule) -> Self {
        Self {
            text,
            rule,
            grammar: HeaderParser::new(text),
        }
    }

    pub(crate) fn skip_space(&mut self, index: usize) -> usize {
        match self.rule {
            QuotedStringRule::Http => {
                let bytes = self.text.as_bytes();
                let mut i = index;
                while matches!(bytes.get(i), Some(b' ' | b'\t')) {
                    i += 1;
                }
                i
            }
            QuotedStringRule::Rfc5322 | QuotedStringRule::Smtp => self.grammar.parse_cfws(index),
        }
    }

    pub(crate) fn token(&mut self, index: usize) -> usize {
        self.grammar.parse_mime_token(index)
    }

    pub(crate) fn restricted_name(&mut self, index: usize) -> usize {
        self.grammar.parse_restricted_name(index)
    }

    pub(crate) fn is(&self, index: usize, expected: u8) -> bool {
        self.text.as_bytes().get(index) == Some(&expected)
    }

    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[start..end]
    }

    /// `*(";" parameter)` through the end of the text. Returns `None` on a
    /// syntax error or a repeated name.
    pub(crate) fn parameters(&mut self, index: usize) -> Option<BTreeMap<String, String>> {
        let len = self.text.len();
        let mut params = BTreeMap::new();
        let mut i = index;
        loop {
            i = self.skip_space(i);
            if i == len {
                return Some(params);
            }
            if !self.is(i, b';') {
                return None;
            }
            i = self.skip_space(i + 1);
            if i == len {
                return Some(params);
            }
            let name_end = self.token(i);
            if name_end == i {
                return None;
            }
            let name = self.text[i..name_end].to_ascii_lowercase();
            i = self.around_equals(name_end);
            if !self.is(i, b'=') {
                return None;
            }
            i = self.around_equals(i + 1);
            let (end, value) = self.value(i)?;
            if params.insert(name, value).is_some() {
                return None;
            }
            i = end;
        }
    }

    /// HTTP allows no whitespace around `=`.
    fn around_equals(&mut self, index: usize) -> usize {
        match self.rule {
            QuotedStringRule::Http => index,
            _ => self.skip_space(index),
        }
    }

    /// `value = token / quoted-string`, unquoted.
    fn value(&mut self, index: usize) -> Option<(usize, String)> {
        let end = self.token(index);
        if end != index {
            return Some((end, self.text[index..end].to_string()));
        }
        if !self.is(index, b'"') {
            return None;
        }
        let end = match self.rule {
            QuotedStringRule::Rfc5322 => {
                let end = self.grammar.parse_bare_quoted_string(index);
                (end != index).then_some(end)?
            }
            QuotedStringRule::Http => self.scan_quoted(index, true)?,
            QuotedStringRule::Smtp => self.scan_quoted(index, false)?,
        };
        Some((end, unquote(&self.text[index + 1..end - 1])))
    }

    /// RFC 7230 or RFC 5321 quoted string starting at `index`; tabs are
    /// only allowed in the former.
    fn scan_quoted(&self, index: usize, allow_tab: bool) -> Option<usize> {
        let bytes = self.text.as_bytes();
        let text_char = |b: u8| {
            matches!(b, b' ' | 0x21 | 0x23..=0x5b | 0x5d..=0x7e)
                || b >= 0x80
                || (allow_tab && b == b'\t')
        };
        let mut i = index + 1;
        loop {
            match *bytes.get(i)? {
                b'"' => return Some(i + 1),
                b'\\' => {
                    let next = *bytes.get(i + 1)?;
                    if !(text_char(next) || next == b'"' || next == b'\\') {
                        return None;
                    }
                    i += 2;
                }
                b if text_char(b) => i += 1,
                _ => return None,
            }
        }
    }
}

/// Removes quoted-pair backslashes and folding line breaks.
pub(crate) fn unquote(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.extend(chars.next()),
            '\r' | '\n' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Returns true if `name` is a whole RFC 6838 restricted name.
pub(crate) fn is_restricted_name(name: &str) -> bool {
    !name.is_empty() && HeaderParser::new(name).parse_restricted_name(0) == name.len()
}

/// Resolves RFC 2231 extended parameters. Returns `None` if an encoded
/// value is malformed or names an unknown charset, or if a name is left
/// that is not a restricted name.
pub(crate) fn resolve_extended(
    mut params: BTreeMap<String, String>,
    rule: QuotedStringRule,
) -> Option<BTreeMap<String, String>> {
    let single: Vec<String> = params
        .keys()
        .filter(|name| {
            name.len() > 1
                && name.ends_with('*')
                && !name[..name.len() - 1].contains('*')
        })
        .cloned()
        .collect();
    for name in single {
        let value = params.remove(&name)?;
        let (charset, bytes) = split_extended_value(&value)?;
        let decoded = charset::decode_bytes(charset, &bytes)?;
        params.insert(name[..name.len() - 1].to_string(), decoded);
    }

    if rule != QuotedStringRule::Http {
        let heads: Vec<String> = params
            .keys()
            .filter_map(|name| {
                name.strip_suffix("*0*")
                    .or_else(|| name.strip_suffix("*0"))
                    .filter(|base| !base.is_empty() && !base.contains('*'))
                    .map(str::to_string)
            })
            .collect();
        for base in heads {
            let joined = join_continuations(&mut params, &base)?;
            params.insert(base, joined);
        }
    }

    params
        .keys()
        .all(|name| is_restricted_name(name))
        .then_some(params)
}

/// Joins the sections of `base` and removes them from `params`.
///
/// Encoded sections are decoded in the head's charset; literal sections
/// are taken as they are.
fn join_continuations(params: &mut BTreeMap<String, String>, base: &str) -> Option<String> {
    let Some(head) = params.remove(&format!("{base}*0*")) else {
        let mut bytes = params.remove(&format!("{base}*0"))?.into_bytes();
        for section in 1.. {
            let Some(part) = params
                .remove(&format!("{base}*{section}*"))
                .or_else(|| params.remove(&format!("{base}*{section}")))
            else {
                break;
            };
            bytes.extend(part.into_bytes());
        }
        return Some(String::from_utf8_lossy(&bytes).into_owned());
    };
    let (charset, mut pending) = split_extended_value(&head)?;
    let charset = charset.to_string();
    let mut joined = String::new();
    for section in 1.. {
        if let Some(encoded) = params.remove(&format!("{base}*{section}*")) {
            pending.extend(percent_decode_str(&encoded));
        } else if let Some(literal) = params.remove(&format!("{base}*{section}")) {
            joined.push_str(&charset::decode_bytes(&charset, &std::mem::take(&mut pending))?);
            joined.push_str(&literal);
        } else {
            break;
        }
    }
    joined.push_str(&charset::decode_bytes(&charset, &pending)?);
    Some(joined)
}

/// Splits `charset'language'value` and percent-decodes the value.
fn split_extended_value(value: &str) -> Option<(&str, Vec<u8>)> {
    let (charset, rest) = value.split_once('\'')?;
    let (_language, encoded) = rest.split_once('\'')?;
    Some((charset, percent_decode_str(encoded).collect()))
}

/// Writes `; name=value` for each parameter in name order, choosing a
/// token, a quoted string or the RFC 2231 UTF-8 form as the value needs.
pub(crate) fn write_parameters(
    f: &mut fmt::Formatter<'_>,
    params: &BTreeMap<String, String>,
) -> fmt::Result {
    for (name, value) in params {
        if !value.is_empty() && value.bytes().all(is_mime_token_char) {
            write!(f, "; {name}={value}")?;
        } else if value.bytes().all(|b| matches!(b, b' ' | b'\t' | 0x21..=0x7e)) {
            f.write_str("; ")?;
            f.write_str(name)?;
            f.write_str("=\"")?;
            for ch in value.chars() {
                if matches!(ch, '"' | '\\') {
                    f.write_str("\\")?;
                }
                write!(f, "{ch}")?;
            }
            f.write_str("\"")?;
        } else {
            write!(
                f,
                "; {name}*=utf-8''{}",
                utf8_percent_encode(value, ATTRIBUTE_CHAR_ESCAPES)
            )?;
        }
    }
    Ok(())
}
