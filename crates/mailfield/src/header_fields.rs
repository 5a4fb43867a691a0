//! Header field registry and encoded-word substitution.
//!
//! Every header field name maps to a [`HeaderFieldPolicy`] that decides
//! where RFC 2047 encoded words may be decoded in its value:
//!
//! - **Unstructured**: any whitespace-delimited encoded word.
//! - **Structured, comments anywhere**: only inside comments, located by a
//!   plain scan.
//! - **Structured, no comments**: nowhere.
//! - **Structured with grammar**: the value must match the field's
//!   grammar; then encoded words are decoded in comments and in the words
//!   of phrases (display names, keywords), never in addresses or message
//!   identifiers. A value that does not match is returned unchanged.
//!
//! # Example
//!
//! ```
//! use mailfield::header_fields::decode_header_value;
//!
//! let from = "=?utf-8?q?Andr=C3=A9?= Pirard <PIRARD@vm1.ulg.ac.be>";
//! assert_eq!(decode_header_value("From", from), "Andr\u{e9} Pirard <PIRARD@vm1.ulg.ac.be>");
//!
//! let subject = "=?iso-8859-1?q?this=20is=20some=20text?=";
//! assert_eq!(decode_header_value("Subject", subject), "this is some text");
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::{debug, trace};

use crate::config::ParserConfig;
use crate::encoded_word::{
    EncodedWordContext, decode_comment_text, decode_encoded_word_with, decode_unstructured,
    encode_encoded_words, is_substitutable,
};
use crate::grammar::{Grammar, HeaderParser, TokenKind, is_atext, utf8_len};

/// How encoded words are found in a header field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFieldPolicy {
    /// Free text (`Subject`, `Comments`, unknown fields).
    Unstructured,
    /// Structured text whose comments may sit anywhere and may hold
    /// encoded words.
    StructuredCommentsAnywhere,
    /// Structured text that never holds encoded words (URIs, signatures).
    StructuredNoComments,
    /// Structured text validated against a grammar.
    StructuredWithGrammar(Grammar),
}

impl HeaderFieldPolicy {
    /// Returns the grammar of a grammar-backed policy.
    #[must_use]
    pub const fn grammar(&self) -> Option<Grammar> {
        match self {
            Self::StructuredWithGrammar(grammar) => Some(*grammar),
            _ => None,
        }
    }

    /// Returns true if `value` is acceptable for the field.
    ///
    /// Only grammar-backed policies reject anything: the whole value must
    /// be consumed by the grammar.
    #[must_use]
    pub fn validate(&self, value: &str) -> bool {
        self.validate_with(value, &ParserConfig::default())
    }

    /// Like [`validate`](Self::validate) with explicit limits.
    #[must_use]
    pub fn validate_with(&self, value: &str, config: &ParserConfig) -> bool {
        match self {
            Self::StructuredWithGrammar(grammar) => grammar.matches(value, config),
            _ => true,
        }
    }

    /// Decodes the encoded words this policy allows in `value`.
    #[must_use]
    pub fn replace_encoded_words(&self, value: &str) -> String {
        self.replace_encoded_words_with(value, &ParserConfig::default())
    }

    /// Like [`replace_encoded_words`](Self::replace_encoded_words) with
    /// explicit limits.
    #[must_use]
    pub fn replace_encoded_words_with(&self, value: &str, config: &ParserConfig) -> String {
        if !value.contains("=?") {
            return value.to_string();
        }
        match self {
            Self::Unstructured => decode_unstructured(value, config),
            Self::StructuredCommentsAnywhere => decode_comments_anywhere(value, config),
            Self::StructuredNoComments => value.to_string(),
            Self::StructuredWithGrammar(grammar) => decode_with_grammar(value, *grammar, config),
        }
    }
}

/// Returns the policy for a header field name, ignoring ASCII case.
///
/// Names that are not registered are unstructured.
#[must_use]
pub fn get_header_policy(name: &str) -> HeaderFieldPolicy {
    REGISTRY
        .get(name.to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or(HeaderFieldPolicy::Unstructured)
}

/// Returns every registered header field name, lowercased.
pub fn registered_header_names() -> impl Iterator<Item = &'static str> {
    REGISTRY.keys().copied()
}

/// Decodes the encoded words `policy` allows in `value`.
#[must_use]
pub fn replace_encoded_words(value: &str, policy: HeaderFieldPolicy) -> String {
    policy.replace_encoded_words(value)
}

/// Looks up the policy for `name` and decodes `value` with it.
#[must_use]
pub fn decode_header_value(name: &str, value: &str) -> String {
    decode_header_value_with(name, value, &ParserConfig::default())
}

/// Like [`decode_header_value`] with explicit limits.
#[must_use]
pub fn decode_header_value_with(name: &str, value: &str, config: &ParserConfig) -> String {
    get_header_policy(name).replace_encoded_words_with(value, config)
}

/// Replaces the text of every comment in `value` that contains non-ASCII
/// characters with UTF-8 `Q` encoded words.
///
/// Nested comments keep their structure; only the text runs between
/// parentheses are encoded. Quoted strings are left alone.
///
/// ```
/// use mailfield::header_fields::convert_comments_to_encoded_words;
///
/// assert_eq!(convert_comments_to_encoded_words("(x\u{a0})"), "(=?utf-8?q?x=C2=A0?=)");
/// ```
#[must_use]
pub fn convert_comments_to_encoded_words(value: &str) -> String {
    if value.is_ascii() {
        return value.to_string();
    }
    map_top_level_comments(value, &ParserConfig::default(), |interior, out| {
        encode_comment_text(interior, out);
    })
}

macro_rules! grammar {
    ($name:literal, $production:ident) => {
        HeaderFieldPolicy::StructuredWithGrammar(Grammar::new($name, |p, i| p.$production(i)))
    };
}

static REGISTRY: LazyLock<HashMap<&'static str, HeaderFieldPolicy>> = LazyLock::new(|| {
    use HeaderFieldPolicy::{StructuredCommentsAnywhere, StructuredNoComments, Unstructured};

    let mailbox_list = grammar!("mailbox-list", parse_header_from);
    let mailbox = grammar!("mailbox", parse_header_sender);
    let address_list = grammar!("address-list", parse_header_to);
    let bcc = grammar!("bcc", parse_header_bcc);
    let date_time = grammar!("date-time", parse_date_time);
    let msg_id = grammar!("msg-id", parse_header_message_id);
    let msg_id_list = grammar!("msg-id-list", parse_header_msg_id_list);
    let keywords = grammar!("keywords", parse_header_keywords);
    let precedence = grammar!("mmhs-precedence", parse_header_mmhs_precedence);

    let entries = [
        // RFC 5322 originator, destination and resent fields
        ("from", mailbox_list),
        ("sender", mailbox),
        ("reply-to", address_list),
        ("to", address_list),
        ("cc", address_list),
        ("bcc", bcc),
        ("resent-from", mailbox_list),
        ("resent-sender", mailbox),
        ("resent-to", address_list),
        ("resent-cc", address_list),
        ("resent-bcc", bcc),
        ("resent-reply-to", address_list),
        ("author", mailbox_list),
        ("original-from", mailbox_list),
        ("approved", mailbox_list),
        ("disposition-notification-to", mailbox_list),
        ("return-receipt-to", mailbox_list),
        ("mail-followup-to", address_list),
        ("mail-reply-to", address_list),
        ("return-path", grammar!("path", parse_header_return_path)),
        // dates
        ("date", date_time),
        ("resent-date", date_time),
        ("expires", date_time),
        ("expiry-date", date_time),
        ("delivery-date", date_time),
        ("latest-delivery-time", date_time),
        ("reply-by", date_time),
        // identifiers
        ("message-id", msg_id),
        ("resent-message-id", msg_id),
        ("original-message-id", msg_id),
        ("content-id", grammar!("content-id", parse_header_content_id)),
        ("in-reply-to", msg_id_list),
        ("references", msg_id_list),
        ("obsoletes", msg_id_list),
        ("supersedes", msg_id_list),
        ("keywords", keywords),
        // trace and authentication
        ("received", grammar!("received", parse_header_received)),
        ("received-spf", grammar!("received-spf", parse_header_received_spf)),
        (
            "authentication-results",
            grammar!("authentication-results", parse_header_authentication_results),
        ),
        // MIME
        ("mime-version", grammar!("mime-version", parse_header_mime_version)),
        ("content-type", grammar!("content-type", parse_header_content_type)),
        (
            "content-disposition",
            grammar!("content-disposition", parse_header_content_disposition),
        ),
        (
            "content-transfer-encoding",
            grammar!("content-transfer-encoding", parse_header_content_transfer_encoding),
        ),
        ("content-language", grammar!("content-language", parse_header_content_language)),
        ("accept-language", grammar!("accept-language", parse_header_accept_language)),
        ("content-duration", grammar!("content-duration", parse_header_content_duration)),
        // RFC 2156 and RFC 3458 keyword fields
        ("importance", grammar!("importance", parse_header_importance)),
        ("priority", grammar!("priority", parse_header_priority)),
        ("sensitivity", grammar!("sensitivity", parse_header_sensitivity)),
        ("autoforwarded", grammar!("autoforwarded", parse_header_autoforwarded)),
        ("message-context", grammar!("message-context", parse_header_message_context)),
        // assorted structured fields
        ("mt-priority", grammar!("mt-priority", parse_header_mt_priority)),
        ("auto-submitted", grammar!("auto-submitted", parse_header_auto_submitted)),
        (
            "disposition-notification-options",
            grammar!(
                "disposition-notification-options",
                parse_header_disposition_notification_options
            ),
        ),
        ("list-id", grammar!("list-id", parse_header_list_id)),
        ("jabber-id", grammar!("jabber-id", parse_header_jabber_id)),
        (
            "require-recipient-valid-since",
            grammar!(
                "require-recipient-valid-since",
                parse_header_require_recipient_valid_since
            ),
        ),
        ("encrypted", grammar!("encrypted", parse_header_encrypted)),
        // RFC 6477 military message handling
        ("mmhs-exempted-address", address_list),
        ("mmhs-extended-authorisation-info", date_time),
        (
            "mmhs-subject-indicator-codes",
            grammar!("mmhs-subject-indicator-codes", parse_header_mmhs_subject_indicator_codes),
        ),
        ("mmhs-handling-instructions", keywords),
        ("mmhs-message-instructions", keywords),
        (
            "mmhs-codress-message-indicator",
            grammar!(
                "mmhs-codress-message-indicator",
                parse_header_mmhs_codress_message_indicator
            ),
        ),
        ("mmhs-primary-precedence", precedence),
        ("mmhs-copy-precedence", precedence),
        ("mmhs-message-type", grammar!("mmhs-message-type", parse_header_mmhs_message_type)),
        ("mmhs-other-recipients-indicator-to", StructuredCommentsAnywhere),
        ("mmhs-other-recipients-indicator-cc", StructuredCommentsAnywhere),
        ("mmhs-acp127-message-identifier", StructuredCommentsAnywhere),
        ("mmhs-originator-plad", StructuredCommentsAnywhere),
        ("mmhs-originator-reference", Unstructured),
        // Italian certified mail (PEC)
        ("x-ricevuta", grammar!("x-ricevuta", parse_header_x_ricevuta)),
        ("x-trasporto", grammar!("x-trasporto", parse_header_x_trasporto)),
        (
            "x-verificasicurezza",
            grammar!("x-verificasicurezza", parse_header_x_verifica_sicurezza),
        ),
        ("x-tiporicevuta", grammar!("x-tiporicevuta", parse_header_x_tipo_ricevuta)),
        ("x-riferimento-message-id", msg_id),
        // RFC 2156 X.400 mappings
        ("alternate-recipient", StructuredCommentsAnywhere),
        ("content-features", StructuredCommentsAnywhere),
        ("content-return", StructuredCommentsAnywhere),
        ("conversion", StructuredCommentsAnywhere),
        ("conversion-with-loss", StructuredCommentsAnywhere),
        ("disclose-recipients", StructuredCommentsAnywhere),
        ("dl-expansion-history", StructuredCommentsAnywhere),
        ("generate-delivery-report", StructuredCommentsAnywhere),
        ("prevent-nondelivery-report", StructuredCommentsAnywhere),
        ("x400-content-identifier", StructuredCommentsAnywhere),
        ("x400-content-return", StructuredCommentsAnywhere),
        ("x400-mts-identifier", StructuredCommentsAnywhere),
        ("x400-originator", StructuredCommentsAnywhere),
        ("x400-received", StructuredCommentsAnywhere),
        ("x400-recipients", StructuredCommentsAnywhere),
        ("x400-trace", StructuredCommentsAnywhere),
        // URIs, signatures and keys
        ("archived-at", StructuredNoComments),
        ("content-base", StructuredNoComments),
        ("content-location", StructuredNoComments),
        ("content-md5", StructuredNoComments),
        ("list-archive", StructuredNoComments),
        ("list-help", StructuredNoComments),
        ("list-owner", StructuredNoComments),
        ("list-post", StructuredNoComments),
        ("list-subscribe", StructuredNoComments),
        ("list-unsubscribe", StructuredNoComments),
        ("list-unsubscribe-post", StructuredNoComments),
        ("dkim-signature", StructuredNoComments),
        ("arc-seal", StructuredNoComments),
        ("arc-message-signature", StructuredNoComments),
        ("arc-authentication-results", StructuredNoComments),
        ("autocrypt", StructuredNoComments),
        ("autocrypt-gossip", StructuredNoComments),
        ("openpgp", StructuredNoComments),
        ("original-recipient", StructuredNoComments),
        ("final-recipient", StructuredNoComments),
        // free text
        ("subject", Unstructured),
        ("comments", Unstructured),
        ("content-description", Unstructured),
        ("organization", Unstructured),
        ("x-mailer", Unstructured),
    ];
    entries.into_iter().collect()
});

/// Decodes encoded words inside each top-level comment.
fn decode_comments_anywhere(value: &str, config: &ParserConfig) -> String {
    map_top_level_comments(value, config, |interior, out| {
        out.push_str(&decode_comment_text(interior, config));
    })
}

/// Copies `value`, passing the interior of each top-level comment through
/// `map`. Quoted strings are skipped so a `(` inside one is not taken for
/// a comment.
fn map_top_level_comments(
    value: &str,
    config: &ParserConfig,
    mut map: impl FnMut(&str, &mut String),
) -> String {
    let bytes = value.as_bytes();
    let mut parser = HeaderParser::new(value).with_config(config);
    let mut out = String::with_capacity(value.len());
    let mut last = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let end = parser.parse_bare_quoted_string(i);
                i = if end == i { i + 1 } else { end };
            }
            b'(' => {
                let end = parser.parse_comment(i);
                if end == i {
                    i += 1;
                    continue;
                }
                out.push_str(&value[last..=i]);
                map(&value[i + 1..end - 1], &mut out);
                out.push(')');
                last = end;
                i = end;
            }
            _ => i += 1,
        }
    }
    out.push_str(&value[last..]);
    out
}

/// Walks the sorted token log of a grammar match and decodes comments and
/// the eligible words of phrases.
fn decode_with_grammar(value: &str, grammar: Grammar, config: &ParserConfig) -> String {
    let mut parser = HeaderParser::new(value).with_config(config).recording();
    let consumed = grammar.apply(&mut parser, 0);
    if consumed != value.len() {
        debug!(
            grammar = grammar.name(),
            len = value.len(),
            consumed,
            "header value does not match its grammar, left undecoded"
        );
        return value.to_string();
    }
    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());
    let mut last = 0;
    let mut phrase: Option<(usize, usize)> = None;
    let mut run: Option<String> = None;
    for token in parser.into_sorted_tokens() {
        if token.start < last {
            continue;
        }
        match token.kind {
            TokenKind::Phrase => phrase = Some((token.start, token.end)),
            TokenKind::Comment => {
                flush_phrase_run(run.take(), &mut out);
                out.push_str(&value[last..=token.start]);
                out.push_str(&decode_comment_text(
                    &value[token.start + 1..token.end - 1],
                    config,
                ));
                out.push(')');
                last = token.end;
            }
            TokenKind::Atom => {
                let inside_phrase =
                    phrase.is_some_and(|(start, end)| token.start >= start && token.end <= end);
                let delimited = (token.start == 0 || is_lwsp(bytes[token.start - 1]))
                    && (token.end == bytes.len() || is_lwsp(bytes[token.end]));
                let word = &value[token.start..token.end];
                if !inside_phrase || !delimited || !word.starts_with("=?") {
                    continue;
                }
                let decoded =
                    match decode_encoded_word_with(word, EncodedWordContext::Phrase, config) {
                        Ok(decoded) if is_substitutable(&decoded, EncodedWordContext::Phrase) => {
                            decoded
                        }
                        Ok(_) => {
                            trace!(word, "decoded text would change the field, left undecoded");
                            continue;
                        }
                        Err(e) => {
                            trace!(word, error = %e, "encoded word left undecoded");
                            continue;
                        }
                    };
                let gap = &value[last..token.start];
                match run.as_mut() {
                    Some(text) if gap.bytes().all(is_lwsp) => text.push_str(&decoded),
                    _ => {
                        flush_phrase_run(run.take(), &mut out);
                        out.push_str(gap);
                        run = Some(decoded);
                    }
                }
                last = token.end;
            }
        }
    }
    flush_phrase_run(run, &mut out);
    out.push_str(&value[last..]);
    out
}

const fn is_lwsp(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// Emits decoded phrase text, as a quoted string unless it still reads as
/// a run of atoms. Blank text is quoted so the phrase keeps its word.
fn flush_phrase_run(run: Option<String>, out: &mut String) {
    let Some(text) = run else {
        return;
    };
    let plain = text.bytes().any(is_atext)
        && !text.contains("=?")
        && text.bytes().all(|b| is_atext(b) || b == b' ' || b == b'\t');
    if plain {
        out.push_str(&text);
        return;
    }
    out.push('"');
    for ch in text.chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
}

/// Encodes the non-ASCII text runs of a comment interior, keeping nested
/// parentheses and surrounding whitespace as they are.
fn encode_comment_text(text: &str, out: &mut String) {
    let bytes = text.as_bytes();
    let mut run_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 1;
                if let Some(&next) = bytes.get(i) {
                    i = (i + utf8_len(next)).min(bytes.len());
                }
            }
            b'(' | b')' => {
                encode_comment_run(&text[run_start..i], out);
                out.push(char::from(bytes[i]));
                i += 1;
                run_start = i;
            }
            _ => i += 1,
        }
    }
    encode_comment_run(&text[run_start..], out);
}

fn encode_comment_run(run: &str, out: &mut String) {
    if run.is_ascii() {
        out.push_str(run);
        return;
    }
    const FOLD: [char; 4] = [' ', '\t', '\r', '\n'];
    let body = run.trim_matches(FOLD);
    let lead = run.len() - run.trim_start_matches(FOLD).len();
    let mut plain = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => plain.extend(chars.next()),
            '\r' | '\n' => {}
            _ => plain.push(ch),
        }
    }
    out.push_str(&run[..lead]);
    out.push_str(&encode_encoded_words(&plain));
    out.push_str(&run[lead + body.len()..]);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(get_header_policy("FROM"), get_header_policy("from"));
        assert!(get_header_policy("From").grammar().is_some());
        assert_eq!(get_header_policy("X-Unknown-Field"), HeaderFieldPolicy::Unstructured);
        assert_eq!(get_header_policy("List-Post"), HeaderFieldPolicy::StructuredNoComments);
    }

    #[test]
    fn test_registry_size() {
        assert!(registered_header_names().count() >= 90);
        assert!(registered_header_names().all(|n| n == n.to_ascii_lowercase()));
    }

    #[test]
    fn test_display_name_decoded() {
        let policy = get_header_policy("to");
        assert_eq!(
            policy.replace_encoded_words("=?US-ASCII?Q?Keith_Moore?= <moore@cs.utk.edu>"),
            "Keith Moore <moore@cs.utk.edu>"
        );
        assert_eq!(
            policy.replace_encoded_words(
                "=?ISO-8859-1?Q?Keld_J=F8rn_Simonsen?= <keld@dkuug.dk>"
            ),
            "Keld J\u{f8}rn Simonsen <keld@dkuug.dk>"
        );
    }

    #[test]
    fn test_adjacent_phrase_words_merge() {
        let policy = get_header_policy("from");
        assert_eq!(
            policy.replace_encoded_words("=?ISO-8859-1?Q?a?= =?ISO-8859-2?Q?_b?= <x@y.test>"),
            "a b <x@y.test>"
        );
        assert_eq!(
            policy.replace_encoded_words("=?ISO-8859-1?Q?a?= b <x@y.test>"),
            "a b <x@y.test>"
        );
    }

    #[test]
    fn test_special_characters_are_quoted() {
        let policy = get_header_policy("from");
        assert_eq!(
            policy.replace_encoded_words("=?utf-8?q?M=C3=BCller=2C_Hans?= <h@example.de>"),
            "\"M\u{fc}ller, Hans\" <h@example.de>"
        );
    }

    #[test]
    fn test_line_break_in_display_name_not_decoded() {
        let policy = get_header_policy("from");
        let value = "=?utf-8?q?a=0D=0AX-Evil=3A_1?= <a@b.test>";
        assert!(policy.validate(value));
        let decoded = policy.replace_encoded_words(value);
        assert_eq!(decoded, value);
        assert!(policy.validate(&decoded));
    }

    #[test]
    fn test_blank_display_name_stays_a_word() {
        let policy = get_header_policy("keywords");
        let decoded = policy.replace_encoded_words("=?utf-8?q?_?=");
        assert_eq!(decoded, "\" \"");
        assert!(policy.validate(&decoded));
    }

    #[test]
    fn test_address_parts_not_decoded() {
        let policy = get_header_policy("from");
        let value = "=?utf-8?q?x?=@example.com";
        assert_eq!(policy.replace_encoded_words(value), value);
        let value = "Name <=?utf-8?q?x?=@example.com>";
        assert_eq!(policy.replace_encoded_words(value), value);
    }

    #[test]
    fn test_invalid_value_left_unchanged() {
        let policy = get_header_policy("from");
        let value = "=?utf-8?q?Joe?= <broken";
        assert_eq!(policy.replace_encoded_words(value), value);
        assert!(!policy.validate(value));
    }

    #[test]
    fn test_comment_in_structured_field() {
        let policy = get_header_policy("date");
        assert_eq!(
            policy.replace_encoded_words("Fri, 21 Nov 1997 09:55:06 -0600 (=?utf-8?q?x=C2=A0?=)"),
            "Fri, 21 Nov 1997 09:55:06 -0600 (x\u{a0})"
        );
        let policy = get_header_policy("from");
        assert_eq!(
            policy.replace_encoded_words("a@b.test (=?utf-8?q?=28paren=29?= (=?utf-8?q?in?=))"),
            "a@b.test (\\(paren\\) (in))"
        );
    }

    #[test]
    fn test_no_comments_policy_is_identity() {
        let value = "<http://example.com/=?utf-8?q?x?=>";
        assert_eq!(decode_header_value("List-Help", value), value);
    }

    #[test]
    fn test_comments_anywhere() {
        let value = "\"(=?utf-8?q?q?=)\" (=?utf-8?q?c?=) =?utf-8?q?bare?=";
        assert_eq!(
            decode_header_value("Conversion", value),
            "\"(=?utf-8?q?q?=)\" (c) =?utf-8?q?bare?="
        );
    }

    #[test]
    fn test_unstructured_subject() {
        assert_eq!(decode_header_value("Subject", "=?us-ascii?q?x?= =?us-ascii?q?y?="), "xy");
    }

    #[test]
    fn test_convert_comments_round_trip() {
        let encoded = convert_comments_to_encoded_words("(x\u{a0})");
        assert_eq!(encoded, "(=?utf-8?q?x=C2=A0?=)");
        assert_eq!(decode_header_value("Conversion", &encoded), "(x\u{a0})");
    }

    #[test]
    fn test_convert_nested_comments() {
        assert_eq!(
            convert_comments_to_encoded_words("a ( \u{e9} (b) c)"),
            "a ( =?utf-8?q?=C3=A9?= (b) c)"
        );
        assert_eq!(convert_comments_to_encoded_words("\"(\u{e9})\""), "\"(\u{e9})\"");
    }

    #[test]
    fn test_depth_limit_leaves_value_unchanged() {
        let config = ParserConfig::builder().max_comment_depth(1).build().unwrap();
        let value = "a@b.test ((=?utf-8?q?x?=))";
        assert_eq!(decode_header_value_with("to", value, &config), value);
        assert_eq!(decode_header_value("to", value), "a@b.test ((x))");
    }
}
