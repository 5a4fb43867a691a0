//! Integration tests for encoded-word substitution across the header
//! field registry.

#![allow(clippy::unwrap_used)]

use mailfield::header_fields::{
    convert_comments_to_encoded_words, decode_header_value_with, registered_header_names,
};
use mailfield::{
    HeaderFieldPolicy, ParserConfig, decode_header_value, get_header_policy, replace_encoded_words,
};

#[test]
fn test_adjacent_words_merge_in_unstructured_text() {
    assert_eq!(
        decode_header_value("Subject", "=?us-ascii?q?x?= =?us-ascii?q?y?="),
        "xy"
    );
    assert_eq!(
        decode_header_value("Subject", "=?us-ascii?q?x?= and =?us-ascii?q?y?="),
        "x and y"
    );
}

#[test]
fn test_adjacent_words_merge_in_display_name() {
    assert_eq!(
        decode_header_value(
            "From",
            "=?us-ascii?q?Keith_?= =?us-ascii?q?Moore?= <moore@cs.utk.edu>"
        ),
        "Keith Moore <moore@cs.utk.edu>"
    );
}

#[test]
fn test_rfc2047_examples() {
    assert_eq!(
        decode_header_value(
            "To",
            "=?ISO-8859-1?Q?Keld_J=F8rn_Simonsen?= <keld@dkuug.dk>"
        ),
        "Keld J\u{f8}rn Simonsen <keld@dkuug.dk>"
    );
    assert_eq!(
        decode_header_value(
            "CC",
            "=?ISO-8859-1?Q?Andr=E9?= Pirard <PIRARD@vm1.ulg.ac.be>"
        ),
        "Andr\u{e9} Pirard <PIRARD@vm1.ulg.ac.be>"
    );
    assert_eq!(
        decode_header_value(
            "Subject",
            "=?ISO-8859-1?B?SWYgeW91IGNhbiByZWFkIHRoaXMgeW8=?= \
             =?ISO-8859-2?B?dSB1bmRlcnN0YW5kIHRoZSBleGFtcGxlLg==?="
        ),
        "If you can read this you understand the example."
    );
}

#[test]
fn test_words_not_delimited_by_whitespace_stay_encoded() {
    let value = "=?us-ascii?q?a?=.example <user@x.example>";
    assert_eq!(decode_header_value("From", value), value);
}

#[test]
fn test_address_parts_are_never_decoded() {
    let value = "=?us-ascii?q?user?=@example.com";
    assert_eq!(decode_header_value("To", value), value);
    let value = "<=?us-ascii?q?id?=@example.com>";
    assert_eq!(decode_header_value("Message-ID", value), value);
}

#[test]
fn test_decoded_specials_are_quoted() {
    let decoded = decode_header_value("From", "=?utf-8?q?M=C3=BCller=2C_Hans?= <h@example.de>");
    assert_eq!(decoded, "\"M\u{fc}ller, Hans\" <h@example.de>");
    assert_eq!(decode_header_value("From", &decoded), decoded);
}

#[test]
fn test_comments_decoded_in_structured_fields() {
    assert_eq!(
        decode_header_value(
            "Received",
            "from mail.example.com (=?utf-8?q?caf=C3=A9?=) by mx.example.net; \
             Tue, 1 Jul 2003 10:52:37 +0200"
        ),
        "from mail.example.com (caf\u{e9}) by mx.example.net; Tue, 1 Jul 2003 10:52:37 +0200"
    );
    assert_eq!(
        decode_header_value("Content-Features", "(=?us-ascii?q?a?=) (=?us-ascii?q?b?=)"),
        "(a) (b)"
    );
}

#[test]
fn test_no_comment_fields_left_alone() {
    let value = "<https://example.com/=?us-ascii?q?x?=> (=?us-ascii?q?y?=)";
    assert_eq!(get_header_policy("List-Archive"), HeaderFieldPolicy::StructuredNoComments);
    assert_eq!(decode_header_value("List-Archive", value), value);
}

#[test]
fn test_comment_conversion_round_trip() {
    let original = "Pete (caf\u{e9}) <pete@silly.example>";
    let converted = convert_comments_to_encoded_words(original);
    assert_eq!(converted, "Pete (=?utf-8?q?caf=C3=A9?=) <pete@silly.example>");
    assert_eq!(decode_header_value("From", &converted), original);
}

#[test]
fn test_unregistered_names_are_unstructured() {
    assert_eq!(get_header_policy("X-Custom"), HeaderFieldPolicy::Unstructured);
    assert_eq!(
        decode_header_value("X-Custom", "=?utf-8?b?w6k=?="),
        "\u{e9}"
    );
}

#[test]
fn test_registry_covers_common_fields() {
    let names: Vec<&str> = registered_header_names().collect();
    for name in ["from", "to", "subject", "received", "content-type", "x-ricevuta"] {
        assert!(names.contains(&name), "{name} not registered");
    }
    assert!(names.iter().all(|n| n.bytes().all(|b| !b.is_ascii_uppercase())));
}

#[test]
fn test_unknown_charset_policy() {
    let value = "=?x-unknown?q?abc?=";
    assert_eq!(replace_encoded_words(value, HeaderFieldPolicy::Unstructured), value);

    let config = ParserConfig::builder()
        .decode_unknown_charsets(true)
        .build()
        .unwrap();
    assert_eq!(decode_header_value_with("Subject", value, &config), "abc");
}

#[test]
fn test_validate() {
    let from = get_header_policy("from");
    assert!(from.validate("a@example.com, B <b@example.com>"));
    assert!(!from.validate("not an address"));
    assert!(get_header_policy("date").validate("Fri, 21 Nov 1997 09:55:06 -0600"));
    assert!(get_header_policy("subject").validate("anything at all"));
}

#[test]
fn test_decoded_line_breaks_cannot_split_a_field() {
    let from = "=?utf-8?q?a=0D=0AX-Evil=3A_1?= <a@b.test>";
    let decoded = decode_header_value("From", from);
    assert!(!decoded.contains(['\r', '\n']));
    assert!(get_header_policy("From").validate(&decoded));

    let subject = "Hi =?utf-8?b?eA0KWC1FdmlsOiAx?=";
    assert_eq!(decode_header_value("Subject", subject), subject);
}

#[test]
fn test_decoded_text_never_spells_an_encoded_word() {
    let subject = "=?us-ascii?q?=3D=3Fus-ascii=3Fq=3Fx=3F=3D?=";
    let once = decode_header_value("Subject", subject);
    assert_eq!(decode_header_value("Subject", &once), once);
}

#[test]
fn test_comment_decoded_beside_later_encoded_section() {
    let value = "text/plain; charset*0=ab;charset*1*=iso-8859-1'en'xyz (=?utf-8?q?caf=C3=A9?=)";
    assert!(get_header_policy("Content-Type").validate(value));
    assert_eq!(
        decode_header_value("Content-Type", value),
        "text/plain; charset*0=ab;charset*1*=iso-8859-1'en'xyz (caf\u{e9})"
    );
}
