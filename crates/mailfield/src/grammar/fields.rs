//! Whole-field productions: message identifiers, trace fields,
//! authentication results and the keyword-valued fields of RFC 2156,
//! RFC 3458, RFC 6477 and the Italian certified mail (PEC) headers.
//!
//! Each `parse_header_*` method matches an entire field body and is the
//! production a registry entry points at.

use super::{HeaderParser, is_ldh, is_mime_token_char};

/// RFC 7208 `result` values.
const SPF_RESULTS: [&str; 7] = [
    "pass",
    "fail",
    "softfail",
    "neutral",
    "none",
    "temperror",
    "permerror",
];

/// RFC 2156 `Importance` values.
const IMPORTANCE: [&str; 3] = ["low", "normal", "high"];

/// RFC 2156 `Priority` values.
const PRIORITY: [&str; 3] = ["normal", "non-urgent", "urgent"];

/// RFC 2156 `Sensitivity` values.
const SENSITIVITY: [&str; 3] = ["personal", "private", "company-confidential"];

/// RFC 2156 `Autoforwarded` values.
const BOOLEAN: [&str; 2] = ["true", "false"];

/// RFC 3458 `Message-Context` values.
const MESSAGE_CONTEXT: [&str; 6] = [
    "voice-message",
    "fax-message",
    "pager-message",
    "multimedia-message",
    "text-message",
    "none",
];

/// RFC 6477 precedence names.
const MMHS_PRECEDENCE: [&str; 6] = [
    "deferred",
    "routine",
    "priority",
    "immediate",
    "flash",
    "override",
];

/// RFC 6477 message type names.
const MMHS_MESSAGE_TYPE: [&str; 4] = ["exercise", "operation", "project", "drill"];

/// RFC 8098 `importance` of a disposition notification option.
const DISPOSITION_IMPORTANCE: [&str; 2] = ["required", "optional"];

const X_RICEVUTA: [&str; 7] = [
    "conferma",
    "non-accettazione",
    "presa-in-carico",
    "avvenuta-consegna",
    "posta-certificata",
    "preavviso-errore-consegna",
    "errore-consegna",
];

const X_TRASPORTO: [&str; 2] = ["posta-certificata", "errore"];

const X_VERIFICA_SICUREZZA: [&str; 1] = ["errore"];

const X_TIPO_RICEVUTA: [&str; 3] = ["completa", "breve", "sintetica"];

impl HeaderParser<'_> {
    // ---- message identifiers ----

    /// `msg-id = [CFWS] "<" id-left "@" id-right ">" [CFWS]`
    pub fn parse_msg_id(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let open = self.parse_cfws(index);
        if !self.is(open, b'<') {
            return self.fail(index, checkpoint);
        }
        let left = self.parse_id_left(open + 1);
        if left == open + 1 || !self.is(left, b'@') {
            return self.fail(index, checkpoint);
        }
        let right = self.parse_id_right(left + 1);
        if right == left + 1 || !self.is(right, b'>') {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(right + 1)
    }

    /// `id-left = dot-atom-text / obs-id-left`, tried as `word *("." word)`,
    /// then a quoted string, then `dot-atom-text`.
    pub fn parse_id_left(&mut self, index: usize) -> usize {
        let end = self.parse_local_part(index);
        if end != index {
            return end;
        }
        let end = self.parse_bare_quoted_string(index);
        if end != index {
            return end;
        }
        self.parse_dot_atom_text(index)
    }

    /// `id-right = dot-atom-text / no-fold-literal / obs-id-right`, tried as
    /// `word *("." word)`, then a domain literal, then `dot-atom-text`.
    pub fn parse_id_right(&mut self, index: usize) -> usize {
        let end = self.parse_local_part(index);
        if end != index {
            return end;
        }
        let end = self.parse_domain_literal(index);
        if end != index {
            return end;
        }
        self.parse_dot_atom_text(index)
    }

    /// `Message-ID: msg-id`
    pub fn parse_header_message_id(&mut self, index: usize) -> usize {
        self.parse_msg_id(index)
    }

    /// `In-Reply-To` / `References`: `1*msg-id`, or the obsolete
    /// `*(phrase / msg-id)`.
    pub fn parse_header_msg_id_list(&mut self, index: usize) -> usize {
        let mut i = index;
        loop {
            let next = self.parse_msg_id(i);
            if next != i {
                i = next;
                continue;
            }
            let next = self.parse_phrase(i);
            if next == i {
                return self.parse_cfws(i);
            }
            i = next;
        }
    }

    // ---- originator and destination fields ----

    /// `From: mailbox-list`
    pub fn parse_header_from(&mut self, index: usize) -> usize {
        self.parse_mailbox_list(index)
    }

    /// `Sender: mailbox`
    pub fn parse_header_sender(&mut self, index: usize) -> usize {
        self.parse_mailbox(index)
    }

    /// `To`, `Cc`, `Reply-To`: `address-list`
    pub fn parse_header_to(&mut self, index: usize) -> usize {
        self.parse_address_list(index)
    }

    /// `Bcc: [address-list / CFWS]`
    pub fn parse_header_bcc(&mut self, index: usize) -> usize {
        let end = self.parse_address_list(index);
        if end != index {
            return end;
        }
        self.parse_cfws(index)
    }

    /// `Return-Path: path`
    pub fn parse_header_return_path(&mut self, index: usize) -> usize {
        self.parse_path(index)
    }

    /// `Keywords: phrase *("," phrase)`, with the obsolete empty elements.
    pub fn parse_header_keywords(&mut self, index: usize) -> usize {
        self.parse_list_of(index, Self::parse_phrase)
    }

    // ---- trace fields ----

    /// `Received: *received-token [";" date-time]`
    ///
    /// The date is optional to admit `obs-received`.
    pub fn parse_header_received(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let mut i = self.parse_cfws(index);
        loop {
            let next = self.parse_received_token(i);
            if next == i {
                break;
            }
            i = next;
        }
        if !self.is(i, b';') {
            return i;
        }
        let end = self.parse_date_time(i + 1);
        if end == i + 1 {
            return self.fail(index, checkpoint);
        }
        end
    }

    /// `received-token = word / angle-addr / addr-spec / domain`
    pub fn parse_received_token(&mut self, index: usize) -> usize {
        let alternatives: [fn(&mut Self, usize) -> usize; 4] = [
            Self::parse_angle_addr,
            Self::parse_addr_spec,
            Self::parse_domain,
            Self::parse_word,
        ];
        for production in alternatives {
            let end = production(self, index);
            if end != index {
                return end;
            }
        }
        index
    }

    /// RFC 7208 `Received-SPF: [CFWS] result FWS [comment FWS] [key-value-list] [CFWS]`
    pub fn parse_header_received_spf(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let result = self.keyword_from(start, &SPF_RESULTS, |b| b.is_ascii_alphanumeric());
        if result == start {
            return self.fail(index, checkpoint);
        }
        let i = self.parse_cfws(result);
        let i = self.parse_key_value_list(i);
        self.parse_cfws(i)
    }

    /// `key-value-list = key-value-pair *(";" [CFWS] key-value-pair) [";"]`;
    /// matching nothing is allowed.
    pub fn parse_key_value_list(&mut self, index: usize) -> usize {
        let mut i = self.parse_key_value_pair(index);
        if i == index {
            return index;
        }
        while self.is(i, b';') {
            let start = self.parse_cfws(i + 1);
            let next = self.parse_key_value_pair(start);
            if next == start {
                return start;
            }
            i = next;
        }
        i
    }

    /// `key-value-pair = key [CFWS] "=" ( dot-atom / quoted-string )`
    ///
    /// `key = ALPHA *(ALPHA / DIGIT / "-" / "_" / ".")`
    pub fn parse_key_value_pair(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        if !self.byte(index).is_some_and(|b| b.is_ascii_alphabetic()) {
            return index;
        }
        let key = self.skip_while(index + 1, |b| {
            b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.')
        });
        let equals = self.parse_cfws(key);
        if !self.is(equals, b'=') {
            return self.fail(index, checkpoint);
        }
        let end = self.parse_dot_atom(equals + 1);
        if end != equals + 1 {
            return end;
        }
        let end = self.parse_quoted_string(equals + 1);
        if end == equals + 1 {
            return self.fail(index, checkpoint);
        }
        end
    }

    // ---- authentication results (RFC 8601) ----

    /// `authres-header = [CFWS] authserv-id [CFWS authres-version]
    ///                   (no-result / 1*resinfo) [CFWS]`
    pub fn parse_header_authentication_results(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let id_end = self.parse_mime_value(start);
        if id_end == start {
            return self.fail(index, checkpoint);
        }
        let mut i = self.parse_cfws(id_end);
        let version = self.skip_while(i, |b| b.is_ascii_digit());
        if version != i {
            i = self.parse_cfws(version);
        }
        let mut resinfo_count = 0;
        loop {
            let next = self.parse_resinfo(i);
            if next == i {
                break;
            }
            i = next;
            resinfo_count += 1;
        }
        if resinfo_count == 0 {
            let end = self.parse_no_result(i);
            if end == i {
                return self.fail(index, checkpoint);
            }
            i = end;
        }
        self.parse_cfws(i)
    }

    /// `no-result = [CFWS] ";" [CFWS] "none"`
    pub fn parse_no_result(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let semicolon = self.parse_cfws(index);
        if !self.is(semicolon, b';') {
            return self.fail(index, checkpoint);
        }
        let start = self.parse_cfws(semicolon + 1);
        let end = self.keyword_from(start, &["none"], is_ldh);
        if end == start {
            return self.fail(index, checkpoint);
        }
        end
    }

    /// `resinfo = [CFWS] ";" methodspec [CFWS reasonspec] [CFWS 1*propspec]`
    pub fn parse_resinfo(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let semicolon = self.parse_cfws(index);
        if !self.is(semicolon, b';') {
            return self.fail(index, checkpoint);
        }
        let mut i = self.parse_methodspec(semicolon + 1);
        if i == semicolon + 1 {
            return self.fail(index, checkpoint);
        }
        i = self.parse_reasonspec(i);
        loop {
            let next = self.parse_propspec(i);
            if next == i {
                return i;
            }
            i = next;
        }
    }

    /// `methodspec = [CFWS] method [CFWS] "=" [CFWS] result`
    ///
    /// `method = Keyword [[CFWS] "/" [CFWS] method-version]`
    pub fn parse_methodspec(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let method = self.parse_ldh_keyword(start);
        if method == start {
            return self.fail(index, checkpoint);
        }
        let mut i = self.parse_cfws(method);
        if self.is(i, b'/') {
            let version = self.digits_with_cfws(i + 1);
            if version == i + 1 {
                return self.fail(index, checkpoint);
            }
            i = version;
        }
        if !self.is(i, b'=') {
            return self.fail(index, checkpoint);
        }
        let result_start = self.parse_cfws(i + 1);
        let result = self.parse_ldh_keyword(result_start);
        if result == result_start {
            return self.fail(index, checkpoint);
        }
        result
    }

    /// `reasonspec = "reason" [CFWS] "=" [CFWS] value`, with leading CFWS.
    pub fn parse_reasonspec(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let keyword = self.keyword_from(start, &["reason"], is_ldh);
        if keyword == start {
            return self.fail(index, checkpoint);
        }
        let equals = self.parse_cfws(keyword);
        if !self.is(equals, b'=') {
            return self.fail(index, checkpoint);
        }
        let value_start = self.parse_cfws(equals + 1);
        let end = self.parse_mime_value(value_start);
        if end == value_start {
            return self.fail(index, checkpoint);
        }
        end
    }

    /// `propspec = ptype [CFWS] "." [CFWS] property [CFWS] "=" pvalue`,
    /// with leading CFWS.
    pub fn parse_propspec(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let ptype = self.parse_ldh_keyword(start);
        if ptype == start {
            return self.fail(index, checkpoint);
        }
        let dot = self.parse_cfws(ptype);
        if !self.is(dot, b'.') {
            return self.fail(index, checkpoint);
        }
        let property_start = self.parse_cfws(dot + 1);
        let property = self.parse_ldh_keyword(property_start);
        if property == property_start {
            return self.fail(index, checkpoint);
        }
        let equals = self.parse_cfws(property);
        if !self.is(equals, b'=') {
            return self.fail(index, checkpoint);
        }
        let end = self.parse_pvalue(equals + 1);
        if end == equals + 1 {
            return self.fail(index, checkpoint);
        }
        end
    }

    /// `pvalue = [CFWS] ( value / [ [ local-part ] "@" ] domain-name ) [CFWS]`
    pub fn parse_pvalue(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let end = self.parse_addr_spec(start);
        if end != start {
            return self.parse_cfws(end);
        }
        if self.is(start, b'@') {
            let end = self.parse_domain(start + 1);
            if end != start + 1 {
                return self.parse_cfws(end);
            }
            return self.fail(index, checkpoint);
        }
        let end = self.parse_domain(start);
        if end != start {
            return self.parse_cfws(end);
        }
        let end = self.parse_mime_value(start);
        if end == start {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(end)
    }

    /// RFC 5321 `Keyword = Let-dig [Ldh-str]`; the text may not end in `-`.
    pub fn parse_ldh_keyword(&mut self, index: usize) -> usize {
        if !self.byte(index).is_some_and(|b| b.is_ascii_alphanumeric()) {
            return index;
        }
        let mut end = self.skip_while(index, is_ldh);
        while self.text.as_bytes()[end - 1] == b'-' {
            end -= 1;
        }
        end
    }

    // ---- MIME and list fields ----

    /// RFC 3834 `Auto-Submitted: [CFWS] auto-submitted-value [CFWS] *(";" parameter)`
    pub fn parse_header_auto_submitted(&mut self, index: usize) -> usize {
        self.parse_header_content_disposition(index)
    }

    /// RFC 8098 `Disposition-Notification-Options: disposition-notification-parameter
    /// *(";" disposition-notification-parameter)`
    pub fn parse_header_disposition_notification_options(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let mut i = self.parse_disposition_notification_parameter(index);
        if i == index {
            return self.fail(index, checkpoint);
        }
        while self.is(i, b';') {
            let next = self.parse_disposition_notification_parameter(i + 1);
            if next == i + 1 {
                return self.fail(index, checkpoint);
            }
            i = next;
        }
        i
    }

    /// `disposition-notification-parameter = attribute [CFWS] "=" [CFWS]
    ///     importance [CFWS] "," [CFWS] value *([CFWS] "," [CFWS] value)`
    pub fn parse_disposition_notification_parameter(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let attribute = self.parse_mime_token(start);
        if attribute == start {
            return self.fail(index, checkpoint);
        }
        let equals = self.parse_cfws(attribute);
        if !self.is(equals, b'=') {
            return self.fail(index, checkpoint);
        }
        let importance_start = self.parse_cfws(equals + 1);
        let importance =
            self.keyword_from(importance_start, &DISPOSITION_IMPORTANCE, is_mime_token_char);
        if importance == importance_start {
            return self.fail(index, checkpoint);
        }
        let mut i = self.parse_cfws(importance);
        let mut values = 0;
        while self.is(i, b',') {
            let value_start = self.parse_cfws(i + 1);
            let value_end = self.parse_mime_value(value_start);
            if value_end == value_start {
                return self.fail(index, checkpoint);
            }
            i = self.parse_cfws(value_end);
            values += 1;
        }
        if values == 0 {
            return self.fail(index, checkpoint);
        }
        i
    }

    /// RFC 2919 `List-ID: [phrase] "<" list-id ">"`
    pub fn parse_header_list_id(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let i = self.parse_phrase(index);
        let open = self.parse_cfws(i);
        if !self.is(open, b'<') {
            return self.fail(index, checkpoint);
        }
        let id = self.parse_dot_atom_text(open + 1);
        if id == open + 1 || !self.is(id, b'>') {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(id + 1)
    }

    /// RFC 6758 `MT-Priority: [CFWS] priority-value [CFWS]`, where the
    /// value is an integer from -9 to 9.
    pub fn parse_header_mt_priority(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let digit = if self.is(start, b'-') { start + 1 } else { start };
        let end = self.digits(digit, 1, 1);
        if end == digit || self.byte(end).is_some_and(|b| b.is_ascii_digit()) {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(end)
    }

    /// RFC 7259 `Jabber-ID: [CFWS] addr-spec [CFWS]`
    pub fn parse_header_jabber_id(&mut self, index: usize) -> usize {
        self.parse_addr_spec(index)
    }

    /// RFC 7293 `Require-Recipient-Valid-Since: addr-spec ";" date-time`
    pub fn parse_header_require_recipient_valid_since(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let address = self.parse_addr_spec(index);
        if address == index || !self.is(address, b';') {
            return self.fail(index, checkpoint);
        }
        let end = self.parse_date_time(address + 1);
        if end == address + 1 {
            return self.fail(index, checkpoint);
        }
        end
    }

    /// RFC 1505 `Encrypted: word ["," word]`
    pub fn parse_header_encrypted(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let first = self.parse_word(index);
        if first == index {
            return self.fail(index, checkpoint);
        }
        if !self.is(first, b',') {
            return first;
        }
        let second = self.parse_word(first + 1);
        if second == first + 1 {
            return self.fail(index, checkpoint);
        }
        second
    }

    // ---- keyword-valued fields ----

    /// RFC 2156 `Importance`
    pub fn parse_header_importance(&mut self, index: usize) -> usize {
        self.parse_keyword_field(index, &IMPORTANCE)
    }

    /// RFC 2156 `Priority`
    pub fn parse_header_priority(&mut self, index: usize) -> usize {
        self.parse_keyword_field(index, &PRIORITY)
    }

    /// RFC 2156 `Sensitivity`
    pub fn parse_header_sensitivity(&mut self, index: usize) -> usize {
        self.parse_keyword_field(index, &SENSITIVITY)
    }

    /// RFC 2156 `Autoforwarded`
    pub fn parse_header_autoforwarded(&mut self, index: usize) -> usize {
        self.parse_keyword_field(index, &BOOLEAN)
    }

    /// RFC 3458 `Message-Context`
    pub fn parse_header_message_context(&mut self, index: usize) -> usize {
        self.parse_keyword_field(index, &MESSAGE_CONTEXT)
    }

    /// `X-Ricevuta`
    pub fn parse_header_x_ricevuta(&mut self, index: usize) -> usize {
        self.parse_keyword_field(index, &X_RICEVUTA)
    }

    /// `X-Trasporto`
    pub fn parse_header_x_trasporto(&mut self, index: usize) -> usize {
        self.parse_keyword_field(index, &X_TRASPORTO)
    }

    /// `X-VerificaSicurezza`
    pub fn parse_header_x_verifica_sicurezza(&mut self, index: usize) -> usize {
        self.parse_keyword_field(index, &X_VERIFICA_SICUREZZA)
    }

    /// `X-TipoRicevuta`
    pub fn parse_header_x_tipo_ricevuta(&mut self, index: usize) -> usize {
        self.parse_keyword_field(index, &X_TIPO_RICEVUTA)
    }

    /// RFC 6477 `MMHS-Primary-Precedence` and `MMHS-Copy-Precedence`:
    /// a precedence name or number.
    pub fn parse_header_mmhs_precedence(&mut self, index: usize) -> usize {
        let end = self.digits_with_cfws(index);
        if end != index {
            return end;
        }
        self.parse_keyword_field(index, &MMHS_PRECEDENCE)
    }

    /// RFC 6477 `MMHS-Message-Type`: a type name or number.
    pub fn parse_header_mmhs_message_type(&mut self, index: usize) -> usize {
        let end = self.digits_with_cfws(index);
        if end != index {
            return end;
        }
        self.parse_keyword_field(index, &MMHS_MESSAGE_TYPE)
    }

    /// RFC 6477 `MMHS-Codress-Message-Indicator: [CFWS] 1*DIGIT [CFWS]`
    pub fn parse_header_mmhs_codress_message_indicator(&mut self, index: usize) -> usize {
        self.digits_with_cfws(index)
    }

    /// RFC 6477 `MMHS-Subject-Indicator-Codes: sic *(";" sic)`, where each
    /// code is 3 to 8 letters or digits.
    pub fn parse_header_mmhs_subject_indicator_codes(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let mut i = self.parse_subject_indicator_code(index);
        if i == index {
            return self.fail(index, checkpoint);
        }
        while self.is(i, b';') {
            let next = self.parse_subject_indicator_code(i + 1);
            if next == i + 1 {
                return self.fail(index, checkpoint);
            }
            i = next;
        }
        i
    }

    fn parse_subject_indicator_code(&mut self, index: usize) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let mut end = start;
        while end - start < 8 && self.byte(end).is_some_and(|b| b.is_ascii_alphanumeric()) {
            end += 1;
        }
        if end - start < 3 || self.byte(end).is_some_and(|b| b.is_ascii_alphanumeric()) {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(end)
    }

    /// `[CFWS] keyword [CFWS]`, where the keyword must be one of `table`
    /// (ignoring ASCII case) and end at a token boundary.
    fn parse_keyword_field(&mut self, index: usize, table: &[&str]) -> usize {
        let checkpoint = self.checkpoint();
        let start = self.parse_cfws(index);
        let end = self.keyword_from(start, table, is_mime_token_char);
        if end == start {
            return self.fail(index, checkpoint);
        }
        self.parse_cfws(end)
    }
}
